//! # Communication layer
//!
//! In-process publish/subscribe scoped to one `Context`:
//!
//! - **Hub**: typed handle to a named topic; all hubs on a topic share a buffer
//! - **TopicBuffer**: bounded keep-last queue behind each topic
//! - **names**: node name validation and topic name resolution
//!
//! ```rust,no_run
//! use fundamentals_core::{Context, Hub};
//!
//! let ctx = Context::init().unwrap();
//! let hub: Hub<String> = ctx.create_publisher("chatter").unwrap();
//! assert_eq!(hub.topic_name(), "/chatter");
//! ```

pub mod hub;
pub mod names;
pub mod topic;
pub mod traits;

pub use hub::{Hub, HubMetrics};
pub use names::{resolve_topic_name, validate_node_name};
pub use topic::TopicBuffer;
pub use traits::{Publisher, Subscriber};
