//! # ROS 2 fundamentals
//!
//! A minimal publisher node: every 0.5 s it increments a counter and
//! publishes `"Hello World: <counter>"` on `/py_example_topic`.
//!
//! ```rust,no_run
//! use fundamentals_core::Context;
//! use ros2_fundamentals::MinimalPyPublisher;
//!
//! let ctx = Context::init().unwrap();
//! let mut node = MinimalPyPublisher::new(&ctx).unwrap();
//! node.timer_callback();
//! assert_eq!(node.counter(), 1);
//! node.destroy(&ctx);
//! ctx.shutdown().unwrap();
//! ```

pub mod messages;
pub mod minimal_publisher;

pub use messages::StringMsg;
pub use minimal_publisher::{
    format_message, MinimalPyPublisher, MESSAGE_PREFIX, NODE_NAME, TIMER_PERIOD, TOPIC_NAME,
};
