//! # Fundamentals Core
//!
//! A small in-process publish/subscribe runtime for building and testing
//! robot nodes without a middleware installation:
//!
//! - **Context**: explicit init/shutdown lifecycle; owns topics and parameters
//! - **Nodes**: units of execution with a name, state and metrics
//! - **Communication**: typed `Hub` handles on named topics
//! - **Timers**: periodic triggers checked from a node's tick
//! - **Scheduling**: single-threaded loop that drives nodes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fundamentals_core::{Context, Hub, Node, NodeInfo, Scheduler};
//!
//! struct ExampleNode {
//!     output: Hub<String>,
//! }
//!
//! impl Node for ExampleNode {
//!     fn name(&self) -> &'static str { "example" }
//!
//!     fn tick(&mut self, ctx: Option<&mut NodeInfo>) {
//!         let _ = self.output.send("Hello!".into(), ctx);
//!     }
//! }
//!
//! let ctx = Context::init().unwrap();
//! let node = ExampleNode { output: ctx.create_publisher("chatter").unwrap() };
//! let mut scheduler = Scheduler::new();
//! scheduler.add(Box::new(node), 0, Some(true));
//! scheduler.run_ticks(10).unwrap();
//! ```

pub mod communication;
pub mod context;
pub mod core;
pub mod error;
pub mod params;
pub mod scheduling;

pub use communication::{Hub, Publisher, Subscriber};
pub use context::{Context, ContextState};
pub use core::{LogSummary, Node, NodeInfo, NodeState, Timer, TopicMetadata};
pub use error::{CoreError, CoreResult};
pub use params::RuntimeParams;
pub use scheduling::Scheduler;
