//! # Core node types
//!
//! - **Node**: the trait every unit of execution implements
//! - **NodeInfo**: per-node runtime context (state, metrics, logging)
//! - **Timer**: periodic trigger a node checks on each tick
//!
//! ## Node Lifecycle
//!
//! 1. **Construction** - the node is built against a running `Context`
//! 2. **Initialization** - `init()` is called once by the scheduler
//! 3. **Execution** - `tick()` is called on every scheduler pass
//! 4. **Shutdown** - `shutdown()` is called once when the scheduler stops

pub mod node;
pub mod timer;

pub use node::{LogSummary, Node, NodeInfo, NodeMetrics, NodeState, TopicMetadata};
pub use timer::Timer;
