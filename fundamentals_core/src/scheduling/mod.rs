//! # Scheduling
//!
//! The [`Scheduler`] owns boxed nodes and drives them from a single thread:
//!
//! ```rust,ignore
//! use fundamentals_core::Scheduler;
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.add(Box::new(sensor_node), 0, Some(true));   // ticked first, logged
//! scheduler.add(Box::new(background_node), 10, None);    // scheduler default logging
//! scheduler.run()?; // Ctrl+C stops the loop and runs node shutdown hooks
//! ```
//!
//! Tests that need deterministic stepping call [`Scheduler::spin_once`]
//! instead of one of the `run*` loops.

pub mod scheduler;

pub use scheduler::Scheduler;
