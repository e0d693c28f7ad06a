//! Capability traits for topic handles
//!
//! Node code that only needs "something I can publish to" or "something I
//! can read from" takes these instead of a concrete [`Hub`].

use super::hub::Hub;
use crate::core::node::LogSummary;
use crate::error::{CoreError, CoreResult};
use std::fmt::Debug;

/// Outgoing channel bound to one topic for its whole lifetime
pub trait Publisher<T>: Send + Sync + Clone + Debug {
    /// Topic this channel publishes on
    fn topic_name(&self) -> &str;

    /// Publish without node-level logging
    fn publish(&self, msg: T) -> CoreResult<()>;
}

/// Incoming channel bound to one topic
pub trait Subscriber<T>: Send + Sync + Clone + Debug {
    fn topic_name(&self) -> &str;

    /// Receive a message without blocking
    fn take(&self) -> Option<T>;

    fn has_messages(&self) -> bool;
}

impl<T> Publisher<T> for Hub<T>
where
    T: LogSummary + Send + 'static,
{
    fn topic_name(&self) -> &str {
        Hub::topic_name(self)
    }

    fn publish(&self, msg: T) -> CoreResult<()> {
        self.send(msg, None).map_err(|_| {
            CoreError::communication(format!("Topic '{}' is closed", Hub::topic_name(self)))
        })
    }
}

impl<T> Subscriber<T> for Hub<T>
where
    T: LogSummary + Send + 'static,
{
    fn topic_name(&self) -> &str {
        Hub::topic_name(self)
    }

    fn take(&self) -> Option<T> {
        self.recv(None)
    }

    fn has_messages(&self) -> bool {
        self.pending() > 0
    }
}
