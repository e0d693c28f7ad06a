use super::topic::{PushOutcome, TopicBuffer};
use crate::core::node::{LogSummary, NodeInfo};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Lock-free counters for one hub handle
#[derive(Debug, Default)]
pub struct AtomicHubMetrics {
    pub messages_sent: AtomicU64,
    pub messages_received: AtomicU64,
    pub messages_evicted: AtomicU64,
    pub send_failures: AtomicU64,
}

impl AtomicHubMetrics {
    pub fn snapshot(&self) -> HubMetrics {
        HubMetrics {
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            messages_evicted: self.messages_evicted.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of hub metrics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HubMetrics {
    pub messages_sent: u64,
    pub messages_received: u64,
    pub messages_evicted: u64,
    pub send_failures: u64,
}

/// Typed handle to a topic inside one context
///
/// Hubs are created through `Context::create_publisher` or
/// `Context::create_subscription`; every hub on the same topic shares one
/// buffer. Clones share metrics with the original.
pub struct Hub<T> {
    buffer: Arc<TopicBuffer<T>>,
    topic_name: String,
    metrics: Arc<AtomicHubMetrics>,
}

impl<T> Clone for Hub<T> {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer.clone(),
            topic_name: self.topic_name.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

// Manual Debug so T does not need to be Debug
impl<T> std::fmt::Debug for Hub<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hub")
            .field("topic_name", &self.topic_name)
            .field("pending", &self.buffer.len())
            .finish_non_exhaustive()
    }
}

impl<T> Hub<T> {
    pub(crate) fn from_buffer(topic_name: String, buffer: Arc<TopicBuffer<T>>) -> Self {
        Self {
            buffer,
            topic_name,
            metrics: Arc::new(AtomicHubMetrics::default()),
        }
    }

    /// Publish a message
    ///
    /// With a `NodeInfo`, the publish is logged against that node. Returns
    /// the message back when the topic no longer accepts data.
    pub fn send(&self, msg: T, ctx: Option<&mut NodeInfo>) -> Result<(), T>
    where
        T: LogSummary,
    {
        // Summary first: the message moves into the buffer below
        let summary = ctx.as_ref().map(|_| msg.log_summary());

        match self.buffer.push(msg) {
            PushOutcome::Rejected(msg) => {
                self.metrics.send_failures.fetch_add(1, Ordering::Relaxed);
                log::warn!("Dropped message on closed topic '{}'", self.topic_name);
                Err(msg)
            }
            outcome => {
                if let PushOutcome::Evicted(_) = outcome {
                    self.metrics.messages_evicted.fetch_add(1, Ordering::Relaxed);
                    log::trace!("Topic '{}' full, evicted oldest message", self.topic_name);
                }
                self.metrics.messages_sent.fetch_add(1, Ordering::Relaxed);

                if let (Some(ctx), Some(summary)) = (ctx, summary) {
                    ctx.log_pub_summary(&self.topic_name, &summary);
                }
                Ok(())
            }
        }
    }

    /// Take the oldest pending message, if any
    pub fn recv(&self, ctx: Option<&mut NodeInfo>) -> Option<T>
    where
        T: LogSummary,
    {
        let msg = self.buffer.pop()?;
        self.metrics.messages_received.fetch_add(1, Ordering::Relaxed);

        if let Some(ctx) = ctx {
            ctx.log_sub_summary(&self.topic_name, &msg.log_summary());
        }
        Some(msg)
    }

    /// Fully qualified topic this hub is bound to
    pub fn topic_name(&self) -> &str {
        &self.topic_name
    }

    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_closed(&self) -> bool {
        self.buffer.is_closed()
    }

    pub fn get_metrics(&self) -> HubMetrics {
        self.metrics.snapshot()
    }
}
