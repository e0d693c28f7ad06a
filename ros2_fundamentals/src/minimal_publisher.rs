//! Minimal counter publisher
//!
//! On every timer firing the node bumps its counter and publishes
//! `"Hello World: <counter>"` on `/py_example_topic`.

use crate::messages::StringMsg;
use fundamentals_core::{Context, CoreResult, Hub, Node, NodeInfo, Timer, TopicMetadata};
use std::time::{Duration, Instant};

pub const NODE_NAME: &str = "minimal_py_publisher";
/// Relative name; the context resolves it to `/py_example_topic`
pub const TOPIC_NAME: &str = "py_example_topic";
pub const TIMER_PERIOD: Duration = Duration::from_millis(500);
pub const MESSAGE_PREFIX: &str = "Hello World: ";

/// Payload for a given counter value
pub fn format_message(count: u64) -> String {
    format!("{}{}", MESSAGE_PREFIX, count)
}

/// Publishes an incrementing counter on a fixed topic
pub struct MinimalPyPublisher {
    publisher_1: Hub<StringMsg>,
    timer: Timer,
    i: u64,
}

impl MinimalPyPublisher {
    /// Register the node, its publisher and its timer with `ctx`
    pub fn new(ctx: &Context) -> CoreResult<Self> {
        ctx.register_node(NODE_NAME)?;

        let built = ctx
            .create_publisher::<StringMsg>(TOPIC_NAME)
            .and_then(|publisher_1| Ok((publisher_1, ctx.create_timer(TIMER_PERIOD)?)));

        match built {
            Ok((publisher_1, timer)) => {
                log::debug!("'{}' publishing on '{}'", NODE_NAME, publisher_1.topic_name());
                Ok(Self {
                    publisher_1,
                    timer,
                    i: 0,
                })
            }
            Err(e) => {
                ctx.unregister_node(NODE_NAME);
                Err(e)
            }
        }
    }

    /// Release the node's registration; its topic stays with the context
    pub fn destroy(self, ctx: &Context) {
        ctx.unregister_node(NODE_NAME);
    }

    pub fn name(&self) -> &'static str {
        NODE_NAME
    }

    /// Outgoing channel, bound to `/py_example_topic`
    pub fn publisher(&self) -> &Hub<StringMsg> {
        &self.publisher_1
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn counter(&self) -> u64 {
        self.i
    }

    pub fn set_counter(&mut self, value: u64) {
        self.i = value;
    }

    /// Fire once: increment, then publish the new value
    ///
    /// A counter already at `u64::MAX` stays there and nothing is published.
    pub fn timer_callback(&mut self) {
        self.publish_next(None);
    }

    /// Fire if the timer is due at `now`; returns whether it fired
    pub fn tick_at(&mut self, now: Instant, ctx: Option<&mut NodeInfo>) -> bool {
        if !self.timer.fire(now) {
            return false;
        }
        self.publish_next(ctx);
        true
    }

    fn publish_next(&mut self, mut ctx: Option<&mut NodeInfo>) {
        let Some(next) = self.i.checked_add(1) else {
            let text = format!("Counter exhausted at {}, nothing published", self.i);
            match ctx {
                Some(ctx) => ctx.log_error(&text),
                None => log::error!("{}", text),
            }
            return;
        };
        self.i = next;
        let msg = StringMsg::from(format_message(self.i));

        // With a node context the hub logs the publish itself
        if ctx.is_none() {
            log::info!("Publishing: \"{}\"", msg.data);
        }

        if let Err(msg) = self.publisher_1.send(msg, ctx.as_deref_mut()) {
            let text = format!(
                "Could not deliver \"{}\" on '{}'",
                msg.data,
                self.publisher_1.topic_name()
            );
            match ctx {
                Some(ctx) => ctx.log_warning(&text),
                None => log::warn!("{}", text),
            }
        }
    }
}

impl Node for MinimalPyPublisher {
    fn name(&self) -> &'static str {
        NODE_NAME
    }

    fn init(&mut self, ctx: &mut NodeInfo) -> CoreResult<()> {
        ctx.log_info(&format!(
            "Publishing on '{}' every {:?}",
            self.publisher_1.topic_name(),
            self.timer.period()
        ));
        Ok(())
    }

    fn tick(&mut self, ctx: Option<&mut NodeInfo>) {
        self.tick_at(Instant::now(), ctx);
    }

    fn shutdown(&mut self, ctx: &mut NodeInfo) -> CoreResult<()> {
        self.timer.cancel();
        ctx.log_info(&format!(
            "Stopped after {} messages in {:.1?}",
            self.i,
            ctx.uptime()
        ));
        Ok(())
    }

    fn get_publishers(&self) -> Vec<TopicMetadata> {
        vec![TopicMetadata {
            topic_name: self.publisher_1.topic_name().to_string(),
            type_name: std::any::type_name::<StringMsg>().to_string(),
        }]
    }
}
