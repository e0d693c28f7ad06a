//! Runtime lifecycle
//!
//! A [`Context`] replaces process-wide init/shutdown state. Everything a node
//! needs from the runtime (topics, timers, parameters, its registered name)
//! comes from the context it was constructed with, so independent contexts
//! never see each other's traffic.

use crate::communication::names::{resolve_topic_name, validate_node_name};
use crate::communication::{Hub, TopicBuffer};
use crate::core::Timer;
use crate::error::{CoreError, CoreResult};
use crate::params::{RuntimeParams, TOPIC_CAPACITY};
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

/// Largest keep-last depth a context accepts for its topics
pub const MAX_TOPIC_CAPACITY: usize = 1 << 16;

/// Lifecycle state of a context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Running,
    Shutdown,
}

// Type-erased view of a topic buffer so the registry can hold any T
trait ErasedTopic: Send + Sync {
    fn close(&self);
    fn type_name(&self) -> &'static str;
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Send + 'static> ErasedTopic for TopicBuffer<T> {
    fn close(&self) {
        TopicBuffer::close(self)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Explicit runtime lifecycle object
pub struct Context {
    instance_id: String,
    state: RwLock<ContextState>,
    topics: Mutex<HashMap<String, Arc<dyn ErasedTopic>>>,
    // node name -> live instances
    nodes: Mutex<BTreeMap<String, usize>>,
    params: RuntimeParams,
    topic_capacity: usize,
}

impl Context {
    /// Initialize a running context with default parameters
    pub fn init() -> CoreResult<Self> {
        Self::init_with_params(RuntimeParams::new())
    }

    /// Initialize a running context
    ///
    /// `topic_capacity` is read once here and must lie in
    /// `1..=MAX_TOPIC_CAPACITY`.
    pub fn init_with_params(params: RuntimeParams) -> CoreResult<Self> {
        let topic_capacity = usize::try_from(params.get_u64(TOPIC_CAPACITY, 0))
            .ok()
            .filter(|depth| (1..=MAX_TOPIC_CAPACITY).contains(depth))
            .ok_or_else(|| {
                CoreError::InitializationFailed(format!(
                    "'{}' must be an integer between 1 and {}",
                    TOPIC_CAPACITY, MAX_TOPIC_CAPACITY
                ))
            })?;

        let ctx = Self {
            instance_id: uuid::Uuid::new_v4().to_string(),
            state: RwLock::new(ContextState::Running),
            topics: Mutex::new(HashMap::new()),
            nodes: Mutex::new(BTreeMap::new()),
            params,
            topic_capacity,
        };
        log::info!("Context {} initialized", ctx.instance_id);
        Ok(ctx)
    }

    /// True while the context accepts new nodes, topics and messages
    pub fn ok(&self) -> bool {
        *self.state.read() == ContextState::Running
    }

    pub fn state(&self) -> ContextState {
        *self.state.read()
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn params(&self) -> &RuntimeParams {
        &self.params
    }

    fn ensure_running(&self) -> CoreResult<()> {
        if self.ok() {
            Ok(())
        } else {
            Err(CoreError::ContextShutdown)
        }
    }

    /// Stop the context: close every topic and forget registered nodes
    pub fn shutdown(&self) -> CoreResult<()> {
        {
            let mut state = self.state.write();
            if *state == ContextState::Shutdown {
                return Err(CoreError::ContextShutdown);
            }
            *state = ContextState::Shutdown;
        }

        for topic in self.topics.lock().drain().map(|(_, topic)| topic) {
            topic.close();
        }
        self.nodes.lock().clear();

        log::info!("Context {} shut down", self.instance_id);
        Ok(())
    }

    /// Register a node name with this context
    ///
    /// Duplicate names are allowed and logged as a warning.
    pub fn register_node(&self, name: &str) -> CoreResult<()> {
        self.ensure_running()?;
        validate_node_name(name)?;

        let mut nodes = self.nodes.lock();
        let count = nodes.entry(name.to_string()).or_insert(0);
        *count += 1;
        if *count > 1 {
            log::warn!("{} nodes named '{}' share context {}", count, name, self.instance_id);
        }
        Ok(())
    }

    /// Release one instance of a node name; unknown names are ignored
    pub fn unregister_node(&self, name: &str) {
        let mut nodes = self.nodes.lock();
        if let Some(count) = nodes.get_mut(name) {
            *count -= 1;
            if *count == 0 {
                nodes.remove(name);
            }
        }
    }

    /// Names of the live nodes, sorted
    pub fn node_names(&self) -> Vec<String> {
        self.nodes.lock().keys().cloned().collect()
    }

    /// Resolved names of the topics that exist in this context, sorted
    pub fn topic_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.topics.lock().keys().cloned().collect();
        names.sort();
        names
    }

    fn topic_buffer<T: Send + 'static>(&self, topic: &str) -> CoreResult<(String, Arc<TopicBuffer<T>>)> {
        self.ensure_running()?;
        let resolved = resolve_topic_name(topic)?;

        let mut topics = self.topics.lock();
        if let Some(existing) = topics.get(&resolved) {
            let buffer = existing
                .clone()
                .into_any()
                .downcast::<TopicBuffer<T>>()
                .map_err(|_| CoreError::TopicTypeMismatch {
                    topic: resolved.clone(),
                    expected: std::any::type_name::<T>().to_string(),
                })?;
            return Ok((resolved, buffer));
        }

        let capacity = self.topic_capacity;
        let buffer = Arc::new(TopicBuffer::<T>::new(capacity));
        topics.insert(resolved.clone(), buffer.clone());
        log::debug!(
            "Created topic '{}' ({}, depth {})",
            resolved,
            std::any::type_name::<T>(),
            capacity
        );
        Ok((resolved, buffer))
    }

    /// Register an outgoing channel on `topic`
    pub fn create_publisher<T: Send + 'static>(&self, topic: &str) -> CoreResult<Hub<T>> {
        let (resolved, buffer) = self.topic_buffer::<T>(topic)?;
        Ok(Hub::from_buffer(resolved, buffer))
    }

    /// Register an incoming channel on `topic`
    pub fn create_subscription<T: Send + 'static>(&self, topic: &str) -> CoreResult<Hub<T>> {
        let (resolved, buffer) = self.topic_buffer::<T>(topic)?;
        Ok(Hub::from_buffer(resolved, buffer))
    }

    /// Arm a periodic timer
    pub fn create_timer(&self, period: Duration) -> CoreResult<Timer> {
        self.ensure_running()?;
        Timer::new(period)
    }

    /// Message type currently bound to a topic, if the topic exists
    pub fn topic_type(&self, topic: &str) -> Option<&'static str> {
        let resolved = resolve_topic_name(topic).ok()?;
        self.topics.lock().get(&resolved).map(|t| t.type_name())
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        if self.ok() {
            let _ = self.shutdown();
        }
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("instance_id", &self.instance_id)
            .field("state", &self.state())
            .field("topics", &self.topic_names())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test-only plumbing: lets the wide-capacity test use a Hub<u8>.
    impl crate::core::LogSummary for u8 {
        fn log_summary(&self) -> String {
            self.to_string()
        }
    }

    #[test]
    fn test_init_and_shutdown() {
        let ctx = Context::init().unwrap();
        assert!(ctx.ok());
        ctx.shutdown().unwrap();
        assert!(!ctx.ok());
        assert_eq!(ctx.state(), ContextState::Shutdown);
        assert!(matches!(ctx.shutdown(), Err(CoreError::ContextShutdown)));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let params = RuntimeParams::new();
        params.set(TOPIC_CAPACITY, 0).unwrap();
        assert!(matches!(
            Context::init_with_params(params),
            Err(CoreError::InitializationFailed(_))
        ));
    }

    #[test]
    fn test_oversized_capacity_rejected() {
        let params = RuntimeParams::new();
        params.set(TOPIC_CAPACITY, u64::MAX / 2).unwrap();
        assert!(matches!(
            Context::init_with_params(params),
            Err(CoreError::InitializationFailed(_))
        ));

        let params = RuntimeParams::new();
        params.set(TOPIC_CAPACITY, MAX_TOPIC_CAPACITY + 1).unwrap();
        assert!(Context::init_with_params(params).is_err());
    }

    #[test]
    fn test_largest_capacity_creates_topics() {
        let params = RuntimeParams::new();
        params.set(TOPIC_CAPACITY, MAX_TOPIC_CAPACITY).unwrap();
        let ctx = Context::init_with_params(params.clone()).unwrap();

        // Changing params after init does not affect the context
        params.set(TOPIC_CAPACITY, u64::MAX).unwrap();
        let hub: Hub<u8> = ctx.create_publisher("wide").unwrap();
        hub.send(1, None).unwrap();
        assert_eq!(hub.recv(None), Some(1));
    }

    #[test]
    fn test_publisher_and_subscription_share_topic() {
        let ctx = Context::init().unwrap();
        let publisher: Hub<String> = ctx.create_publisher("chatter").unwrap();
        let subscription: Hub<String> = ctx.create_subscription("/chatter").unwrap();

        publisher.send("hi".to_string(), None).unwrap();
        assert_eq!(subscription.recv(None), Some("hi".to_string()));
        assert_eq!(ctx.topic_names(), vec!["/chatter".to_string()]);
    }

    #[test]
    fn test_topic_type_mismatch() {
        let ctx = Context::init().unwrap();
        let _strings: Hub<String> = ctx.create_publisher("chatter").unwrap();
        let err = ctx.create_publisher::<u64>("chatter").unwrap_err();
        assert!(matches!(err, CoreError::TopicTypeMismatch { ref topic, .. } if topic == "/chatter"));
        assert_eq!(ctx.topic_type("chatter"), Some(std::any::type_name::<String>()));
    }

    #[test]
    fn test_operations_fail_after_shutdown() {
        let ctx = Context::init().unwrap();
        let hub: Hub<String> = ctx.create_publisher("chatter").unwrap();
        ctx.shutdown().unwrap();

        assert!(hub.is_closed());
        assert_eq!(hub.send("late".to_string(), None), Err("late".to_string()));
        assert!(matches!(
            ctx.create_publisher::<String>("chatter"),
            Err(CoreError::ContextShutdown)
        ));
        assert!(matches!(
            ctx.create_timer(Duration::from_millis(10)),
            Err(CoreError::ContextShutdown)
        ));
        assert!(matches!(ctx.register_node("talker"), Err(CoreError::ContextShutdown)));
    }

    #[test]
    fn test_node_registration() {
        let ctx = Context::init().unwrap();
        ctx.register_node("talker").unwrap();
        ctx.register_node("talker").unwrap();
        ctx.register_node("listener").unwrap();
        assert_eq!(ctx.node_names(), vec!["listener".to_string(), "talker".to_string()]);

        ctx.unregister_node("talker");
        assert_eq!(ctx.node_names().len(), 2);
        ctx.unregister_node("talker");
        assert_eq!(ctx.node_names(), vec!["listener".to_string()]);

        assert!(matches!(ctx.register_node("bad name"), Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_topic_rejected() {
        let ctx = Context::init().unwrap();
        assert!(matches!(
            ctx.create_publisher::<String>("bad//topic"),
            Err(CoreError::InvalidInput(_))
        ));
    }
}
