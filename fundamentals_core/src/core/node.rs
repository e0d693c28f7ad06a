use crate::error::CoreResult;
use colored::Colorize;
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

/// Compact, loggable rendering of a message
///
/// Hubs call this before moving a message into a topic buffer, so logging
/// never needs to hold on to the message itself.
pub trait LogSummary {
    fn log_summary(&self) -> String;
}

/// Node states for monitoring and lifecycle management
#[derive(Debug, Clone, PartialEq)]
pub enum NodeState {
    Uninitialized,
    Initializing,
    Running,
    Stopping,
    Stopped,
    Error(String),
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeState::Uninitialized => write!(f, "Uninitialized"),
            NodeState::Initializing => write!(f, "Initializing"),
            NodeState::Running => write!(f, "Running"),
            NodeState::Stopping => write!(f, "Stopping"),
            NodeState::Stopped => write!(f, "Stopped"),
            NodeState::Error(msg) => write!(f, "Error: {}", msg),
        }
    }
}

/// Tick and traffic counters for one node
#[derive(Debug, Clone, Default)]
pub struct NodeMetrics {
    pub total_ticks: u64,
    pub avg_tick_duration_ms: f64,
    pub max_tick_duration_ms: f64,
    pub last_tick_duration_ms: f64,
    pub messages_sent: u64,
    pub messages_received: u64,
    pub errors_count: u64,
    pub warnings_count: u64,
}

/// Topic metadata for introspection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMetadata {
    pub topic_name: String,
    pub type_name: String,
}

/// Runtime context the scheduler hands to a node on every call
pub struct NodeInfo {
    name: String,
    instance_id: String,

    state: NodeState,
    state_change_time: Instant,

    enable_logging: bool,

    metrics: NodeMetrics,
    creation_time: Instant,
    tick_start_time: Option<Instant>,

    error_history: Vec<(Instant, String)>,

    // topic -> message count
    published_topics: HashMap<String, u64>,
    subscribed_topics: HashMap<String, u64>,
}

impl NodeInfo {
    pub fn new(node_name: String, logging_enabled: bool) -> Self {
        let now = Instant::now();
        Self {
            name: node_name,
            instance_id: uuid::Uuid::new_v4().to_string(),
            state: NodeState::Uninitialized,
            state_change_time: now,
            enable_logging: logging_enabled,
            metrics: NodeMetrics::default(),
            creation_time: now,
            tick_start_time: None,
            error_history: Vec::new(),
            published_topics: HashMap::new(),
            subscribed_topics: HashMap::new(),
        }
    }

    // State management
    pub fn state(&self) -> &NodeState {
        &self.state
    }

    pub fn set_state(&mut self, new_state: NodeState) {
        if self.state != new_state {
            log::debug!("Node '{}': {} -> {}", self.name, self.state, new_state);
            self.state = new_state;
            self.state_change_time = Instant::now();
        }
    }

    pub fn transition_to_error(&mut self, error_msg: String) {
        self.log_error(&error_msg);
        self.set_state(NodeState::Error(error_msg));
    }

    // Tick bookkeeping
    pub fn start_tick(&mut self) {
        self.tick_start_time = Some(Instant::now());
    }

    pub fn record_tick(&mut self) {
        let Some(start_time) = self.tick_start_time.take() else {
            return;
        };
        let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

        let m = &mut self.metrics;
        m.total_ticks += 1;
        m.last_tick_duration_ms = duration_ms;
        if duration_ms > m.max_tick_duration_ms {
            m.max_tick_duration_ms = duration_ms;
        }
        let total = m.avg_tick_duration_ms * (m.total_ticks - 1) as f64;
        m.avg_tick_duration_ms = (total + duration_ms) / m.total_ticks as f64;
    }

    // Logging
    pub fn log_pub<T: LogSummary>(&mut self, topic: &str, data: &T) {
        let summary = data.log_summary();
        self.log_pub_summary(topic, &summary);
    }

    /// Record a publish whose summary was computed before the message moved
    pub fn log_pub_summary(&mut self, topic: &str, summary: &str) {
        if self.enable_logging {
            let now = chrono::Local::now();
            println!(
                "{} {} {} {} = {}",
                format!("[{}]", now.format("%H:%M:%S%.3f")).cyan(),
                self.name.yellow(),
                "--PUB-->".green().bold(),
                format!("'{}'", topic).magenta(),
                summary
            );
        }

        *self.published_topics.entry(topic.to_string()).or_insert(0) += 1;
        self.metrics.messages_sent += 1;
    }

    pub fn log_sub_summary(&mut self, topic: &str, summary: &str) {
        if self.enable_logging {
            let now = chrono::Local::now();
            println!(
                "{} {} {} {} = {}",
                format!("[{}]", now.format("%H:%M:%S%.3f")).cyan(),
                self.name.yellow(),
                "<--SUB--".blue().bold(),
                format!("'{}'", topic).magenta(),
                summary
            );
        }

        *self.subscribed_topics.entry(topic.to_string()).or_insert(0) += 1;
        self.metrics.messages_received += 1;
    }

    pub fn log_info(&self, message: &str) {
        if self.enable_logging {
            println!("{} {} {}", "[INFO]".blue(), format!("[{}]", self.name).yellow(), message);
        }
    }

    pub fn log_warning(&mut self, message: &str) {
        if self.enable_logging {
            println!("{} {} {}", "[WARN]".yellow(), format!("[{}]", self.name).yellow(), message);
        }
        self.metrics.warnings_count += 1;
    }

    pub fn log_error(&mut self, message: &str) {
        if self.enable_logging {
            println!("{} {} {}", "[ERROR]".red(), format!("[{}]", self.name).yellow(), message);
        }

        self.error_history.push((Instant::now(), message.to_string()));
        if self.error_history.len() > 100 {
            self.error_history.remove(0);
        }
        self.metrics.errors_count += 1;
    }

    // Getters
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }
    pub fn logging_enabled(&self) -> bool {
        self.enable_logging
    }
    pub fn set_logging(&mut self, enabled: bool) {
        self.enable_logging = enabled;
    }
    pub fn metrics(&self) -> &NodeMetrics {
        &self.metrics
    }
    pub fn published_topics(&self) -> &HashMap<String, u64> {
        &self.published_topics
    }
    pub fn subscribed_topics(&self) -> &HashMap<String, u64> {
        &self.subscribed_topics
    }
    pub fn last_error(&self) -> Option<&str> {
        self.error_history.last().map(|(_, msg)| msg.as_str())
    }
    pub fn uptime(&self) -> Duration {
        self.creation_time.elapsed()
    }
    pub fn time_in_current_state(&self) -> Duration {
        self.state_change_time.elapsed()
    }
}

/// A unit of execution driven by the scheduler
pub trait Node: Send {
    /// Node name, unique within a scheduler
    fn name(&self) -> &'static str;

    /// Called once before the first tick
    fn init(&mut self, ctx: &mut NodeInfo) -> CoreResult<()> {
        ctx.log_info("Node initialized successfully");
        Ok(())
    }

    /// Called on every scheduler pass
    fn tick(&mut self, ctx: Option<&mut NodeInfo>);

    /// Called once when the scheduler stops
    fn shutdown(&mut self, ctx: &mut NodeInfo) -> CoreResult<()> {
        ctx.log_info("Node shutdown successfully");
        Ok(())
    }

    fn get_publishers(&self) -> Vec<TopicMetadata> {
        Vec::new()
    }

    fn get_subscribers(&self) -> Vec<TopicMetadata> {
        Vec::new()
    }
}

impl LogSummary for String {
    fn log_summary(&self) -> String {
        self.clone()
    }
}

impl LogSummary for u64 {
    fn log_summary(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        let mut info = NodeInfo::new("talker".to_string(), false);
        assert_eq!(info.state(), &NodeState::Uninitialized);

        info.set_state(NodeState::Running);
        assert_eq!(info.state(), &NodeState::Running);

        info.transition_to_error("boom".to_string());
        assert_eq!(info.state(), &NodeState::Error("boom".to_string()));
        assert_eq!(info.last_error(), Some("boom"));
        assert_eq!(info.metrics().errors_count, 1);
    }

    #[test]
    fn test_record_tick_requires_start() {
        let mut info = NodeInfo::new("talker".to_string(), false);
        info.record_tick();
        assert_eq!(info.metrics().total_ticks, 0);

        info.start_tick();
        info.record_tick();
        info.start_tick();
        info.record_tick();
        assert_eq!(info.metrics().total_ticks, 2);
    }

    #[test]
    fn test_publish_counts_per_topic() {
        let mut info = NodeInfo::new("talker".to_string(), false);
        info.log_pub("/chatter", &"a".to_string());
        info.log_pub("/chatter", &"b".to_string());
        info.log_pub_summary("/other", "c");

        assert_eq!(info.published_topics().get("/chatter"), Some(&2));
        assert_eq!(info.published_topics().get("/other"), Some(&1));
        assert_eq!(info.metrics().messages_sent, 3);
    }

    #[test]
    fn test_warnings_are_counted() {
        let mut info = NodeInfo::new("talker".to_string(), false);
        info.log_warning("slow tick");
        info.log_warning("slow tick");
        assert_eq!(info.metrics().warnings_count, 2);
        assert_eq!(info.metrics().errors_count, 0);
    }

    #[test]
    fn test_state_time_within_uptime() {
        let mut info = NodeInfo::new("talker".to_string(), false);
        info.set_state(NodeState::Running);
        let in_state = info.time_in_current_state();
        assert!(in_state <= info.uptime());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(NodeState::Running.to_string(), "Running");
        assert_eq!(NodeState::Error("x".into()).to_string(), "Error: x");
    }
}
