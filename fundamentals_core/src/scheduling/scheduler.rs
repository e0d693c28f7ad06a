use crate::core::{Node, NodeInfo, NodeState};
use crate::error::{CoreError, CoreResult};
use crate::params::{RuntimeParams, ENABLE_LOGGING, TICK_RATE_HZ};
use colored::Colorize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const DEFAULT_TICK_RATE_HZ: f64 = 100.0;

struct RegisteredNode {
    node: Box<dyn Node>,
    priority: u32,
    initialized: bool,
    context: NodeInfo,
}

/// Drives registered nodes: init once, tick on every pass, shutdown at the end
pub struct Scheduler {
    nodes: Vec<RegisteredNode>,
    running: Arc<AtomicBool>,
    scheduler_name: String,
    tick_period: Duration,
    default_logging: bool,
    passes: u64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// Create an empty scheduler running at 100 Hz with logging off
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            running: Arc::new(AtomicBool::new(true)),
            scheduler_name: "DefaultScheduler".to_string(),
            tick_period: Duration::from_secs_f64(1.0 / DEFAULT_TICK_RATE_HZ),
            default_logging: false,
            passes: 0,
        }
    }

    /// Create a scheduler configured from runtime parameters
    pub fn from_params(params: &RuntimeParams) -> CoreResult<Self> {
        let rate = params.get_f64(TICK_RATE_HZ, DEFAULT_TICK_RATE_HZ);
        let mut sched = Self::new().with_tick_rate(rate)?;
        sched.default_logging = params.get_bool(ENABLE_LOGGING, false);
        Ok(sched)
    }

    /// Set the loop frequency (builder pattern)
    pub fn with_tick_rate(mut self, rate_hz: f64) -> CoreResult<Self> {
        if !rate_hz.is_finite() || rate_hz <= 0.0 {
            return Err(CoreError::config(format!(
                "Tick rate must be a positive number of Hz, got {}",
                rate_hz
            )));
        }
        self.tick_period = Duration::from_secs_f64(1.0 / rate_hz);
        Ok(self)
    }

    /// Set scheduler name (for logging)
    pub fn with_name(mut self, name: &str) -> Self {
        self.scheduler_name = name.to_string();
        self
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    /// Add a node with given priority (lower number = ticked first)
    ///
    /// `logging_enabled: None` uses the scheduler default.
    pub fn add(
        &mut self,
        node: Box<dyn Node>,
        priority: u32,
        logging_enabled: Option<bool>,
    ) -> &mut Self {
        let node_name = node.name().to_string();
        let logging_enabled = logging_enabled.unwrap_or(self.default_logging);
        let context = NodeInfo::new(node_name.clone(), logging_enabled);

        // Stable: equal priorities keep insertion order
        let idx = self.nodes.partition_point(|n| n.priority <= priority);
        self.nodes.insert(
            idx,
            RegisteredNode {
                node,
                priority,
                initialized: false,
                context,
            },
        );

        log::info!(
            "Added node '{}' with priority {} (logging: {})",
            node_name,
            priority,
            logging_enabled
        );
        self
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Ask the run loop to exit after the current pass
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Handle that stops this scheduler from another thread
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Number of completed passes over the node list
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// One deterministic pass: init new nodes, then tick every healthy node
    pub fn spin_once(&mut self) {
        for registered in self.nodes.iter_mut() {
            if !registered.initialized {
                if matches!(registered.context.state(), NodeState::Error(_)) {
                    continue;
                }
                Self::init_node(registered);
                if !registered.initialized {
                    continue;
                }
            }
            Self::tick_node(registered);
        }
        self.passes += 1;
    }

    fn init_node(registered: &mut RegisteredNode) {
        let node_name = registered.node.name();
        let ctx = &mut registered.context;
        ctx.set_state(NodeState::Initializing);

        match registered.node.init(ctx) {
            Ok(()) => {
                registered.initialized = true;
                ctx.set_state(NodeState::Running);
                log::info!("Initialized node '{}'", node_name);
            }
            Err(e) => {
                log::error!("Failed to initialize node '{}': {}", node_name, e);
                ctx.transition_to_error(format!("Initialization failed: {}", e));
            }
        }
    }

    fn tick_node(registered: &mut RegisteredNode) {
        if registered.context.state() != &NodeState::Running {
            return;
        }

        let node_name = registered.node.name();
        let ctx = &mut registered.context;
        ctx.start_tick();

        let node = &mut registered.node;
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            node.tick(Some(&mut *ctx));
        }));

        match result {
            Ok(()) => ctx.record_tick(),
            Err(panic_err) => {
                let error_msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                    format!("Node panicked: {}", s)
                } else if let Some(s) = panic_err.downcast_ref::<String>() {
                    format!("Node panicked: {}", s)
                } else {
                    "Node panicked with unknown error".to_string()
                };
                log::error!("Node '{}' failed: {}", node_name, error_msg);
                ctx.transition_to_error(error_msg);
            }
        }
    }

    /// Run until `stop()` or Ctrl+C
    pub fn run(&mut self) -> CoreResult<()> {
        self.run_with_limits(None, None)
    }

    /// Run for a wall-clock duration, then shut nodes down
    pub fn run_for(&mut self, duration: Duration) -> CoreResult<()> {
        self.run_with_limits(Some(duration), None)
    }

    /// Run a fixed number of passes, then shut nodes down
    pub fn run_ticks(&mut self, ticks: u64) -> CoreResult<()> {
        self.run_with_limits(None, Some(ticks))
    }

    fn run_with_limits(&mut self, duration: Option<Duration>, ticks: Option<u64>) -> CoreResult<()> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| CoreError::Internal(format!("Failed to create tokio runtime: {}", e)))?;

        self.running.store(true, Ordering::SeqCst);
        let running = self.running.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            eprintln!("{}", "\nCtrl+C received! Shutting down scheduler...".red());
            running.store(false, Ordering::SeqCst);
        }) {
            // Only one handler per process; later schedulers rely on stop()
            log::debug!("Signal handler not installed: {}", e);
        }

        log::info!("Scheduler '{}' starting ({} nodes)", self.scheduler_name, self.nodes.len());

        rt.block_on(async {
            let start_time = Instant::now();
            let mut remaining = ticks;

            while self.is_running() {
                if let Some(max_duration) = duration {
                    if start_time.elapsed() >= max_duration {
                        log::info!("Scheduler reached time limit of {:?}", max_duration);
                        break;
                    }
                }
                if let Some(0) = remaining {
                    break;
                }

                let pass_start = Instant::now();
                self.spin_once();
                remaining = remaining.map(|r| r - 1);

                let sleep = self.tick_period.saturating_sub(pass_start.elapsed());
                if !sleep.is_zero() {
                    tokio::time::sleep(sleep).await;
                }
            }
        });

        self.shutdown_nodes();
        self.running.store(false, Ordering::SeqCst);
        log::info!("Scheduler '{}' shutdown complete", self.scheduler_name);
        Ok(())
    }

    /// Run `shutdown()` on every initialized node
    pub fn shutdown_nodes(&mut self) {
        for registered in self.nodes.iter_mut().filter(|r| r.initialized) {
            let node_name = registered.node.name();
            let ctx = &mut registered.context;
            ctx.set_state(NodeState::Stopping);

            match registered.node.shutdown(ctx) {
                Ok(()) => log::info!("Shutdown node '{}' successfully", node_name),
                Err(e) => log::error!("Error shutting down node '{}': {}", node_name, e),
            }
            ctx.set_state(NodeState::Stopped);
            registered.initialized = false;
        }
    }

    /// Names of registered nodes in tick order
    pub fn get_node_list(&self) -> Vec<String> {
        self.nodes
            .iter()
            .map(|registered| registered.node.name().to_string())
            .collect()
    }

    /// Runtime context of a registered node
    pub fn node_info(&self, name: &str) -> Option<&NodeInfo> {
        self.nodes
            .iter()
            .find(|registered| registered.node.name() == name)
            .map(|registered| &registered.context)
    }

    pub fn set_node_logging(&mut self, name: &str, enabled: bool) -> &mut Self {
        if let Some(registered) = self.nodes.iter_mut().find(|r| r.node.name() == name) {
            registered.context.set_logging(enabled);
        }
        self
    }
}
