use anyhow::Context as _;
use clap::Parser;
use fundamentals_core::{Context, RuntimeParams, Scheduler};
use ros2_fundamentals::MinimalPyPublisher;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "minimal_publisher")]
#[command(about = "Publish \"Hello World: <n>\" on /py_example_topic every 0.5 s")]
#[command(version)]
struct Cli {
    /// Stop after this many milliseconds
    #[arg(short = 'd', long = "duration-ms", conflicts_with = "ticks")]
    duration_ms: Option<u64>,

    /// Stop after this many scheduler passes
    #[arg(short = 't', long = "ticks")]
    ticks: Option<u64>,

    /// YAML parameter file (tick_rate_hz, topic_capacity, enable_logging)
    #[arg(short = 'p', long = "params")]
    params: Option<PathBuf>,

    /// Disable per-node publish logging
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let params = match &cli.params {
        Some(path) => RuntimeParams::from_file(path)
            .with_context(|| format!("loading parameters from {}", path.display()))?,
        None => RuntimeParams::new(),
    };

    let ctx = Context::init_with_params(params).context("initializing runtime context")?;
    let node = MinimalPyPublisher::new(&ctx).context("creating minimal publisher")?;
    tracing::info!(
        node = node.name(),
        topic = node.publisher().topic_name(),
        "node ready"
    );

    let mut scheduler = Scheduler::from_params(ctx.params())?.with_name("minimal_publisher");
    scheduler.add(Box::new(node), 0, Some(!cli.quiet));

    match (cli.duration_ms, cli.ticks) {
        (Some(ms), _) => scheduler.run_for(Duration::from_millis(ms))?,
        (None, Some(ticks)) => scheduler.run_ticks(ticks)?,
        (None, None) => scheduler.run()?,
    }

    ctx.shutdown()?;
    Ok(())
}
