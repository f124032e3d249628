use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use conveyor_config::ConveyorConfig;
use conveyor_core::queue::{BoundedQueue, OrderPolicy, WakePolicy};
use conveyor_core::workers::{Console, PoolReport, WorkerPool};

#[derive(Parser, Debug)]
#[command(version, about, long_about=None)]
struct Args {
    /// TOML configuration file, command line flags override its values
    #[arg(short, long)]
    config_file: Option<PathBuf>,

    /// Maximum number of jobs buffered at once
    #[arg(long, allow_negative_numbers = true)]
    capacity: Option<i64>,

    /// Number of producer threads
    #[arg(short, long)]
    producers: Option<usize>,

    /// Number of consumer threads
    #[arg(long)]
    consumers: Option<usize>,

    /// Jobs each producer creates before stopping, runs until Ctrl-C when absent
    #[arg(short, long)]
    items: Option<u64>,

    /// Which job a consumer takes next: lifo or fifo
    #[arg(long)]
    order: Option<OrderPolicy>,

    /// Who gets woken on a state change: broadcast or targeted
    #[arg(long)]
    wake: Option<WakePolicy>,

    /// Log worker lifecycle events
    #[arg(short, long)]
    verbose: bool,
}

fn resolve_config(args: &Args) -> anyhow::Result<ConveyorConfig> {
    let mut config = match &args.config_file {
        Some(path) => conveyor_config::from_path::<ConveyorConfig, _>(path.as_path())
            .with_context(|| format!("failed to load config file {}", path.display()))?,
        None => ConveyorConfig::default(),
    };

    if let Some(capacity) = args.capacity {
        config.queue.capacity = capacity;
    }
    if let Some(order) = args.order {
        config.queue.order = order.into();
    }
    if let Some(wake) = args.wake {
        config.queue.wake = wake.into();
    }
    if let Some(producers) = args.producers {
        config.workers.producers = producers;
    }
    if let Some(consumers) = args.consumers {
        config.workers.consumers = consumers;
    }
    if args.items.is_some() {
        config.workers.items = args.items;
    }

    config.validate()?;
    Ok(config)
}

fn print_summary(report: &PoolReport) {
    for worker in report.producers.iter().chain(report.consumers.iter()) {
        println!("{} {}: {}", worker.role, worker.name, worker.processed);
    }
    println!(
        "produced {} jobs, consumed {} jobs",
        report.produced(),
        report.consumed()
    );
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let config = resolve_config(&args)?;
    let queue = Arc::new(BoundedQueue::with_options(config.queue_options()?)?);
    let plan = config.pool_plan()?;

    let interrupted_queue = Arc::clone(&queue);
    ctrlc::set_handler(move || {
        if interrupted_queue.close() {
            tracing::info!("interrupt received, closing queue");
        }
    })
    .context("error setting ctrl-c handler")?;

    tracing::info!(
        capacity = queue.capacity(),
        order = %queue.order(),
        wake = %queue.wake_policy(),
        producers = plan.get_producers(),
        consumers = plan.get_consumers(),
        "starting conveyor"
    );

    let pool = WorkerPool::spawn(Arc::clone(&queue), Arc::new(Console::stdout()), plan)?;
    let report = pool.join()?;

    tracing::info!(
        produced = report.produced(),
        consumed = report.consumed(),
        "all workers finished"
    );
    print_summary(&report);
    Ok(())
}
