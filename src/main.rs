use std::sync::Arc;
use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::watch;

use minimon::{
    cli::Cli,
    logging,
    source,
    Config, DesktopSink, GitDiffSampler, LogSink, NotificationSink, Supervisor,
};

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config)?;

    if cli.check {
        print_check(&config);
        return Ok(());
    }

    let level = cli.log_level(&config);
    let _guard = logging::init(&config.monitor_props, level).context("Failed to set up logging")?;

    tracing::info!("Starting MiniMon with config {}", cli.config.display());

    let (stop_tx, stop_rx) = watch::channel(false);
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(true);
    })
    .context("Failed to install signal handler")?;

    let sink: Arc<dyn NotificationSink> = if cli.log_only {
        Arc::new(LogSink)
    } else {
        Arc::new(DesktopSink)
    };

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(async move {
        let supervisor = Supervisor::new(&config, sink, Arc::new(GitDiffSampler));
        supervisor.run(stop_rx).await;
    });

    tracing::info!("MiniMon exited gracefully.");
    Ok(())
}

fn print_check(config: &Config) {
    let (accepted, rejected) = source::validate_all(&config.monitor_sources);

    for source in &accepted {
        println!(
            "ok      {} ({}) every {}s, idle ceiling {}s, {} template(s)",
            source.kind,
            source.path.display(),
            source.notification.notification_interval,
            source.notification.max_idle_time,
            source.notification.notification_set.len()
        );
    }
    for err in &rejected {
        println!("skipped {}", err);
    }

    println!("{} source(s) valid, {} skipped", accepted.len(), rejected.len());
}
