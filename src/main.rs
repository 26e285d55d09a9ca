//! Reddit Monitor — Binary Entrypoint
//! Loads config, wires the Reddit source to the console reporter and polls
//! until Ctrl-C.

use anyhow::Context;
use reddit_monitor::report::{Reporter, ReporterMux, TracingReporter};
use reddit_monitor::{
    config, telemetry, CancellationToken, ConsoleReporter, RateLimitedPoller, RedditSource,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    // This enables REDDIT_MONITOR_CONFIG / REDDIT_ACCESS_TOKEN / RUST_LOG from .env
    let _ = dotenvy::dotenv();

    telemetry::init_tracing();

    let cfg = config::load_default().context("loading monitor config")?;
    // Missing credentials are fatal here, before the first request.
    let source = RedditSource::new(&cfg).context("invalid monitor config")?;

    if let Some(addr) = cfg.metrics_addr {
        telemetry::install_exporter(addr)?;
    }

    let mut sinks: Vec<Box<dyn Reporter>> = vec![Box::new(ConsoleReporter::stdout())];
    if telemetry::json_logs() {
        sinks.push(Box::new(TracingReporter));
    }
    let reporter = ReporterMux::new(sinks);
    let mut poller = RateLimitedPoller::new(source, reporter).with_show_limit(cfg.show_limit);

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("ctrl-c received, stopping");
                    cancel.cancel();
                }
                Err(e) => tracing::warn!(error = %e, "cannot listen for ctrl-c"),
            }
        });
    }

    if let Err(e) = poller.run(&cfg.topic, &cancel).await {
        tracing::error!(error = %e, topic = %cfg.topic, "monitoring stopped");
        return Err(e.into());
    }

    tracing::info!(
        posts = poller.stats().item_count(),
        users = poller.stats().contributor_count(),
        "monitor finished"
    );
    Ok(())
}
