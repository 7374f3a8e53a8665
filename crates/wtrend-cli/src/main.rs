use anyhow::Context;
use tokio::io::BufReader;
use wtrend_cli::{Session, SessionEnd};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config
    let cfg = wtrend_config::AppConfig::load().context("failed to load configuration")?;

    // Observability
    wtrend_obs::init("weather-trends", wtrend_cli::log_format(&cfg));
    tracing::debug!(
        db_path = %cfg.database.path,
        api_key = cfg.api_key.is_some(),
        "Configuration loaded"
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    let end = Session::new(cfg)
        .run(stdin, &mut stdout, shutdown)
        .await
        .context("terminal I/O failed")?;

    if end == SessionEnd::Interrupted {
        tracing::info!("Interrupted");
    }
    Ok(())
}
