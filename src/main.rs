use anyhow::Context;
use clap::Parser;
use placement_predictor::utils::{logger, validation::Validate};
use placement_predictor::{CliConfig, HttpServer, Predictor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入設定並套用命令列覆蓋
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.logging.json {
        logger::init_json_logger(cli.verbose, config.logging.level.as_deref());
    } else {
        logger::init_cli_logger(cli.verbose, config.logging.level.as_deref());
    }

    tracing::info!("Starting placement-predictor");
    if cli.verbose {
        tracing::debug!("Resolved config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let predictor = Predictor::from_config(&config.model, config.score_bounds());
    let server = HttpServer::new(predictor, config.server.max_body_bytes)
        .with_read_timeout(config.read_timeout());

    let addr = config.bind_address();
    let listener = HttpServer::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    server
        .serve_with_shutdown(listener, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("⚠️ Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
        .context("server stopped with an error")?;

    tracing::info!("👋 placement-predictor stopped");
    Ok(())
}
