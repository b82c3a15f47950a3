//! CLI entrypoint for review-reply
//!
//! This is the main binary that wires together all layers using
//! dependency injection and runs the HTTP server.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use review_reply_application::{ConversationLogger, ProcessReviewUseCase};
use review_reply_infrastructure::{
    ConfigLoader, FileConfig, FileLoggingConfig, JsonlConversationLogger, OpenAiGateway,
    OpenAiGatewayConfig,
};
use review_reply_presentation::{AppState, Cli, build_router, serve};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_FILE_PREFIX: &str = "review-reply.log";

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = if cli.no_config {
        ConfigLoader::load_without_files()
    } else {
        ConfigLoader::load(cli.config.as_ref())
    }
    .map_err(|e| anyhow!("Failed to load configuration: {}", e))?;

    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    if cli.show_config {
        show_config(&cli, &config)?;
        return Ok(());
    }

    let _guard = init_tracing(&cli, &config.logging);

    let issues = config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("Config: {}", issue.message);
    }
    let errors: Vec<_> = issues.iter().filter(|i| i.is_error()).collect();
    if !errors.is_empty() {
        for issue in &errors {
            error!("Config: {}", issue.message);
        }
        bail!(
            "Invalid configuration: {}",
            errors
                .iter()
                .map(|i| i.message.as_str())
                .collect::<Vec<_>>()
                .join("; ")
        );
    }

    info!("Starting review-reply");

    // === Dependency Injection ===
    let gateway_config = OpenAiGatewayConfig::from_file_config(&config.openai)
        .context("OpenAI gateway is not configured")?;
    let gateway = Arc::new(OpenAiGateway::new(gateway_config)?);

    let mut use_case = ProcessReviewUseCase::new(gateway);
    if let Some(path) = &config.logging.conversation_log {
        let logger = JsonlConversationLogger::open(path).with_context(|| {
            format!("Failed to open conversation log {}", path.display())
        })?;
        info!("Conversation log: {}", logger.path().display());
        use_case = use_case.with_conversation_logger(Arc::new(logger) as Arc<dyn ConversationLogger>);
    }

    let router = build_router(AppState::new(use_case));

    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    let shutdown = CancellationToken::new();
    tokio::spawn(wait_for_shutdown(shutdown.clone()));

    serve(listener, router, shutdown).await?;

    info!("Server stopped");
    Ok(())
}

/// Stderr logging, plus a daily-rotated file when `logging.file_dir` is set.
///
/// `RUST_LOG` takes precedence over the `-v` count.
fn init_tracing(cli: &Cli, logging: &FileLoggingConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));

    let (file_layer, guard) = match &logging.file_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

fn show_config(cli: &Cli, config: &FileConfig) -> Result<()> {
    if cli.no_config {
        println!("Configuration files disabled (--no-config)");
    } else {
        ConfigLoader::print_config_sources(cli.config.as_ref());
    }

    let mut effective = config.clone();
    if effective.openai.api_key.is_some() {
        effective.openai.api_key = Some("********".to_string());
    }

    println!();
    println!("Effective configuration:");
    println!(
        "{}",
        toml::to_string_pretty(&effective).context("Failed to render configuration")?
    );
    Ok(())
}

async fn wait_for_shutdown(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    token.cancel();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filters_parse() {
        for args in [
            &["review-reply"][..],
            &["review-reply", "-v"],
            &["review-reply", "-vv"],
            &["review-reply", "-vvvv"],
        ] {
            let cli = Cli::parse_from(args);
            assert!(
                EnvFilter::try_new(cli.log_filter()).is_ok(),
                "filter: {}",
                cli.log_filter()
            );
        }
    }

    #[test]
    fn test_startup_address_is_logged_by_default() {
        let cli = Cli::parse_from(["review-reply"]);
        let filter = EnvFilter::try_new(cli.log_filter()).unwrap();
        assert!(filter.to_string().contains("review_reply=info"));
    }
}
