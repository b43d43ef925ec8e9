use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use study_planner::completion::CompletionClient;
use study_planner::config::{self, CliArgs};
use study_planner::{create_app, db, repo, run_migrations, AppState};
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber
///
/// `RUST_LOG` wins over the `--debug` default. The returned guard flushes the
/// log file on drop and must live as long as the process.
fn init_tracing(debug: bool, log_json: bool, log_dir: Option<&str>) -> Option<WorkerGuard> {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (writer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "study-planner.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(writer), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stdout), None),
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer);
    if log_json {
        builder.json().init();
    } else {
        builder.init();
    }

    guard
}

/// Periodically deletes sessions past their expiry
fn spawn_session_sweeper(pool: Arc<db::DbPool>, every: Duration) {
    if every.is_zero() {
        warn!("Session sweep interval is zero, expired sessions will not be purged");
        return;
    }

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;

            let pool = pool.clone();
            match tokio::task::spawn_blocking(move || repo::delete_expired_sessions(&pool)).await {
                Ok(Ok(0)) => debug!("No expired sessions to purge"),
                Ok(Ok(purged)) => info!("Purged {} expired sessions", purged),
                Ok(Err(e)) => warn!("Failed to purge expired sessions: {:#}", e),
                Err(e) => error!("Session sweeper task failed: {}", e),
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args = CliArgs::parse();
    let (debug, log_json) = (args.debug, args.log_json);
    let config = config::get_config(args);

    let _guard = init_tracing(debug, log_json, config.log_dir.as_deref());
    info!("Starting study planner with {:?}", config);

    if let Err(msg) = config.check() {
        error!("Invalid configuration: {}", msg);
        anyhow::bail!("Invalid configuration: {}", msg);
    }

    let pool = Arc::new(
        db::init_pool(&config.database_url)
            .with_context(|| format!("Failed to open database at {}", config.database_url))?,
    );

    {
        let mut conn = pool.get().context("Failed to get a database connection")?;
        run_migrations(&mut conn)?;
    }
    info!("Database ready at {}", config.database_url);

    if config.completion_api_key.is_none() {
        warn!("No completion API key configured; chat and chapter generation will fail");
    }
    let completions = CompletionClient::new(config.completion_settings())
        .context("Failed to build completion client")?;

    spawn_session_sweeper(pool.clone(), config.session_sweep_interval());

    let app = create_app(AppState {
        pool,
        completions: Arc::new(completions),
        session_ttl: config.session_ttl(),
    });

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("Listening on {}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
