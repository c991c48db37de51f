//! razorlog server binary.
//!
//! Loads configuration, starts logging, opens the SQLite store (falling back
//! to the seeded in-memory store when that fails) and serves the API until
//! Ctrl+C or SIGTERM.

use log::{error, info};
use razorlog_core::{init_logging, StoreBackend};
use razorlog_server::build_router;
use razorlog_server::config::ServerConfig;
use razorlog_server::state::AppState;
use std::error::Error;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=server status=error error={}", err);
            eprintln!("razorlog_server: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::from_env()?;
    init_logging(&config.log_level, &config.log_dir)?;

    let database_path = config.database_path.clone();
    let backend = tokio::task::spawn_blocking(move || {
        StoreBackend::open_or_fallback(database_path.as_deref())
    })
    .await?;
    let state = AppState::new(backend);
    info!(
        "event=server_start module=server status=ok backend={} addr={}",
        state.backend_kind(),
        config.socket_addr()
    );

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(
                "event=signal_install module=server status=error signal=ctrl_c error={}",
                err
            );
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(
                    "event=signal_install module=server status=error signal=term error={}",
                    err
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("event=shutdown_signal module=server status=ok");
}
