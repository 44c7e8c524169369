use log::{error, info, warn};
use std::{path::PathBuf, process::ExitCode};
use tokio::select;
use tokio_util::sync::CancellationToken;
use uptime_monitor::{Error, logging};

#[tokio::main]
async fn main() -> ExitCode {
    let settings = match logging::LogSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = logging::init(&settings) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let args: Vec<_> = std::env::args_os().skip(1).collect();
    let [config_path] = args.as_slice() else {
        error!("Usage: uptime-monitor <config_file_path>");
        return ExitCode::FAILURE;
    };
    let config_path = PathBuf::from(config_path);

    let token = CancellationToken::new();
    let mut monitor = tokio::spawn({
        let token = token.clone();
        async move { uptime_monitor::run(&config_path, token).await }
    });

    select! {
        () = shutdown_signal() => {
            token.cancel();
            warn!("Monitoring stopped by user.");
            ExitCode::SUCCESS
        }
        result = &mut monitor => match result {
            Ok(Ok(())) => {
                info!("Monitoring finished");
                ExitCode::SUCCESS
            }
            Ok(Err(Error::Config(e))) => {
                error!("unable to parse provided configuration. {e}");
                ExitCode::FAILURE
            }
            Ok(Err(e)) => {
                error!("unhandled error while monitoring endpoints: {e}");
                ExitCode::FAILURE
            }
            Err(e) => {
                error!("unhandled failure while monitoring endpoints: {e}");
                ExitCode::FAILURE
            }
        }
    }
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
