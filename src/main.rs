use std::process;

use cachedeck::{
    client::{ApiClient, retry::RetryPolicy},
    config,
    console::{Console, events::Event},
    error::AppError,
    infra::{error::InfraError, telemetry},
    surface::{Surface, TermSurface},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{Dispatch, Level, dispatcher, error};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (_cli_args, settings) = config::load_with_cli()?;

    telemetry::init(&settings.logging)?;

    let retry = RetryPolicy {
        max_retries: settings.retry.max_retries,
        base_delay: settings.retry.base_delay,
    };
    let api = ApiClient::new(settings.service.base_url.clone(), retry);
    let mut console = Console::new(api, TermSurface::new());

    console.startup().await;
    console.surface_mut().show_notice("type `help` for commands");

    let mut ticker = tokio::time::interval(settings.refresh.interval);
    ticker.tick().await; // Skip the first immediate tick

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                console.handle(Event::RefreshTick).await;
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        let trimmed = line.trim();
                        if trimmed.is_empty() {
                            continue;
                        }
                        match Event::parse(trimmed) {
                            Ok(Event::Quit) => break,
                            Ok(event) => console.handle(event).await,
                            Err(err) => {
                                console.surface_mut().show_notice(&err.to_string());
                            }
                        }
                    }
                    // Stdin closed: the operator detached, shut down cleanly.
                    Ok(None) => break,
                    Err(err) => return Err(AppError::from(InfraError::Io(err))),
                }
            }
        }
    }

    Ok(())
}
