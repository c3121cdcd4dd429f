#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

use authkeeper::adapters::HttpAuthApi;
use authkeeper::config::Config;
use authkeeper::domain::{Credentials, TokenPair};
use authkeeper::{SessionBuilder, runtime, telemetry};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();
    telemetry::init_telemetry();

    let api = Arc::new(HttpAuthApi::new(
        &config.service_url,
        Duration::from_secs(config.request_timeout_secs),
    )?);

    let mut builder = SessionBuilder::new(api).with_on_auth_change(|tokens| {
        // persistence belongs to the embedding application; the demo
        // binary just reports the transitions
        match tokens {
            Some(pair) => tracing::info!(expires_at = ?pair.access_expires_at, "Tokens updated"),
            None => tracing::info!("Session ended"),
        }
    });
    if let Some(raw) = &config.initial_tokens {
        let tokens: TokenPair = serde_json::from_str(raw)?;
        builder = builder.with_initial_tokens(tokens);
    }
    let session = builder.build();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    runtime::spawn_signal_handler(shutdown_tx);

    let workers = session.spawn_workers(&shutdown_rx);

    if session.store().state().is_signed_in() {
        tracing::info!("Resuming persisted session");
    } else {
        let credentials =
            Credentials { email: config.email.clone(), password: config.password.clone() };
        session.service().login(&credentials).await?;
    }

    let mut rx = shutdown_rx.clone();
    let _ = rx.wait_for(|&stop| stop).await;

    if session.service().logout().await.is_err() {
        tracing::debug!("Session already ended before shutdown");
    }
    for handle in workers {
        let _ = handle.await;
    }
    Ok(())
}
