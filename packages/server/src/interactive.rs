//! Interactive mode for the server.
//!
//! Prompts the user for the listen address and reload behavior before
//! starting the server.

use dialoguer::{Confirm, Input};

use crate::ServerError;
use crate::config::AppConfig;

/// Runs the server in interactive mode, prompting for configuration.
///
/// Values from `config` are offered as defaults; the answers replace them
/// before delegating to [`super::run_server`].
///
/// # Errors
///
/// Returns [`ServerError`] if the underlying server fails to start.
#[allow(clippy::future_not_send)]
pub async fn run(mut config: AppConfig) -> Result<(), ServerError> {
    println!("Noto Festival Map Server");
    println!();

    config.server.bind_addr = Input::new()
        .with_prompt("Bind address")
        .default(config.server.bind_addr.clone())
        .interact_text()
        .unwrap_or_else(|_| config.server.bind_addr.clone());

    config.server.port = Input::new()
        .with_prompt("Port")
        .default(config.server.port)
        .interact_text()
        .unwrap_or(config.server.port);

    config.reload_per_request = Confirm::new()
        .with_prompt("Reload input files on every request?")
        .default(config.reload_per_request)
        .interact()
        .unwrap_or(config.reload_per_request);

    if !Confirm::new()
        .with_prompt(format!(
            "Start server on {}:{}?",
            config.server.bind_addr, config.server.port
        ))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server(config).await
}
