use invoicey_backend::client::HttpBackendClient;
use invoicey_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;

use crate::commands::CommandResult;

/// Startup preflight: everything the server does before binding a socket,
/// without touching the network.
pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("start", "config_validation", error.to_string(), 2);
        }
    };

    if !config.backend.api_token.expose_secret().starts_with("cb_") {
        return CommandResult::failure(
            "start",
            "backend_token_format",
            "backend.api_token should start with `cb_`",
            2,
        );
    }

    if let Err(error) = HttpBackendClient::from_config(&config.backend) {
        return CommandResult::failure("start", "backend_client", error.to_string(), 3);
    }

    CommandResult::success(
        "start",
        format!(
            "startup preflight passed; run the invoicey-server binary to serve {}",
            config.server.bind_address
        ),
    )
}
