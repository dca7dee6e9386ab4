use invoicey_backend::client::HttpBackendClient;
use invoicey_chat::{ChatEngine, EngineSettings};
use invoicey_core::config::{AppConfig, LoadOptions};
use invoicey_core::domain::tenant::TenantId;

use crate::commands::CommandResult;

/// One-shot chat turn: run a single message through the engine against the
/// configured backend and print the reply JSON.
pub fn run(text: &str, tenant: &str) -> CommandResult {
    if text.trim().is_empty() {
        return CommandResult::failure("send", "invalid_arguments", "--text must not be blank", 2);
    }
    if tenant.trim().is_empty() {
        return CommandResult::failure(
            "send",
            "invalid_arguments",
            "--tenant must not be blank",
            2,
        );
    }

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("send", "config_validation", error.to_string(), 2);
        }
    };

    let backend = match HttpBackendClient::from_config(&config.backend) {
        Ok(backend) => backend,
        Err(error) => {
            return CommandResult::failure("send", "backend_client", error.to_string(), 3);
        }
    };
    let engine = ChatEngine::new(backend, EngineSettings::from_config(&config));

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "send",
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let tenant = TenantId::new(tenant.trim());
    let reply = runtime.block_on(engine.handle_message(text, &tenant));

    match serde_json::to_string_pretty(&reply) {
        Ok(output) => CommandResult { exit_code: 0, output },
        Err(error) => CommandResult::failure("send", "serialization", error.to_string(), 3),
    }
}
