use std::env;
use std::sync::{Mutex, OnceLock};

use invoicey_cli::commands::{config, doctor, send, start};
use serde_json::Value;

#[test]
fn start_returns_success_with_valid_env() {
    with_env(&[("INVOICEY_BACKEND_API_TOKEN", "cb_test")], || {
        let result = start::run();
        assert_eq!(result.exit_code, 0, "expected successful start preflight");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "start");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn start_returns_config_failure_without_token() {
    with_env(&[], || {
        let result = start::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "start");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn start_flags_noncompliant_token_prefix() {
    with_env(&[("INVOICEY_BACKEND_API_TOKEN", "not-a-chatbot-token")], || {
        let result = start::run();
        assert_eq!(result.exit_code, 2, "expected token format failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "backend_token_format");
    });
}

#[test]
fn send_rejects_blank_text() {
    with_env(&[("INVOICEY_BACKEND_API_TOKEN", "cb_test")], || {
        let result = send::run("   ", "t1");
        assert_eq!(result.exit_code, 2, "expected argument validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "send");
        assert_eq!(payload["error_class"], "invalid_arguments");
    });
}

#[test]
fn send_renders_the_greeting_without_touching_the_backend() {
    with_env(&[("INVOICEY_BACKEND_API_TOKEN", "cb_test")], || {
        let result = send::run("hello", "68dfd3eceee9d45175067cbd");
        assert_eq!(result.exit_code, 0, "expected greeting reply");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["bot"], "Hello! I’m your assistant bot.");
        assert_eq!(payload["commands"].as_array().map(|commands| commands.len()), Some(5));
    });
}

#[test]
fn config_redacts_the_token_and_attributes_its_source() {
    with_env(&[("INVOICEY_BACKEND_API_TOKEN", "cb_live_123456")], || {
        let output = config::run();

        assert!(output.starts_with("effective config (source precedence: env > file > default):"));
        assert!(output
            .contains("- backend.api_token = cb_*** (source: env (INVOICEY_BACKEND_API_TOKEN))"));
        assert!(!output.contains("cb_live_123456"), "raw token must never be printed");
        assert!(output.contains("- matching.acceptance_threshold = 70 (source: default)"));
    });
}

#[test]
fn doctor_json_reports_an_unreachable_backend() {
    with_env(
        &[
            ("INVOICEY_BACKEND_API_TOKEN", "cb_test"),
            ("INVOICEY_BACKEND_BASE_URL", "http://127.0.0.1:9"),
            ("INVOICEY_BACKEND_TIMEOUT_SECS", "1"),
        ],
        || {
            let output = doctor::run(true);
            let report = parse_payload(&output);

            assert_eq!(report["overall_status"], "fail");
            assert_eq!(report["checks"][0]["name"], "config_validation");
            assert_eq!(report["checks"][0]["status"], "pass");
            assert_eq!(report["checks"][1]["name"], "backend_token_format");
            assert_eq!(report["checks"][1]["status"], "pass");
            assert_eq!(report["checks"][2]["name"], "backend_reachability");
            assert_eq!(report["checks"][2]["status"], "fail");
        },
    );
}

#[test]
fn doctor_human_rendering_marks_skipped_checks() {
    with_env(&[], || {
        let output = doctor::run(false);

        assert!(output.starts_with("doctor: one or more readiness checks failed"));
        assert!(output.contains("- [fail] config_validation:"));
        assert!(output
            .contains("- [skip] backend_token_format: skipped because configuration did not load"));
        assert!(output
            .contains("- [skip] backend_reachability: skipped because configuration did not load"));
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "INVOICEY_BACKEND_BASE_URL",
        "INVOICEY_BACKEND_API_TOKEN",
        "INVOICEY_BACKEND_TIMEOUT_SECS",
        "INVOICEY_MATCHING_ACCEPTANCE_THRESHOLD",
        "INVOICEY_MATCHING_STRONG_MATCH_THRESHOLD",
        "INVOICEY_INVOICE_TITLE",
        "INVOICEY_INVOICE_RECENT_LIMIT",
        "INVOICEY_SERVER_BIND_ADDRESS",
        "INVOICEY_SERVER_HEALTH_CHECK_PORT",
        "INVOICEY_LOGGING_LEVEL",
        "INVOICEY_LOGGING_FORMAT",
        "INVOICEY_LOG_LEVEL",
        "INVOICEY_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
