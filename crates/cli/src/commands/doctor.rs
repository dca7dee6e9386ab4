use invoicey_backend::client::HttpBackendClient;
use invoicey_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_token_format(&config));
            checks.push(check_backend_reachability(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "backend_token_format",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            checks.push(DoctorCheck {
                name: "backend_reachability",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_token_format(config: &AppConfig) -> DoctorCheck {
    if config.backend.api_token.expose_secret().starts_with("cb_") {
        DoctorCheck {
            name: "backend_token_format",
            status: CheckStatus::Pass,
            details: "backend token carries the expected `cb_` prefix".to_string(),
        }
    } else {
        DoctorCheck {
            name: "backend_token_format",
            status: CheckStatus::Fail,
            details: "backend.api_token should start with `cb_`".to_string(),
        }
    }
}

/// Any HTTP response from the base URL counts as reachable; the probe
/// checks connectivity, not credentials.
fn check_backend_reachability(config: &AppConfig) -> DoctorCheck {
    let client = match HttpBackendClient::from_config(&config.backend) {
        Ok(client) => client,
        Err(error) => {
            return DoctorCheck {
                name: "backend_reachability",
                status: CheckStatus::Fail,
                details: format!("failed to build backend client: {error}"),
            };
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return DoctorCheck {
                name: "backend_reachability",
                status: CheckStatus::Fail,
                details: format!("failed to initialize async runtime: {error}"),
            };
        }
    };

    match runtime.block_on(client.ping()) {
        Ok(status) => DoctorCheck {
            name: "backend_reachability",
            status: CheckStatus::Pass,
            details: format!(
                "backend `{}` responded with status {status}",
                config.backend.base_url
            ),
        },
        Err(error) => DoctorCheck {
            name: "backend_reachability",
            status: CheckStatus::Fail,
            details: format!("backend `{}` unreachable: {error}", config.backend.base_url),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
