pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "invoicey",
    about = "Invoicey operator CLI",
    long_about = "Operate Invoicey startup preflight, one-shot chat messages, config inspection, and readiness checks.",
    after_help = "Examples:\n  invoicey doctor --json\n  invoicey config\n  invoicey send --text 'hello' --tenant 68dfd3eceee9d45175067cbd"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Run startup preflight checks and return structured status output")]
    Start,
    #[command(about = "Send one chat message through the engine and print the reply JSON")]
    Send {
        #[arg(long, help = "Message text, e.g. 'get all products' or multi-line invoice details")]
        text: String,
        #[arg(long, help = "Tenant identifier the backend scopes data by")]
        tenant: String,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, backend token format, and backend reachability")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Start => commands::start::run(),
        Command::Send { text, tenant } => commands::send::run(&text, &tenant),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
