use std::process::ExitCode;

fn main() -> ExitCode {
    invoicey_cli::run()
}
