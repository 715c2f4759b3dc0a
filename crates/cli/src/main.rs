use std::process::ExitCode;

fn main() -> ExitCode {
    agrosoft_cli::run()
}
