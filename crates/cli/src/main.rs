use std::process::ExitCode;

fn main() -> ExitCode {
    toyshop_cli::run()
}
