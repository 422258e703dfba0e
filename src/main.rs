use std::process::ExitCode;

fn main() -> ExitCode {
    slowhttp::app::run()
}
