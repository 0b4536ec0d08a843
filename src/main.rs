use std::process::ExitCode;

fn main() -> ExitCode {
    csv_permute::run()
}
