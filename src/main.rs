// src/main.rs
use std::process::ExitCode;
use suma_register::cli::{self, SystemCli};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args: SystemCli = match cli::parse_args() {
        Ok(args) => args,
        Err(code) => return code,
    };
    suma_register::init_tracing(args.common.verbose);

    cli::report(cli::run_system(args).await)
}
