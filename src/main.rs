use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match audioflow_server::run_with_config().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("audioflow_server: {e}");
            ExitCode::FAILURE
        }
    }
}
