//! Binary entrypoint for the `runagents` CLI.

#[tokio::main]
async fn main() {
    let code = runagents_cli::run().await;
    if code != 0 {
        std::process::exit(code);
    }
}
