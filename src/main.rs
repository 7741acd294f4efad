//! The tollgate service binary.
//!
//! Run with:
//!   TOLLGATE_ADDR=127.0.0.1:8080 cargo run
//!
//! Try:
//!   curl -H 'Authorization: 123' http://localhost:8080/users/42
//!   curl -i http://localhost:8080/users/42

use std::process::ExitCode;

use tollgate::{Config, Server, app};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match Server::new(config.addr).serve(app(&config)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("server error: {e}");
            ExitCode::FAILURE
        }
    }
}
