//! HTTP server binary exposing the chat API.
//! Run with: cargo run --bin parlance-server

use std::process::ExitCode;

use parlance::startup;

fn main() -> ExitCode {
    startup::run()
}
