//! Interactive terminal chat for parlance.
//!
//! Keeps a single conversation for the whole session so the model sees
//! the full history on every turn. Type `quit` or `exit` to leave.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use parlance::startup;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let state = match startup::initialize() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to start: {e}");
            return ExitCode::from(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    println!(
        "parlance v{} ({})",
        env!("CARGO_PKG_VERSION"),
        state.config.llm.model
    );
    println!("Type 'quit' or 'exit' to leave.");
    println!();

    let stdin = io::stdin();
    let mut conversation_id = None;

    loop {
        print!("You: ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Failed to read input: {e}");
                break;
            }
        }

        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text.eq_ignore_ascii_case("quit") || text.eq_ignore_ascii_case("exit") {
            break;
        }

        match rt.block_on(state.chat.send_message(text, conversation_id)) {
            Ok(reply) => {
                conversation_id = Some(reply.conversation_id);
                println!("Assistant: {}", reply.message.content);
                println!();
            }
            Err(e) => {
                eprintln!("Error: {e}");
                println!();
            }
        }
    }

    println!("Goodbye!");
    ExitCode::SUCCESS
}
