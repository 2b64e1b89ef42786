//! titan-invoke CLI binary entry point.

use std::io::Read;

use clap::Parser;
use titan_invoke::cli::{report_line, Cli};
use titan_invoke::config::ClientConfig;
use titan_invoke::error::InvokeError;
use titan_invoke::generation::generate_batch;
use titan_invoke::provider::InvocationClient;
use titan_invoke::types::GenerationResponse;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}", report_line(&e));
            std::process::exit(1);
        }
    }
}

/// Returns whether every prompt succeeded; per-prompt failures are reported as they occur.
async fn run(cli: Cli) -> Result<bool, InvokeError> {
    let prompts = if cli.prompts.is_empty() {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| InvokeError::InvalidArgument(format!("failed to read stdin: {e}")))?;
        vec![buf]
    } else {
        cli.prompts.clone()
    };

    let client = InvocationClient::new(cli.model(), cli.client_config(ClientConfig::from_env()))?;
    let generation = cli.generation_config();

    if let [prompt] = prompts.as_slice() {
        let response = client.invoke_detailed(prompt, &generation).await?;
        print_response(&response, cli.json)?;
        return Ok(true);
    }

    let results = generate_batch(&client, prompts.as_slice(), &generation, cli.concurrency).await;
    let mut all_succeeded = true;
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(response) => print_response(&response, cli.json)?,
            Err(e) => {
                eprintln!("[prompt {}] {}", index + 1, report_line(&e));
                all_succeeded = false;
            }
        }
    }
    Ok(all_succeeded)
}

fn print_response(response: &GenerationResponse, json: bool) -> Result<(), InvokeError> {
    let text = response.output_text()?;
    if !json {
        println!("{text}");
        return Ok(());
    }

    let document = serde_json::json!({
        "text": text,
        "completionReason": response.completion_reason(),
        "usage": response.usage(),
        "requestId": response.request_id,
    });
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
