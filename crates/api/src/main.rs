//! Coresuite Express integration layer
//!
//! Run with: `coresuite <command>`
//!
//! Command results are printed to stdout as JSON for scripting.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::env;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{anyhow, Context};
use coresuite_app::utils::logging::{init_tracing, log_command_execution};
use coresuite_app::{rotate_key, status, AppContext};

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    init_tracing("info");

    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "loaded .env"),
        Err(err) => tracing::debug!(error = %err, "no .env file loaded"),
    }

    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().map_or("status", String::as_str);
    let started = Instant::now();

    let result = run(command, &args[args.len().min(1)..]).await;
    log_command_execution(command, started.elapsed(), result.is_ok());

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Command failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: &str, args: &[String]) -> anyhow::Result<()> {
    match command {
        "status" => {
            let ctx = AppContext::load().context("failed to initialise integrations")?;
            let report = status(&ctx);
            for provider in &report.enabled_providers {
                tracing::info!(provider, "provider enabled");
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        "rotate-key" => {
            let user_id = args
                .first()
                .ok_or_else(|| anyhow!("usage: coresuite rotate-key <user_id>"))?
                .parse::<i64>()
                .context("user_id must be an integer")?;

            let ctx = AppContext::load().context("failed to initialise integrations")?;
            let outcome = rotate_key(&ctx, user_id).await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);

            if outcome.success {
                Ok(())
            } else {
                Err(anyhow!(outcome.message))
            }
        }
        "help" => {
            print_help();
            Ok(())
        }
        unknown => {
            print_help();
            Err(anyhow!("unknown command: {unknown}"))
        }
    }
}

fn print_help() {
    println!("Coresuite Express integrations");
    println!();
    println!("USAGE:");
    println!("    coresuite <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("    status               Show enabled providers and storage paths (default)");
    println!("    rotate-key <user_id> Generate and persist a new Coresuite API key");
    println!("    help                 Show this help message");
}
