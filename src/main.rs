use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "freedom",
    about = "Household financial freedom timeline planner (incomes + rentals + debt + retirement)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the projection API over HTTP.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Project a scenario from a JSON payload file and print the yearly records.
    Project { path: PathBuf },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { port } => {
            if let Err(e) = freedom::api::run_http_server(port).await {
                tracing::error!("server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Project { path } => {
            let json = match fs::read_to_string(&path) {
                Ok(json) => json,
                Err(e) => {
                    eprintln!("cannot read {}: {e}", path.display());
                    std::process::exit(1);
                }
            };
            match freedom::api::project_from_json(&json) {
                Ok(response) => {
                    let rendered = serde_json::to_string_pretty(&response)
                        .expect("projection response should serialize");
                    println!("{rendered}");
                }
                Err(msg) => {
                    eprintln!("invalid scenario: {msg}");
                    std::process::exit(1);
                }
            }
        }
    }
}
