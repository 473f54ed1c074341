use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use pod_assignments::display::{print_summary, write_result_to_file};
use pod_assignments::web::{self, ServerConfig};
use pod_assignments::{format_result_with, load_vote_sheet, optimize};

const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Parser)]
#[command(
    name = "pod-assignments",
    about = "Weekly four-player pod assignments from availability votes",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Optimize one week of votes from a CSV or JSON vote sheet
    Optimize {
        /// Vote sheet (.csv, or .json with a top-level "votes" list)
        file: PathBuf,
        /// Print the result as JSON instead of text
        #[arg(long)]
        json: bool,
        /// Also write the output to this file
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Run the web server
    Web {
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
        /// CSV vote sheet that votes are appended to
        #[arg(long, default_value = "votes.csv")]
        votes: PathBuf,
        #[arg(long, env = "ADMIN_PASSWORD", default_value = DEFAULT_ADMIN_PASSWORD, hide_env_values = true)]
        admin_password: String,
    },
}

/// `RUST_LOG` when it parses, otherwise info for this crate.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("pod_assignments=info"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Web {
            port,
            bind,
            votes,
            admin_password,
        } => {
            if admin_password == DEFAULT_ADMIN_PASSWORD {
                warn!("using the default admin password, set ADMIN_PASSWORD to change it");
            }

            println!("Starting web server on {}:{}...", bind, port);
            println!("Votes are stored in {}", votes.display());

            web::start_server(ServerConfig {
                bind,
                port,
                votes_path: votes,
                admin_password,
            })
            .await?;
        }
        Commands::Optimize { file, json, output } => {
            println!("Loading votes from {}...", file.display());
            let sheet = load_vote_sheet(&file)?;
            println!("Loaded {} player votes (resubmissions merged)", sheet.availability.len());

            let result = optimize(&sheet.availability, &sheet.preferences);

            let rendered = if json {
                serde_json::to_string_pretty(&result)?
            } else {
                format_result_with(&result, |id| sheet.display_name(id))
            };
            println!("\n{}", rendered);

            if !json {
                print_summary(&result);
            }

            if let Some(path) = output {
                write_result_to_file(&rendered, &path)?;
                println!("\nResult saved to {}", path);
            }
        }
    }

    Ok(())
}
