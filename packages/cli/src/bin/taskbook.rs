use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::process;

use taskbook_cli::commands;
use taskbook_cli::{run_server, Config};

#[derive(Parser)]
#[command(name = "taskbook")]
#[command(about = "Taskbook - personal task notebook server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on (overrides TASKBOOK_PORT)
        #[arg(long)]
        port: Option<u16>,
        /// Data directory (overrides TASKBOOK_DATA_DIR)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Write all tasks as JSON
    Export {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Replace all tasks with the contents of a JSON export
    Import {
        /// File produced by `taskbook export` or GET /api/export
        file: PathBuf,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// List tasks in display order
    List {
        /// all, active, or done
        #[arg(short, long)]
        filter: Option<String>,
        /// Only tasks carrying this tag
        #[arg(short, long)]
        tag: Option<String>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = handle_command(cli.command).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(data_dir: Option<PathBuf>) -> anyhow::Result<Config> {
    let mut config = Config::from_env()?;
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    Ok(config)
}

async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Serve { port, data_dir } => {
            let mut config = load_config(data_dir)?;
            if let Some(port) = port {
                if port == 0 {
                    anyhow::bail!("Port 0 is out of valid range (1-65535)");
                }
                config.port = port;
            }
            run_server(config).await
        }
        Commands::Export { output, data_dir } => {
            let config = load_config(data_dir)?;
            let count = commands::export_tasks(&config.data_dir, output.as_deref()).await?;
            if let Some(path) = output {
                eprintln!(
                    "{} Exported {} tasks to {}",
                    "✓".green(),
                    count,
                    path.display()
                );
            }
            Ok(())
        }
        Commands::Import { file, data_dir } => {
            let config = load_config(data_dir)?;
            let count = commands::import_tasks(&config.data_dir, &file).await?;
            eprintln!(
                "{} Imported {} tasks into {}",
                "✓".green(),
                count,
                config.data_dir.display()
            );
            Ok(())
        }
        Commands::List {
            filter,
            tag,
            data_dir,
        } => {
            let config = load_config(data_dir)?;
            commands::list_tasks(&config.data_dir, filter.as_deref(), tag).await
        }
    }
}
