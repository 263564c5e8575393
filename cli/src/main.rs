use clap::{Parser, Subcommand};
use spawnwatch_cli::commands;
use spawnwatch_cli::logging;
use spawnwatch_cli::readline;
use spawnwatch_cli::CliContext;
use spawnwatch_core::{EventId, SpawnId};
use std::io::Write;

#[tokio::main]
async fn main() -> Result<(), String> {
    let _log_guard = logging::init();
    let ctx = CliContext::new();

    // Open the configured spawn table if one exists
    let data_file = ctx.data_file().await;
    if data_file.exists() {
        if let Err(err) = commands::load(None, &ctx).await {
            tracing::warn!(error = %err, "Failed to open spawn data");
        }
    }

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "spawn point queries")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a JSON spawn dump into the data file
    Import {
        #[arg(short, long)]
        path: String,
    },
    /// Open a spawn parquet file (defaults to the configured data file)
    Load {
        #[arg(short, long)]
        path: Option<String>,
    },
    Show {
        #[arg(short, long)]
        id: SpawnId,
    },
    List {
        /// Comma separated spawn ids
        #[arg(short, long)]
        ids: Option<String>,
    },
    /// Spawn points inside a fence
    Area {
        #[arg(short, long)]
        fence: Option<String>,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        event: Option<EventId>,
        /// Only spawn points with unknown despawn time
        #[arg(short, long)]
        unknown: bool,
    },
    /// Upcoming spawn windows inside a fence
    Next {
        #[arg(short, long)]
        fence: Option<String>,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        event: Option<EventId>,
    },
    Retag {
        #[arg(short, long)]
        ids: String,
        #[arg(short, long)]
        event: EventId,
    },
    Save,
    Config,
    SetFence {
        #[arg(short, long)]
        path: Option<String>,
    },
    SetEvent {
        #[arg(short, long)]
        event: Option<EventId>,
    },
    Exit,
}

async fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "spawnwatch".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Import { path }) => commands::import(path, ctx).await?,
        Some(Commands::Load { path }) => commands::load(path.as_deref(), ctx).await?,
        Some(Commands::Show { id }) => commands::show(*id, ctx).await?,
        Some(Commands::List { ids }) => commands::list(ids.as_deref(), ctx).await?,
        Some(Commands::Area {
            fence,
            name,
            event,
            unknown,
        }) => {
            commands::area(fence.as_deref(), name.as_deref(), *event, *unknown, ctx).await?
        }
        Some(Commands::Next { fence, name, event }) => {
            commands::next(fence.as_deref(), name.as_deref(), *event, ctx).await?
        }
        Some(Commands::Retag { ids, event }) => commands::retag(ids, *event, ctx).await?,
        Some(Commands::Save) => commands::save(ctx).await?,
        Some(Commands::Config) => commands::show_config(ctx).await?,
        Some(Commands::SetFence { path }) => commands::set_fence(path.as_deref(), ctx).await?,
        Some(Commands::SetEvent { event }) => commands::set_event(*event, ctx).await?,
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
