//! Panel modules command line.
//!
//! # Overview
//!
//! ```text
//!   plinth-modules ──▶ config (TOML, optional) ──▶ Panel
//!                                                    │
//!        ┌───────────────────────┬───────────────────┼────────────────────┐
//!        ▼                       ▼                   ▼                    ▼
//!   introducers             domain name          modules              front page
//!   (edit session ─▶        (atomic write)       (setup, enable,      (shortcuts)
//!    restart node)                                disable, status)
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use plinth_modules::actions::ActionRunner;
use plinth_modules::config::load_or_default;
use plinth_modules::lifecycle::Panel;
use plinth_modules::modules;
use plinth_modules::observability::logging::init_logging;
use plinth_modules::service::ServiceQuery;
use plinth_modules::tahoe::TahoeError;

#[derive(Parser)]
#[command(name = "plinth-modules")]
#[command(about = "Manage panel modules and the Tahoe-LAFS introducer list", long_about = None)]
struct Cli {
    /// Configuration file (TOML). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the storage node's introducers
    Introducers {
        #[command(subcommand)]
        command: IntroducerCommand,
    },
    /// Show or set the Tahoe-LAFS domain name
    Domain {
        #[command(subcommand)]
        command: DomainCommand,
    },
    /// Install and toggle panel modules
    Module {
        #[command(subcommand)]
        command: ModuleCommand,
    },
}

#[derive(Subcommand)]
enum IntroducerCommand {
    /// List configured introducers
    List,
    /// Add or update an introducer
    Add { pet_name: String, furl: String },
    /// Remove an introducer
    Remove { pet_name: String },
    /// Show the introducer hosted on this box
    Local,
}

#[derive(Subcommand)]
enum DomainCommand {
    /// Print the configured domain name
    Show,
    /// Set the domain name the nodes are reachable under
    Set { name: String },
}

#[derive(Subcommand)]
enum ModuleCommand {
    /// List available modules
    List,
    /// Install and configure a module
    Setup { name: String },
    /// Enable a module's service
    Enable { name: String },
    /// Disable a module's service
    Disable { name: String },
    /// Show a module's state
    Status { name: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_or_default(cli.config.as_deref())?;
    init_logging(&config.observability);

    let panel = Panel::bootstrap(config)?;

    match cli.command {
        Commands::Introducers { command } => introducers(&panel, command).await?,
        Commands::Domain { command } => domain(&panel, command)?,
        Commands::Module { command } => module(&panel, command).await?,
    }

    Ok(())
}

async fn introducers<A, Q>(
    panel: &Panel<A, Q>,
    command: IntroducerCommand,
) -> Result<(), Box<dyn std::error::Error>>
where
    A: ActionRunner + Clone + Sync,
    Q: ServiceQuery + Clone + Sync,
{
    let node = panel.tahoe();

    let result = match command {
        IntroducerCommand::List => {
            let list = node.introducers()?.list()?;
            return print_json(&list);
        }
        IntroducerCommand::Local => {
            let local = node.local_introducer()?;
            return print_json(&local);
        }
        IntroducerCommand::Add { pet_name, furl } => {
            node.introducers()?.add(&pet_name, &furl).await
        }
        IntroducerCommand::Remove { pet_name } => node.introducers()?.remove(&pet_name).await,
    };

    match result {
        Err(e) if e.is_committed() => {
            eprintln!("warning: {}", e);
            Ok(())
        }
        other => other.map_err(|e: TahoeError| e.into()),
    }
}

fn domain<A, Q>(panel: &Panel<A, Q>, command: DomainCommand) -> Result<(), Box<dyn std::error::Error>>
where
    A: ActionRunner + Clone + Sync,
    Q: ServiceQuery + Clone + Sync,
{
    let node = panel.tahoe();
    match command {
        DomainCommand::Show => println!("{}", node.configured_domain_name()?),
        DomainCommand::Set { name } => node.set_domain_name(&name)?,
    }
    Ok(())
}

async fn module<A, Q>(
    panel: &Panel<A, Q>,
    command: ModuleCommand,
) -> Result<(), Box<dyn std::error::Error>>
where
    A: ActionRunner + Clone + Sync,
    Q: ServiceQuery + Clone + Sync,
{
    match command {
        ModuleCommand::List => print_json(&modules::ALL)?,
        ModuleCommand::Setup { name } => panel.module(&name)?.setup().await?,
        ModuleCommand::Enable { name } => panel.module(&name)?.enable().await?,
        ModuleCommand::Disable { name } => panel.module(&name)?.disable().await?,
        ModuleCommand::Status { name } => {
            let controller = panel.module(&name)?;
            controller.init().await;
            print_json(&controller.status().await)?
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
