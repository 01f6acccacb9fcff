mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{checklist::ChecklistSubcommand, config::ConfigSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "guide",
    about = "Browse a published troubleshooting sheet and work through its steps",
    version,
    propagate_version = true
)]
struct Cli {
    /// Directory holding .guide/ (default: auto-detect from cwd)
    #[arg(long, global = true, env = "GUIDE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Published-CSV URL (overrides sheet_url in config)
    #[arg(long, global = true, env = "GUIDE_SHEET_URL", conflicts_with = "file")]
    url: Option<String>,

    /// Read the sheet from a local CSV file instead of fetching it
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write .guide/config.yaml in the current directory
    Init {
        /// Published-CSV URL to store in the config
        #[arg(long = "sheet-url")]
        sheet_url: Option<String>,

        /// Detail page URL used for share links and QR codes
        #[arg(long)]
        base_url: Option<String>,
    },

    /// List issues, optionally filtered
    List {
        /// Case-insensitive text to search for
        #[arg(long, short = 'q')]
        query: Option<String>,

        /// Only show this category ("all" shows every category)
        #[arg(long, short = 'c')]
        category: Option<String>,
    },

    /// List the categories present in the sheet
    Categories,

    /// Show one issue with its steps
    Show {
        /// Issue ID
        #[arg(long)]
        id: Option<String>,

        /// Show step progress and which step is next
        #[arg(long)]
        checklist: bool,

        /// Print a QR code linking to the issue's detail page
        #[arg(long)]
        qr: bool,
    },

    /// Work through an issue's steps in order
    Checklist {
        #[command(subcommand)]
        subcommand: ChecklistSubcommand,
    },

    /// Recently viewed issues
    Recent {
        /// Forget the history
        #[arg(long)]
        clear: bool,
    },

    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Serve the JSON API
    Serve {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "3141")]
        port: u16,

        /// Open the API root in a browser
        #[arg(long)]
        open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let overrides = cmd::SourceOverrides {
        url: cli.url,
        file: cli.file,
    };

    let result = match cli.command {
        Commands::Init {
            sheet_url,
            base_url,
        } => cmd::init::run(&root, sheet_url, base_url, cli.json),
        Commands::List { query, category } => cmd::list::run(
            &root,
            &overrides,
            query.as_deref(),
            category.as_deref(),
            cli.json,
        ),
        Commands::Categories => cmd::list::categories(&root, &overrides, cli.json),
        Commands::Show { id, checklist, qr } => {
            cmd::show::run(&root, &overrides, id.as_deref(), checklist, qr, cli.json)
        }
        Commands::Checklist { subcommand } => {
            cmd::checklist::run(&root, &overrides, subcommand, cli.json)
        }
        Commands::Recent { clear } => cmd::recent::run(&root, clear, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, &overrides, subcommand, cli.json),
        Commands::Serve { port, open } => cmd::serve::run(&root, &overrides, port, open),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
