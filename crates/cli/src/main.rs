// chanmap CLI - reconcile channel-mapping files against a mapping store

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use chanmap_cli::commands::{self, CliError};
use chanmap_cli::exit_codes::EXIT_SUCCESS;

#[derive(Parser)]
#[command(name = "chanmap")]
#[command(about = "Reconcile channel-mapping files against a mapping store")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import mappings from a file or a folder of mapping files
    #[command(after_help = "\
Conflicting records are skipped and reported, never overwritten; fix the
file and re-run (re-running is always safe).

Examples:
  chanmap import mappings.txt --store project.db
  chanmap import mapping-dir/ --store project.db --json
  CHANMAP_STORE=project.db chanmap import mappings.txt")]
    Import {
        /// Mapping file, or directory of mapping files
        path: PathBuf,

        /// Mapping store database
        #[arg(long, env = "CHANMAP_STORE")]
        store: PathBuf,

        /// Output per-file JSON reports to stdout
        #[arg(long)]
        json: bool,
    },

    /// Delete mappings listed in a file (exact source/destination matches)
    #[command(after_help = "\
Only pairs present verbatim in both the file and the store are removed; a
destination since rebound to a different source is left alone.

Examples:
  chanmap delete mappings.txt --store project.db
  chanmap delete mapping-dir/ --store project.db --json")]
    Delete {
        /// Mapping file, or directory of mapping files
        path: PathBuf,

        /// Mapping store database
        #[arg(long, env = "CHANMAP_STORE")]
        store: PathBuf,

        /// Output per-file JSON reports to stdout
        #[arg(long)]
        json: bool,
    },

    /// Remove every mapping in the store
    Clear {
        /// Mapping store database
        #[arg(long, env = "CHANMAP_STORE")]
        store: PathBuf,

        /// Confirm the irreversible clear
        #[arg(long)]
        yes: bool,
    },

    /// Write the store's current mappings as tab-delimited records
    Export {
        /// Mapping store database
        #[arg(long, env = "CHANMAP_STORE")]
        store: PathBuf,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  chanmap-recon ", env!("CARGO_PKG_VERSION"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Import { path, store, json } => commands::cmd_import(&store, &path, json),
        Commands::Delete { path, store, json } => commands::cmd_delete(&store, &path, json),
        Commands::Clear { store, yes } => commands::cmd_clear(&store, yes),
        Commands::Export { store, output } => commands::cmd_export(&store, output.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}
