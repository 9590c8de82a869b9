mod commands;

use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::{ExportOptions, ImportCommandOptions, run_export, run_import};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,

    /// Optional TOML config file; command line flags take precedence
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// More output (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only print warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

/// Overrides for where the project and its strings live.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Directory whose subdirectories are scanned for modules
    #[arg(short, long)]
    pub root: Option<String>,

    /// Resource directory inside each module
    #[arg(long)]
    pub res_path: Option<String>,

    /// Name of the per-locale strings document
    #[arg(long)]
    pub strings_file: Option<String>,

    /// Locale code used for the base `values` directory
    #[arg(long)]
    pub base_locale: Option<String>,

    /// Write a JSON run report to this path (`-` for stdout)
    #[arg(long)]
    pub report: Option<String>,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Export every module's strings into one spreadsheet, one sheet per module.
    Export {
        #[command(flatten)]
        project: ProjectArgs,

        /// The spreadsheet to write (.xlsx, or .csv for one file per module)
        #[arg(short, long)]
        output: Option<String>,

        /// Text of the header's first cell
        #[arg(long)]
        label: Option<String>,
    },

    /// Merge the first sheet of a spreadsheet into every module's strings.
    Import {
        #[command(flatten)]
        project: ProjectArgs,

        /// The spreadsheet to read (.xlsx, .xls, .ods or .csv)
        #[arg(short, long)]
        input: Option<String>,

        /// Indent width of written documents
        #[arg(long)]
        indent: Option<usize>,

        /// Read and merge, but do not write any file
        #[arg(long)]
        dry_run: bool,
    },
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    match args.commands {
        Commands::Export {
            project,
            output,
            label,
        } => run_export(ExportOptions {
            config: args.config,
            project,
            output,
            label,
        }),
        Commands::Import {
            project,
            input,
            indent,
            dry_run,
        } => run_import(ImportCommandOptions {
            config: args.config,
            project,
            input,
            indent,
            dry_run,
        }),
    }
}
