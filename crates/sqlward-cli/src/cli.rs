use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Select,
    Insert,
    Update,
    Delete,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the configuration file to stdout
    Config,

    /// Generate default config
    #[clap(name = "defconfig")]
    DefConfig,

    /// Print the SQL and parameters for a JSON request without running it
    #[command(arg_required_else_help = true)]
    Build {
        /// Statement kind
        #[arg(value_enum)]
        kind: Kind,

        /// Configured table to build against
        #[arg(short, long)]
        table: String,

        /// JSON request; read from stdin when omitted or `-`
        #[arg(required = false)]
        request: Option<String>,
    },

    /// Run a JSON request against a SQLite database
    #[command(arg_required_else_help = true)]
    Exec {
        /// Statement kind
        #[arg(value_enum)]
        kind: Kind,

        /// Configured table to run against
        #[arg(short, long)]
        table: String,

        /// SQLite database file
        #[arg(long, value_hint = ValueHint::FilePath)]
        db: PathBuf,

        /// JSON request; read from stdin when omitted or `-`
        #[arg(required = false)]
        request: Option<String>,
    },
}
