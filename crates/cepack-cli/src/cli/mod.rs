//! Command-line interface definition.
//!
//! - `cepack config` - print the assembled bundler configuration as JSON
//! - `cepack check` - validate options and report the resolved naming

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use cepack::BuildOptions;

/// cepack - bundler configurations for CEP extensions
#[derive(Parser, Debug)]
#[command(
    name = "cepack",
    version,
    about = "Bundler configurations for CEP panels and ExtendScript",
    long_about = "cepack turns a handful of options into a complete bundler configuration\n\
                  for an Adobe CEP panel or its ExtendScript host code."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the assembled configuration
    ///
    /// Options are read from cepack.json, CEPACK_* environment variables and
    /// the flags below, later sources winning.
    Config(ConfigArgs),

    /// Validate options without assembling
    ///
    /// Reports the resolved dev server, bundle name and HTML file for panels,
    /// and whether the ExtendScript shim is installed for script-engine builds.
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub options: OptionArgs,

    /// Write the configuration to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub options: OptionArgs,

    /// Print the resolved naming as JSON
    #[arg(long)]
    pub json: bool,
}

/// Build options settable from the command line.
#[derive(Args, Debug, Clone, Default)]
pub struct OptionArgs {
    /// Entry module
    #[arg(short, long, value_name = "FILE")]
    pub entry: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Target type: panel (cep) or script-engine (extendscript)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub target: Option<String>,

    /// Project root containing package.json
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Environment name selecting a `cep.<env>` block (defaults to NODE_ENV)
    #[arg(long, value_name = "NAME")]
    pub env: Option<String>,

    /// Extension id selecting one of the project's extension profiles
    #[arg(long, value_name = "ID")]
    pub id: Option<String>,

    #[arg(long, value_name = "PORT")]
    pub dev_port: Option<u16>,

    #[arg(long, value_name = "HOST")]
    pub dev_host: Option<String>,

    #[arg(long, value_name = "FILE")]
    pub html_filename: Option<String>,

    /// Bundle file name (defaults to the entry's directory name + .js)
    #[arg(long, value_name = "NAME")]
    pub out_name: Option<String>,

    /// Development build
    #[arg(long, conflicts_with = "prod")]
    pub dev: bool,

    /// Production build
    #[arg(long)]
    pub prod: bool,

    /// Options file (defaults to cepack.json in the project root)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl OptionArgs {
    /// `--dev` / `--prod`, or `None` when neither was given.
    pub fn is_dev(&self) -> Option<bool> {
        match (self.dev, self.prod) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// The flags as a partial options layer; unset flags stay absent.
    pub fn to_options(&self) -> BuildOptions {
        BuildOptions {
            entry: self.entry.clone(),
            out: self.out.clone(),
            target: self.target.clone(),
            root: self.root.clone(),
            env: self.env.clone(),
            id: self.id.clone(),
            dev_port: self.dev_port,
            dev_host: self.dev_host.clone(),
            html_filename: self.html_filename.clone(),
            out_name: self.out_name.clone(),
            is_dev: self.is_dev(),
            ..BuildOptions::default()
        }
    }
}
