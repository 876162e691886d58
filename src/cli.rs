use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use defaultskit::DesiredState;
use std::path::PathBuf;

use crate::params::Params;

#[derive(Parser)]
#[command(name = "osx-defaults")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Declaratively read, set and remove macOS user defaults", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Preference domain (e.g. com.apple.finder, NSGlobalDomain)
    #[arg(short, long, visible_alias = "name")]
    pub domain: Option<String>,

    /// Key within the domain; omit to read the whole domain
    #[arg(short, long)]
    pub key: Option<String>,

    /// Value to set; implies --state present
    #[arg(long, allow_hyphen_values = true)]
    pub value: Option<String>,

    /// Value type: str, int, bool, float, date, data (inferred when omitted)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub type_hint: Option<String>,

    /// Desired state of the key
    #[arg(short, long, value_parser = PossibleValuesParser::new(DesiredState::NAMES))]
    pub state: Option<String>,

    /// Report what would change without writing or deleting anything
    #[arg(long, env = "OSX_DEFAULTS_CHECK")]
    pub check: bool,

    /// Read parameters from a JSON file (flags take precedence)
    #[arg(long, value_name = "FILE")]
    pub params: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to the config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Parameters given as flags.
    pub fn flag_params(&self) -> Params {
        Params {
            name: self.domain.clone(),
            key: self.key.clone(),
            value: self.value.clone(),
            type_hint: self.type_hint.clone(),
            state: self.state.clone(),
        }
    }
}
