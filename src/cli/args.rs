//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--store <file>`: Store file to use
//! - `--config <file>`: Config file to use
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// dotdb - A dotted-path table store with a power help scraper
#[derive(Parser, Debug)]
#[command(name = "dotdb")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Store file (defaults to the configured store, then ~/.dotdb/db.lua)
    #[arg(long, global = true, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Config file (defaults to $DOTDB_CONFIG, then the usual locations)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the value at a dotted path
    #[command(
        name = "get",
        long_about = "Print the value stored at a dotted path.\n\n\
            Strings, numbers and booleans are printed as-is. Tables are printed \
            as table literals. Exits with an error if nothing is stored there.",
        after_help = "\
EXAMPLES:
    dotdb get char.name
    dotdb get powers"
    )]
    Get {
        /// Dotted path (e.g. char.stats.hp)
        path: String,
    },

    /// Store a value at a dotted path
    #[command(
        name = "set",
        long_about = "Store a value at a dotted path and save the store.\n\n\
            The value is read as a literal: numbers, true/false, quoted strings and \
            {...} tables. Anything that does not read as a literal is stored as a \
            plain string. Missing intermediate tables are created, and non-table \
            values in the way are replaced by tables.",
        after_help = "\
EXAMPLES:
    dotdb set char.stats.hp 120
    dotdb set char.flags '{ pk = false, \"newbie\" }'
    dotdb set char.title --string 42"
    )]
    Set {
        /// Dotted path
        path: String,

        /// Value literal
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Store the value as a string without reading it as a literal
        #[arg(long)]
        string: bool,
    },

    /// Remove the value at a dotted path
    #[command(name = "delete", visible_alias = "rm")]
    Delete {
        /// Dotted path
        path: String,
    },

    /// List the keys of a table
    #[command(
        name = "keys",
        after_help = "\
EXAMPLES:
    dotdb keys              # top-level keys
    dotdb keys char.stats"
    )]
    Keys {
        /// Dotted path of a table (defaults to the root)
        path: Option<String>,
    },

    /// Print the whole store as a table literal
    #[command(name = "dump")]
    Dump,

    /// Copy top-level keys from another store file
    #[command(
        name = "import",
        long_about = "Copy top-level keys of another store file into this store.\n\n\
            Each mapping OLD=NEW.PATH copies the value of top-level key OLD in the \
            source to dotted path NEW.PATH here. Keys missing from the source are \
            skipped and reported; they are not an error.",
        after_help = "\
EXAMPLES:
    dotdb import old.lua hp=char.stats.hp name=char.name"
    )]
    Import {
        /// Source store file
        source: PathBuf,

        /// Mappings of the form OLD=NEW.PATH
        #[arg(required = true, value_name = "OLD=NEW.PATH")]
        mappings: Vec<String>,
    },

    /// Scrape and inspect power help blocks
    #[command(name = "powers")]
    Powers {
        #[command(subcommand)]
        action: PowersAction,
    },

    /// Show configuration
    #[command(
        name = "config",
        long_about = "Show where configuration is read from and the values in effect.\n\n\
            Configuration is a TOML file. See `dotdb config show` for every key.",
        after_help = "\
EXAMPLES:
    dotdb config path
    dotdb config show"
    )]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell.",
        after_help = "\
EXAMPLES:
    # Bash (add to ~/.bashrc)
    dotdb completion bash >> ~/.bashrc

    # Fish
    dotdb completion fish > ~/.config/fish/completions/dotdb.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Powers subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum PowersAction {
    /// Parse one captured help block and print the record
    Parse {
        /// File holding the help block
        file: PathBuf,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch help blocks one per tick from a capture directory and store them
    #[command(
        long_about = "Fetch power help blocks from a capture directory and store them.\n\n\
            The capture directory holds one `<name>.txt` file per power. Names are \
            taken from the command line and from the bullet lines of --list. One \
            name is requested per tick; names with no usable block are reported \
            as missed and skipped.",
        after_help = "\
EXAMPLES:
    dotdb powers refresh captures/ \"Fire Ball\" Heal
    dotdb powers refresh captures/ --list captures/powers.txt --interval-ms 200"
    )]
    Refresh {
        /// Directory of captured help blocks
        capture_dir: PathBuf,

        /// File with a bulleted power list
        #[arg(long, value_name = "FILE")]
        list: Option<PathBuf>,

        /// Power names
        names: Vec<String>,

        /// Milliseconds between ticks (overrides config)
        #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: Option<u64>,

        /// Names requested per tick (overrides config)
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
        per_tick: Option<u64>,
    },

    /// Print stored power records
    Show {
        /// Only the power with this name or alias
        name: Option<String>,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the config file in use
    Path,
    /// Print the effective configuration
    Show,
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_set_with_globals() {
        let cli = Cli::try_parse_from([
            "dotdb", "--store", "/tmp/db.lua", "set", "a.b", "5", "--string", "-q",
        ])
        .unwrap();

        assert_eq!(cli.store, Some(PathBuf::from("/tmp/db.lua")));
        assert!(cli.quiet);
        match cli.command {
            Command::Set {
                path,
                value,
                string,
            } => {
                assert_eq!(path, "a.b");
                assert_eq!(value, "5");
                assert!(string);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn import_requires_mappings() {
        assert!(Cli::try_parse_from(["dotdb", "import", "old.lua"]).is_err());
    }

    #[test]
    fn refresh_rejects_zero_interval() {
        assert!(
            Cli::try_parse_from(["dotdb", "powers", "refresh", "caps", "--interval-ms", "0"])
                .is_err()
        );
    }
}
