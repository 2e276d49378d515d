//! CLI module - Command-line interface for cinecat
//!
//! This module provides a structured CLI using clap for argument parsing.

use clap::{Parser, Subcommand};

/// cinecat - Movie catalog service
/// Movies, actors and genres over a REST API
#[derive(Parser)]
#[command(name = "cinecat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP API (default)
    #[command(alias = "web")]
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

impl Cli {
    #[must_use]
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::try_parse_from(["cinecat"]).unwrap();
        assert_eq!(cli.command(), Commands::Serve);
    }

    #[test]
    fn parses_subcommands_and_aliases() {
        let cli = Cli::try_parse_from(["cinecat", "migrate"]).unwrap();
        assert_eq!(cli.command(), Commands::Migrate);

        let cli = Cli::try_parse_from(["cinecat", "web"]).unwrap();
        assert_eq!(cli.command(), Commands::Serve);

        assert!(Cli::try_parse_from(["cinecat", "frobnicate"]).is_err());
    }
}
