//! Command-line interface of the `authctl` operator tool.

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use replay_auth::Role;

use crate::config::DEFAULT_CONFIG_DIR;

/// Operator tool for RePlay credentials and access tokens
///
/// Loads the same configuration as the API service and runs its startup
/// checks before doing anything else.
#[derive(Parser, Debug)]
#[command(
    name = "authctl",
    version,
    about = "RePlay credential and access token tool",
    after_help = "EXAMPLES:\n    \
                  authctl check                          # Validate configuration and hashing backend\n    \
                  echo -n 'pw' | authctl hash            # Hash a password read from stdin\n    \
                  authctl issue --user-id 42 --role USER # Issue an access token\n    \
                  authctl inspect <token>                # Decode and validate a token"
)]
pub struct Cli {
    /// Directory holding default.toml and {RUN_MODE}.toml
    #[arg(long, default_value = DEFAULT_CONFIG_DIR, env = "AUTHCTL_CONFIG_DIR", global = true)]
    pub config_dir: PathBuf,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate the configuration and run the hashing backend self-test
    Check,

    /// Hash a password read from stdin
    Hash,

    /// Verify a password read from stdin against a stored hash
    Verify {
        /// Stored PHC hash string
        #[arg(long)]
        hash: String,
    },

    /// Issue an access token
    Issue {
        /// Token subject
        #[arg(long)]
        user_id: i64,

        /// ADMIN or USER
        #[arg(long)]
        role: Role,

        /// Lifetime in minutes, defaults to the configured lifetime
        #[arg(long, allow_negative_numbers = true)]
        ttl_minutes: Option<i64>,
    },

    /// Decode and validate an access token
    Inspect {
        /// Token, with or without the "Bearer " prefix
        token: String,
    },
}

impl Commands {
    /// Whether the subcommand reads a password from stdin
    pub fn reads_password(&self) -> bool {
        matches!(self, Commands::Hash | Commands::Verify { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_issue() {
        let cli = Cli::try_parse_from([
            "authctl",
            "issue",
            "--user-id",
            "42",
            "--role",
            "ADMIN",
            "--ttl-minutes",
            "15",
        ])
        .unwrap();

        match cli.command {
            Commands::Issue {
                user_id,
                role,
                ttl_minutes,
            } => {
                assert_eq!(user_id, 42);
                assert_eq!(role, Role::Admin);
                assert_eq!(ttl_minutes, Some(15));
            }
            other => panic!("Unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_role() {
        let result = Cli::try_parse_from(["authctl", "issue", "--user-id", "1", "--role", "ROOT"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_dir_flag() {
        let cli = Cli::try_parse_from(["authctl", "--config-dir", "/etc/replay", "check"]).unwrap();

        assert_eq!(cli.config_dir, PathBuf::from("/etc/replay"));
        assert!(!cli.command.reads_password());
    }

    #[test]
    fn test_verify_reads_password() {
        let cli = Cli::try_parse_from(["authctl", "verify", "--hash", "$argon2id$v=19$..."]).unwrap();

        assert!(cli.command.reads_password());
    }

    #[test]
    fn test_config_dir_defaults() {
        let cli = Cli::try_parse_from(["authctl", "check"]).unwrap();

        assert_eq!(cli.config_dir, PathBuf::from(DEFAULT_CONFIG_DIR));
    }
}
