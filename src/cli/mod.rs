//! CLI command definitions and handlers

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod demote;
pub mod promote;
pub mod team;

/// ghe-admin - GitHub Enterprise organization administration
#[derive(Parser, Debug)]
#[command(name = "ghe-admin")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// GitHub server URL (github.com, *.ghe.com, or a GHES hostname)
    #[arg(
        long,
        global = true,
        env = "GITHUB_URL",
        default_value = "https://github.com",
        hide_env = true
    )]
    pub github_url: String,

    /// Read the API token from this file instead of $GITHUB_TOKEN
    #[arg(long, global = true, env = "GITHUB_TOKEN_FILE", hide_env = true)]
    pub token_file: Option<PathBuf>,

    /// PEM bundle of additional trusted CA certificates
    #[arg(long, global = true, env = "GITHUB_CA_BUNDLE", hide_env = true)]
    pub ca_bundle: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true, env = "GHE_ADMIN_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Promote the authenticated admin to owner of every unmanaged
    /// organization in an enterprise
    Promote {
        /// Enterprise slug
        enterprise: String,

        /// Where to write the unmanaged organization IDs
        #[arg(long, default_value = "unmanaged_orgs.txt")]
        unmanaged_out: PathBuf,

        /// Where to write the full organization inventory
        #[arg(long, default_value = "all_orgs.csv")]
        csv_out: PathBuf,
    },

    /// Drop the membership granted by a previous promote run
    Demote {
        /// Enterprise slug
        enterprise: String,

        /// Organization ID list written by promote
        #[arg(long, default_value = "unmanaged_orgs.txt")]
        unmanaged: PathBuf,
    },

    /// Converge a security-manager team across organizations
    SecTeam {
        /// Organization inventory written by promote
        #[arg(long, default_value = "all_orgs.csv")]
        org_list: PathBuf,

        /// Name of the team to manage
        #[arg(long, default_value = "security-managers")]
        team_name: String,

        /// Desired member handles (comma separated)
        #[arg(long, value_delimiter = ',')]
        members: Option<Vec<String>>,

        /// File with one desired member handle per line
        #[arg(long)]
        members_file: Option<PathBuf>,

        /// Use the legacy security-manager endpoint instead of
        /// organization roles
        #[arg(long)]
        legacy: bool,
    },
}
