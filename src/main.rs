//! ghe-admin - GitHub Enterprise organization administration CLI

use clap::Parser;

mod cli;
mod client;
mod config;
mod error;
mod output;
mod reconcile;

use cli::{Cli, Commands};
use client::GitHubClient;
use config::RunConfig;
use error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = RunConfig::from_args(
        Some(cli.github_url.as_str()),
        cli.token_file.as_deref(),
        cli.ca_bundle.as_deref(),
    )?;
    let client = GitHubClient::new(&config)?;

    match cli.command {
        Commands::Promote {
            enterprise,
            unmanaged_out,
            csv_out,
        } => cli::promote::run(&client, &enterprise, &unmanaged_out, &csv_out).await,
        Commands::Demote {
            enterprise,
            unmanaged,
        } => cli::demote::run(&client, &enterprise, &unmanaged).await,
        Commands::SecTeam {
            org_list,
            team_name,
            members,
            members_file,
            legacy,
        } => {
            cli::team::run(
                &client,
                &org_list,
                &team_name,
                members,
                members_file.as_deref(),
                legacy,
            )
            .await
        }
    }
}
