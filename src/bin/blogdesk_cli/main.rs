//! blogdesk: terminal front end for drafting, reviewing and publishing posts.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod client;
mod handlers;
mod io;
mod print;

use std::process::ExitCode;

use blogdesk::infra::telemetry;
use clap::Parser;

use args::{Cli, Commands};
use client::{CliError, Ctx, load_settings};
use handlers::{dashboard, posts, session};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            if let Some(hint) = err.hint() {
                eprintln!("hint: {hint}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let settings = load_settings(&cli)?;
    telemetry::init(&settings.logging)?;
    if matches!(cli.command, Commands::Logout) {
        return session::logout(&settings.session);
    }
    let ctx = Ctx::new(settings, cli.json)?;

    match cli.command {
        Commands::Login(args) => session::login(&ctx, &args).await,
        Commands::Logout => session::logout(&ctx.settings.session),
        Commands::Whoami => session::whoami(&ctx).await,
        Commands::Posts(cmd) => posts::handle(&ctx, cmd.action).await,
        Commands::Dashboard => dashboard::handle(&ctx).await,
    }
}
