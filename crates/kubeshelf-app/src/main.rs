mod app;
mod command;
mod prompt;

use std::io::{self, IsTerminal};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use kubeshelf_config::AppConfig;
use kubeshelf_core::{NonInteractive, Selector, StoreError};

use crate::app::App;
use crate::command::Cli;
use crate::prompt::PromptSelector;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("kubeshelf={default_level},kubeshelf_core={default_level}")));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };

    let interactive = io::stdin().is_terminal();
    let selector: Box<dyn Selector> =
        if interactive { Box::new(PromptSelector::stdio()) } else { Box::new(NonInteractive) };

    let mut app = App::new(config, selector, interactive)?;
    match app.execute(cli.command).await {
        Ok(out) => {
            print!("{out}");
            Ok(())
        }
        Err(e) if e.downcast_ref::<StoreError>().is_some_and(StoreError::is_user_abort) => {
            println!("Aborted");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
