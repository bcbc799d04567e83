use anyhow::Result;
use clap::Parser;
use mdocs::cli::{run_command, Cli, Command};
use mdocs::ui::{install_panic_hook, App};
use mdocs::util;
use std::fs::{self, OpenOptions};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    util::init_data_dir(cli.global.data_dir.clone());

    // Log to file (~/.mdocs/logs/mdocs.log); the TUI owns stdout
    fs::create_dir_all(util::logs_dir())?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    let ctx = cli.global.context()?;

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => {
            install_panic_hook();
            let mut app = App::new(ctx.config, ctx.config_path, ctx.stores, ctx.provider);
            app.run().await
        }
        command => {
            let mut stdout = std::io::stdout();
            run_command(command, &ctx, &mut stdout).await
        }
    }
}
