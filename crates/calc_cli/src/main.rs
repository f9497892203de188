//! `calc_cli` entry point: a line-oriented calculator REPL.

use calc_cli::{ClientConfig, Command, HttpHistoryRemote, Session, Step};
use clap::Parser;
use log::{error, info};
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[tokio::main]
async fn main() -> ExitCode {
    let config = ClientConfig::parse();

    if let Err(err) = calc_core::init_logging(config.log_level(), config.log_dir.as_deref()) {
        eprintln!("calc_cli: logging init failed: {err}");
        return ExitCode::FAILURE;
    }
    info!(
        "event=app_start module=cli status=ok core_version={} api_url={}",
        calc_core::core_version(),
        config.api_url
    );

    match run(HttpHistoryRemote::new(config.api_url)).await {
        Ok(()) => {
            info!("event=app_stop module=cli status=ok");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=app_stop module=cli status=error error={err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(remote: HttpHistoryRemote) -> std::io::Result<()> {
    let mut session = Session::new(remote);
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    write_block(&mut stdout, &session.start().await).await?;
    while let Some(line) = lines.next_line().await? {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(calc_cli::CommandError::Empty) => continue,
            Err(err) => {
                write_block(&mut stdout, &format!("{err} (try `help`)")).await?;
                continue;
            }
        };
        match session.handle(command).await {
            Step::Continue(text) => write_block(&mut stdout, &text).await?,
            Step::Quit => break,
        }
    }
    Ok(())
}

async fn write_block(stdout: &mut tokio::io::Stdout, text: &str) -> std::io::Result<()> {
    stdout.write_all(text.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await
}
