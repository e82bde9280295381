use anyhow::Context;
use log::{error, info};
use promptcraft::communication::{JsonProtocol, Message, MessageHandler, MessagePayload};
use promptcraft::config::Settings;
use promptcraft::PromptCraft;
use std::io;

fn main() {
    if let Err(e) = run() {
        error!("promptcraft failed: {:#}", e);
        eprintln!("promptcraft: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let config_path = Settings::default_path().context("Failed to locate settings file")?;
    let settings = Settings::load_or_default(&config_path)
        .with_context(|| format!("Failed to load settings from {}", config_path.display()))?;

    // Logs go to stderr; stdout carries protocol traffic
    env_logger::Builder::new()
        .filter_level(settings.log_level()?)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    info!("Starting promptcraft with settings from {}", config_path.display());

    let app = PromptCraft::from_settings(&settings).context("Failed to open option storage")?;
    let mut handler = MessageHandler::new(app);
    let mut protocol = JsonProtocol::new(io::stdout());

    protocol.send_message(Message::new_notification(MessagePayload::Startup {
        status: "ready".to_string(),
    }))?;

    let stdin = io::stdin();
    protocol.read_messages(stdin.lock(), |message| {
        let response = handler.handle_message(message)?;
        Ok((response, !handler.shutdown_requested()))
    })?;

    info!("Message loop ended, shutting down");
    Ok(())
}
