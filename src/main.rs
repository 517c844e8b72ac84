mod activity;
mod bot;
mod cards;
mod config;
mod connector;
mod db;
mod message;
mod module;
mod modules;
mod server;
mod util;

use std::path::Path;
use std::sync::Arc;

use bot::{Bot, TranscriptLogger};
use config::Config;
use connector::ConnectorClient;
use db::Db;
use server::Server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let path = Path::new(&config_path);
    if !path.exists() {
        eprintln!("Config file not found: {}", config_path);
        eprintln!("Copy the example and edit it:");
        eprintln!("  cp config.example.toml config.toml");
        std::process::exit(1);
    }

    let config = Arc::new(Config::load(path)?);
    log::info!("Loaded config from {}", config_path);

    let db = Arc::new(Db::open(Path::new(&config.bot.db_path))?);
    log::info!("Database opened at {}", config.bot.db_path);

    let registry = modules::build_registry(&config);
    log::info!("Registered {} module(s)", registry.all().len());

    let bot = Bot::new(config.clone(), db.clone(), registry)
        .with_middleware(Box::new(TranscriptLogger::new(db.clone())));

    let connector = Arc::new(ConnectorClient::new(config.connector.clone()));

    Server::new(config, db, Arc::new(bot), connector).run().await
}
