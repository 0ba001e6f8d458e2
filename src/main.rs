use anno_bot::infrastructure::config::AppConfig;
use anno_bot::infrastructure::discord_bot::run_bot;
use anno_bot::utils;
use dotenvy::dotenv;
use tracing::{Level, error};

#[tokio::main]
async fn main() {
    dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            utils::setup_logging(Level::INFO);
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };
    utils::setup_logging(config.log_level);

    if let Err(e) = run_bot(config).await {
        error!("Error running bot: {:#}", e);
        std::process::exit(1);
    }
}
