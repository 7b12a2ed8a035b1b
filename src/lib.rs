pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{ConversionRequest, RateCache, ResilientRateSource};
use crate::providers::CbuProvider;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Rates { refresh: bool },
    Convert(ConversionRequest),
    Currencies,
}

/// Builds the rate cache for `config`, wired to the official provider with approximate fallback.
pub fn build_rate_cache(config: &AppConfig) -> RateCache<ResilientRateSource<CbuProvider>> {
    let provider =
        CbuProvider::new(&config.provider.base_url).with_timeout(config.fetch_timeout());
    let source = ResilientRateSource::new(provider).with_timeout(config.fetch_timeout());
    RateCache::new(source)
}

/// Runs `command` and returns the rendered output.
pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<String> {
    info!("uzfx starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let cache = build_rate_cache(&config);

    match command {
        AppCommand::Rates { refresh } => cli::rates::run(&cache, config.max_age(), refresh).await,
        AppCommand::Convert(request) => {
            cli::convert::run(&cache, config.max_age(), request).await
        }
        AppCommand::Currencies => Ok(cli::rates::display_currencies()),
    }
}
