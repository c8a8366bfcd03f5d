mod cache;
mod classifier;
mod config;
mod discord_bot;
mod error;
mod grok;
mod http;
mod logging;
mod models;
mod pimp;
mod sanitizer;
mod sentiment;
mod service;
#[cfg(test)]
mod test_support;
mod trends;

use crate::cache::ResponseCache;
use crate::config::Config;
use crate::discord_bot::DiscordHandler;
use crate::grok::GrokClient;
use crate::http::AppState;
use crate::pimp::SYSTEM_PROMPT;
use crate::service::ResponseService;
use crate::trends::TrendClient;
use dotenv::dotenv;
use std::error::Error as StdError;
use std::future::IntoFuture;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn StdError + Send + Sync>> {
    dotenv().ok();
    logging::init(&logging::log_file_path())?;

    let config = Config::load().map_err(|e| {
        error!("Configuration error: {}", e);
        e
    })?;

    let grok = GrokClient::new(
        &config.grok_endpoint,
        &config.grok_api_key,
        &config.grok_model,
        SYSTEM_PROMPT,
    )
    .with_max_tokens(config.max_tokens)
    .with_timeout(config.request_timeout);

    let capacity = NonZeroUsize::new(config.cache_capacity).ok_or("CACHE_CAPACITY must be > 0")?;
    let service = Arc::new(
        ResponseService::new(Arc::new(grok), ResponseCache::new(capacity))
            .with_match_policy(config.match_policy)
            .with_cache_fallbacks(config.cache_fallbacks),
    );
    info!(
        "Response cache ready (capacity {}, caching fallbacks: {})",
        service.cache().capacity(),
        config.cache_fallbacks
    );
    let trends = Arc::new(TrendClient::new(
        config.twitter.clone(),
        &config.twitter_api_base,
    ));

    let app = http::router(AppState {
        service: service.clone(),
        trends: trends.clone(),
    });
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!("Blockchain Pimp listening on http://{}", listener.local_addr()?);

    let handler = DiscordHandler::new(service, trends);

    tokio::select! {
        res = axum::serve(listener, app).into_future() => {
            if let Err(e) = res {
                error!("HTTP server stopped: {}", e);
                return Err(e.into());
            }
        }
        res = discord_bot::run(&config.discord_token, handler) => {
            if let Err(e) = res {
                error!("Discord client stopped: {}", e);
                return Err(e);
            }
        }
    }

    Ok(())
}
