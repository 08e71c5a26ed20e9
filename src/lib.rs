pub mod advice;
pub mod clients;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod footprint;
pub mod gating;
pub mod http;
pub mod mate;
pub mod news;
pub mod quiz;
pub mod session;

use std::sync::Arc;

use anyhow::Result;

use crate::clients::{GeminiClient, NewsApiClient};
use crate::config::Config;
use crate::http::AppState;
use crate::mate::ClimateMate;

/// Wire the live Gemini and NewsAPI backends into the HTTP state.
pub fn build_state(config: Config) -> Result<AppState> {
    let generator = GeminiClient::new(config.runtime.gemini_api_key.clone(), &config.generation)?;
    tracing::info!("Generation backend: gemini model {}", generator.model());
    let news = NewsApiClient::new(config.runtime.news_api_key.clone(), &config.news)?;
    Ok(AppState::new(
        Arc::new(config),
        ClimateMate::new(Arc::new(generator)),
        Arc::new(news),
    ))
}
