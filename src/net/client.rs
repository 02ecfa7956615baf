//! Async HTTP client for the arena API.
//!
//! Thin wrapper over `reqwest`: builds the two endpoint URLs once,
//! attaches the auth token to every request, and maps HTTP failures onto
//! the crate's error taxonomy. Pacing lives in the scheduler, not here.

use crate::core::config::BotConfig;
use crate::core::error::{BotError, Result};
use crate::net::wire::{ArenaResponse, MoveRequest, MoveResponse};
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub struct ApiClient {
    client: Client,
    arena_url: String,
    move_url: String,
    token: String,
}

impl ApiClient {
    pub fn new(cfg: &BotConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()
            .map_err(|e| BotError::Config(format!("http client: {e}")))?;
        let base = cfg.base_url.trim_end_matches('/');
        Ok(Self {
            client,
            arena_url: format!("{base}/arena"),
            move_url: format!("{base}/move"),
            token: cfg.token.clone(),
        })
    }

    pub async fn fetch_arena(&self) -> Result<ArenaResponse> {
        let response = self
            .client
            .get(&self.arena_url)
            .header("X-Auth-Token", &self.token)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let body: ArenaResponse = response.json().await?;
        Ok(body)
    }

    pub async fn send_move(&self, request: &MoveRequest) -> Result<MoveResponse> {
        let response = self
            .client
            .post(&self.move_url)
            .header("X-Auth-Token", &self.token)
            .json(request)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let body: MoveResponse = response.json().await?;
        Ok(body)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(BotError::Auth(format!("{status}: {detail}")))
            }
            _ => Err(BotError::Transport(format!("{status}: {detail}"))),
        }
    }
}
