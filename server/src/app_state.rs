use crate::Config;
use anyhow::Context;

/// Shared, read-only state for the handlers
#[derive(Debug)]
pub struct AppState {
    pub client: otakudesu::Client,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client_config = config.upstream.client_config();
        let client = otakudesu::Client::with_config(client_config)
            .context("failed to build the upstream client")?;

        Ok(Self::with_client(client))
    }

    pub fn with_client(client: otakudesu::Client) -> Self {
        Self { client }
    }
}
