use anyhow::Context;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use url::Url;

#[derive(Debug, serde::Deserialize)]
pub struct Config {
    #[serde(rename = "bind-address")]
    pub bind_address: SocketAddr,

    #[serde(default)]
    pub upstream: ConfigUpstream,

    #[serde(default)]
    pub logging: ConfigLogging,
}

impl Config {
    /// Load and validate a config.
    ///
    /// A `PORT` environment variable replaces the port of the bind address.
    pub fn load_path<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to load config file at \"{}\"", path.display()))?;
        let mut config: Self = toml::from_str(&data)
            .with_context(|| format!("failed to parse config file at \"{}\"", path.display()))?;

        let port = std::env::var("PORT").ok();
        config
            .apply_port_override(port.as_deref())
            .context("invalid `PORT` environment variable")?;

        Ok(config)
    }

    fn apply_port_override(&mut self, port: Option<&str>) -> anyhow::Result<()> {
        let Some(port) = port else {
            return Ok(());
        };
        let port: u16 = port
            .trim()
            .parse()
            .with_context(|| format!("\"{port}\" is not a port"))?;
        self.bind_address.set_port(port);

        Ok(())
    }
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct ConfigUpstream {
    /// The site root
    #[serde(rename = "base-url")]
    pub base_url: Option<Url>,

    /// Request timeout, in seconds
    pub timeout: Option<u64>,

    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,
}

impl ConfigUpstream {
    /// Get the settings for the upstream client
    pub fn client_config(&self) -> otakudesu::ClientConfig {
        let mut client_config = match self.base_url.clone() {
            Some(base_url) => otakudesu::ClientConfig::with_base_url(base_url),
            None => otakudesu::ClientConfig::default(),
        };

        if let Some(timeout) = self.timeout {
            client_config.timeout = Duration::from_secs(timeout);
        }

        if let Some(user_agent) = self.user_agent.as_ref() {
            client_config.user_agent.clone_from(user_agent);
        }

        client_config
    }
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct ConfigLogging {
    #[serde(default)]
    pub directives: Vec<String>,
}
