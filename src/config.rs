use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;

pub const MAPTILER_URL: &str = "https://api.maptiler.com/";
pub const THUNDERFOREST_URL: &str = "https://tile.thunderforest.com/";
pub const OPENROUTESERVICE_URL: &str = "https://api.openrouteservice.org/v2/directions/driving-car";

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    pub thread_count: Option<usize>,
    /// Externally visible base URL of the relay, e.g. `https://maps.example.org`.
    /// Falls back to the request's `Host` header when unset.
    pub public_url: Option<String>,
    pub maptiler_url: String,
    pub thunderforest_url: String,
    pub openrouteservice_url: String,
    #[serde(skip)]
    pub keys: ApiKeys,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            thread_count: None,
            public_url: None,
            maptiler_url: MAPTILER_URL.to_string(),
            thunderforest_url: THUNDERFOREST_URL.to_string(),
            openrouteservice_url: OPENROUTESERVICE_URL.to_string(),
            keys: ApiKeys::default(),
        }
    }
}

/// Vendor secrets. Only ever read from the environment.
#[derive(Clone, Default)]
pub struct ApiKeys {
    pub maptiler: String,
    pub thunderforest: String,
    pub openrouteservice: String,
}

impl fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeys")
            .field("maptiler", &"<redacted>")
            .field("thunderforest", &"<redacted>")
            .field("openrouteservice", &"<redacted>")
            .finish()
    }
}

impl ApiKeys {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            maptiler: required_env("MAPTILER_KEY")?,
            thunderforest: required_env("THUNDERFOREST_KEY")?,
            openrouteservice: required_env("ORS_KEY")?,
        })
    }
}

fn required_env(name: &str) -> anyhow::Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(anyhow::anyhow!("environment variable {} is not set", name)),
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let path = if let Ok(explicit) = env::var("RELAY_CONFIG") {
            Some(explicit)
        } else if Path::new("relay.toml").exists() {
            Some("relay.toml".to_string())
        } else if Path::new("relay.example.toml").exists() {
            Some("relay.example.toml".to_string())
        } else {
            None
        };

        let mut config = match path {
            Some(path) => Self::parse(&fs::read_to_string(&path)?)?,
            None => Config::default(),
        };

        if let Ok(port) = env::var("PORT") {
            config.listen_addr = with_port(&config.listen_addr, &port)?;
        }
        config.keys = ApiKeys::from_env()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Prefix that rewritten style URLs point at. `host` is the request's
    /// `Host` header, used when no public URL is configured.
    pub fn asset_prefix(&self, host: Option<&str>) -> String {
        let base = match (&self.public_url, host) {
            (Some(url), _) => url.trim_end_matches('/').to_string(),
            (None, Some(host)) => format!("http://{}", host),
            (None, None) => format!("http://{}", self.listen_addr),
        };
        format!("{}/api/maptiler/asset/", base)
    }
}

fn with_port(listen_addr: &str, port: &str) -> anyhow::Result<String> {
    let port: u16 = port
        .parse()
        .map_err(|_| anyhow::anyhow!("PORT must be a port number, got {:?}", port))?;
    let host = listen_addr.rsplit_once(':').map(|(h, _)| h).unwrap_or("0.0.0.0");
    Ok(format!("{}:{}", host, port))
}
