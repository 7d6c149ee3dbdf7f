use std::{path::PathBuf, time::Duration};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use http::{
    header::{HeaderValue, AUTHORIZATION},
    Uri,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    kube::{bearer_header, FileTokenFetcher, HasMetadata, TokenFetcher},
    logger,
};

pub const ENV_PREFIX: &str = "AURORA_KUBERNETES_";

#[derive(Debug, Default)]
pub enum ConfigLoadOption {
    #[default]
    Default,

    Path(PathBuf),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Zero disables retries.
    pub times: u32,
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            times: 3,
            min_ms: 100,
            max_ms: 1000,
        }
    }
}

impl RetryConfig {
    pub fn min(&self) -> Duration {
        Duration::from_millis(self.min_ms)
    }

    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub connect_ms: u64,
    pub read_ms: u64,
    pub write_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: 2000,
            read_ms: 5000,
            write_ms: 5000,
        }
    }
}

impl TimeoutConfig {
    pub fn connect(&self) -> Duration {
        Duration::from_millis(self.connect_ms)
    }

    pub fn read(&self) -> Duration {
        Duration::from_millis(self.read_ms)
    }

    pub fn write(&self) -> Duration {
        Duration::from_millis(self.write_ms)
    }
}

/// Where the API server lives and how to talk to it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct KubernetesConfig {
    pub url: String,
    pub token_location: PathBuf,
    pub retry: RetryConfig,
    pub timeout: TimeoutConfig,
}

impl Default for KubernetesConfig {
    fn default() -> Self {
        Self {
            url: "https://kubernetes.default.svc.cluster.local".to_string(),
            token_location: PathBuf::from("/var/run/secrets/kubernetes.io/serviceaccount/token"),
            retry: RetryConfig::default(),
            timeout: TimeoutConfig::default(),
        }
    }
}

impl KubernetesConfig {
    /// Defaults, then the YAML file if given, then `AURORA_KUBERNETES_*` variables with
    /// `__` separating nested keys.
    pub fn figment(option: ConfigLoadOption) -> Figment {
        let figment = Figment::new();

        match option {
            ConfigLoadOption::Default => figment.merge(Serialized::defaults(Self::default())),
            ConfigLoadOption::Path(path) => figment
                .merge(Serialized::defaults(Self::default()))
                .merge(Yaml::file(path)),
        }
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load(option: ConfigLoadOption) -> Result<Self> {
        let config: Self = Self::figment(option).extract_lossy()?;

        logger!(debug, "Kubernetes url={}", config.url);

        Ok(config)
    }

    pub fn service_account_token_fetcher(&self) -> FileTokenFetcher {
        FileTokenFetcher::new(&self.token_location)
    }

    pub fn resource_url(&self, resource: &impl HasMetadata) -> Result<String> {
        resource.uri().url(&self.url)
    }

    /// Client configuration for `url` with the configured timeouts. A token from
    /// `fetcher` is sent as a bearer token with every request.
    pub fn kube_config(&self, fetcher: &dyn TokenFetcher) -> Result<kube::Config> {
        let mut config = kube::Config::new(self.url.parse::<Uri>()?);

        config.connect_timeout = Some(self.timeout.connect());
        config.read_timeout = Some(self.timeout.read());
        config.write_timeout = Some(self.timeout.write());

        if let Some(token) = fetcher.token(None)? {
            let mut value = HeaderValue::from_str(&bearer_header(&token))?;
            value.set_sensitive(true);

            config.headers.push((AUTHORIZATION, value));
        }

        Ok(config)
    }
}
