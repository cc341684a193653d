use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use tracing_subscriber::EnvFilter;

use oscillo_core::error::{OscilloError, Result};
use oscillo_core::registry::validate_metric_name;

use super::duration::parse_duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DaemonConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub sampler: SamplerSection,

    #[serde(default)]
    pub log: LogSection,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            sampler: SamplerSection::default(),
            log: LogSection::default(),
        }
    }
}

impl DaemonConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(OscilloError::InvalidConfig(format!(
                "unsupported config version {}",
                self.version
            )));
        }
        self.server.validate()?;
        self.sampler.validate()?;
        self.log.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.socket_addr().map(|_| ())
    }

    /// Resolve `listen`. A bare `:port` binds every interface.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let listen = self.listen.trim();
        let full = match listen.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{port}"),
            None => listen.to_string(),
        };
        full.to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or_else(|| {
                OscilloError::InvalidConfig(format!(
                    "server.listen is not a socket address: {listen:?}"
                ))
            })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SamplerSection {
    /// Oscillation period.
    #[serde(default = "default_period", deserialize_with = "de_duration")]
    pub period: Duration,

    /// Tick cadence.
    #[serde(default = "default_interval", deserialize_with = "de_duration")]
    pub interval: Duration,

    #[serde(default = "default_metric_name")]
    pub metric_name: String,
}

impl Default for SamplerSection {
    fn default() -> Self {
        Self {
            period: default_period(),
            interval: default_interval(),
            metric_name: default_metric_name(),
        }
    }
}

impl SamplerSection {
    pub fn validate(&self) -> Result<()> {
        if self.period.is_zero() {
            return Err(OscilloError::InvalidConfig(
                "sampler.period must be greater than zero".into(),
            ));
        }
        if !(Duration::from_millis(10)..=Duration::from_secs(3600)).contains(&self.interval) {
            return Err(OscilloError::InvalidConfig(
                "sampler.interval must be between 10ms and 1h".into(),
            ));
        }
        validate_metric_name(&self.metric_name)
            .map_err(|e| OscilloError::InvalidConfig(format!("sampler.metric_name: {e}")))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    /// `tracing_subscriber::EnvFilter` directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl LogSection {
    pub fn validate(&self) -> Result<()> {
        EnvFilter::try_new(&self.filter).map(|_| ()).map_err(|e| {
            OscilloError::InvalidConfig(format!("log.filter {:?}: {e}", self.filter))
        })
    }
}

fn de_duration<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Duration, D::Error> {
    let s = String::deserialize(d)?;
    parse_duration(&s).map_err(serde::de::Error::custom)
}

fn default_listen() -> String {
    ":5000".into()
}
fn default_period() -> Duration {
    Duration::from_secs(10 * 60)
}
fn default_interval() -> Duration {
    Duration::from_secs(1)
}
fn default_metric_name() -> String {
    "oscillo_sample".into()
}
fn default_log_filter() -> String {
    "info".into()
}
