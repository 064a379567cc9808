use anyhow::{anyhow, bail, Context, Result};
use chrono_tz::Tz;
use herald_core::{DEFAULT_INPUT_TZ, DEFAULT_REPORTING_TZ};
use herald_webhook::StatusPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::{LogFormat, LogLevel};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub reporting: ReportingSection,
    pub delivery: DeliverySection,
    pub log: LogSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingSection {
    /// IANA zone every displayed timestamp is converted to.
    pub timezone: String,
    /// Zone assumed for --ctf-date-start/--ctf-date-end when --ctf-date-tz is omitted.
    pub input_timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliverySection {
    /// Used when --webhook-url is not passed.
    pub webhook_url: Option<String>,
    /// Treat non-2xx webhook responses as failures.
    pub strict_status: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl Default for ReportingSection {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_REPORTING_TZ.name().to_string(),
            input_timezone: DEFAULT_INPUT_TZ.to_string(),
        }
    }
}

impl Default for DeliverySection {
    fn default() -> Self {
        Self {
            webhook_url: None,
            strict_status: true,
        }
    }
}

impl Config {
    pub fn reporting_tz(&self) -> Result<Tz> {
        self.reporting.timezone.parse().map_err(|_| {
            anyhow!(
                "invalid [reporting].timezone in config: '{}'",
                self.reporting.timezone
            )
        })
    }

    pub fn status_policy(&self) -> StatusPolicy {
        if self.delivery.strict_status {
            StatusPolicy::Strict
        } else {
            StatusPolicy::Lenient
        }
    }
}

pub fn herald_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".herald"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(herald_home()?.join("config.toml"))
}

/// Load `explicit` (which must exist) or `~/.herald/config.toml` (defaults if absent).
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let p = match explicit {
        Some(p) => {
            if !p.exists() {
                bail!("config file not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => {
            let p = config_path()?;
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };

    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    cfg.reporting_tz()?;
    Ok(cfg)
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(explicit: Option<&Path>) -> Result<()> {
    let p = match explicit {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&p, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config(cfg: &Config) -> Result<()> {
    let mut shown = cfg.clone();
    // the webhook path is a credential
    if let Some(url) = shown.delivery.webhook_url.as_mut() {
        *url = redact_webhook_url(url);
    }
    print!("{}", toml::to_string_pretty(&shown).context("serialize config")?);
    Ok(())
}

/// Keep scheme and host, hide the rest: `https://discord.com/***`.
pub fn redact_webhook_url(url: &str) -> String {
    match url.split_once("://") {
        Some((scheme, rest)) => {
            let host = rest.split('/').next().unwrap_or_default();
            format!("{scheme}://{host}/***")
        }
        None => "***".to_string(),
    }
}
