//! Command-line and environment configuration.
//!
//! Every option can be given as a flag or an environment variable; a `.env`
//! file in the working directory is loaded before parsing.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::alerting::{TwilioConfig, DEFAULT_API_BASE};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Some but not all SMS settings were provided
    #[error("Incomplete SMS alert configuration, missing: {}", .0.join(", "))]
    IncompleteTwilio(Vec<&'static str>),

    /// Host and port do not form a socket address
    #[error("Invalid listen address '{0}'")]
    InvalidAddress(String),
}

/// Server options
#[derive(Parser, Debug, Clone)]
#[command(name = "vitalwatch-server", version, about = "Health telemetry classification server")]
pub struct Args {
    /// Interface to bind
    #[arg(long, env = "VITALWATCH_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// HTTP port
    #[arg(long, env = "VITALWATCH_PORT", default_value = "5000")]
    pub port: u16,

    /// Directory holding the model bundle
    #[arg(long, env = "VITALWATCH_MODEL_DIR", value_name = "PATH", default_value = "sym")]
    pub model_dir: PathBuf,

    /// Per-handler alert delivery timeout in seconds
    #[arg(long, env = "VITALWATCH_ALERT_TIMEOUT_SECS", default_value = "10")]
    pub alert_timeout_secs: u64,

    /// Twilio account SID
    #[arg(long, env = "TWILIO_ACCOUNT_SID")]
    pub twilio_account_sid: Option<String>,

    /// Twilio auth token
    #[arg(long, env = "TWILIO_AUTH_TOKEN", hide_env_values = true)]
    pub twilio_auth_token: Option<String>,

    /// Sending phone number
    #[arg(long, env = "TWILIO_FROM_NUMBER")]
    pub twilio_from: Option<String>,

    /// Phone number that receives alerts
    #[arg(long, env = "ALERT_TO_NUMBER")]
    pub alert_to: Option<String>,

    /// Twilio API base URL
    #[arg(long, env = "TWILIO_API_BASE", default_value = DEFAULT_API_BASE)]
    pub twilio_api_base: String,
}

impl Args {
    /// Socket address to listen on
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }

    /// Alert delivery timeout
    pub fn alert_timeout(&self) -> Duration {
        Duration::from_secs(self.alert_timeout_secs)
    }

    /// SMS settings, `None` when SMS is not configured at all.
    ///
    /// # Errors
    ///
    /// [`ConfigError::IncompleteTwilio`] when only some of the four values
    /// are set.
    pub fn twilio_config(&self) -> Result<Option<TwilioConfig>, ConfigError> {
        let sid = non_empty(&self.twilio_account_sid);
        let token = non_empty(&self.twilio_auth_token);
        let from = non_empty(&self.twilio_from);
        let to = non_empty(&self.alert_to);

        match (sid, token, from, to) {
            (Some(sid), Some(token), Some(from), Some(to)) => Ok(Some(TwilioConfig {
                account_sid: sid.to_string(),
                auth_token: token.to_string(),
                from: from.to_string(),
                to: to.to_string(),
                api_base: self.twilio_api_base.clone(),
            })),
            (None, None, None, None) => Ok(None),
            _ => {
                let missing = [
                    ("TWILIO_ACCOUNT_SID", sid),
                    ("TWILIO_AUTH_TOKEN", token),
                    ("TWILIO_FROM_NUMBER", from),
                    ("ALERT_TO_NUMBER", to),
                ]
                .into_iter()
                .filter(|(_, value)| value.is_none())
                .map(|(name, _)| name)
                .collect();
                Err(ConfigError::IncompleteTwilio(missing))
            }
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Parses [`Args`] with every option given on the command line, so `env`
/// fallbacks never read the process environment. Empty strings leave the
/// SMS options unset.
#[cfg(test)]
pub(crate) fn isolated_args(overrides: &[(&str, &str)]) -> Args {
    let baseline = [
        ("--host", "0.0.0.0"),
        ("--port", "5000"),
        ("--model-dir", "sym"),
        ("--alert-timeout-secs", "10"),
        ("--twilio-account-sid", ""),
        ("--twilio-auth-token", ""),
        ("--twilio-from", ""),
        ("--alert-to", ""),
        ("--twilio-api-base", DEFAULT_API_BASE),
    ];
    for (flag, _) in overrides {
        assert!(baseline.iter().any(|(f, _)| f == flag), "unknown flag {flag}");
    }

    let mut argv = vec!["vitalwatch-server".to_string()];
    for (flag, default) in baseline {
        let value = overrides
            .iter()
            .find(|(f, _)| *f == flag)
            .map_or(default, |(_, v)| *v);
        argv.push(format!("{flag}={value}"));
    }
    Args::try_parse_from(argv).unwrap()
}
