//! SMS delivery through the Twilio Messages API.

use super::{Alert, AlertError, AlertHandler};

/// Production Twilio REST endpoint
pub const DEFAULT_API_BASE: &str = "https://api.twilio.com";

/// Credentials and routing for SMS alerts
#[derive(Clone)]
pub struct TwilioConfig {
    /// Account SID (`AC...`)
    pub account_sid: String,
    /// Auth token paired with the SID
    pub auth_token: String,
    /// Sending phone number, E.164
    pub from: String,
    /// Recipient phone number, E.164
    pub to: String,
    /// API base URL, overridable for staging or local fakes
    pub api_base: String,
}

// Keeps the auth token out of logs.
impl std::fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl TwilioConfig {
    /// URL of the Messages resource for this account
    pub fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base.trim_end_matches('/'),
            self.account_sid
        )
    }

    /// Form body for one message
    pub fn form<'a>(&'a self, body: &'a str) -> [(&'static str, &'a str); 3] {
        [("To", self.to.as_str()), ("From", self.from.as_str()), ("Body", body)]
    }
}

/// Sends each alert as one SMS
pub struct TwilioSmsHandler {
    config: TwilioConfig,
    client: reqwest::Client,
}

impl TwilioSmsHandler {
    /// Create a handler with its own HTTP client
    pub fn new(config: TwilioConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl AlertHandler for TwilioSmsHandler {
    fn name(&self) -> &str {
        "twilio-sms"
    }

    async fn handle(&self, alert: &Alert) -> Result<(), AlertError> {
        let response = self
            .client
            .post(self.config.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&self.config.form(alert.message()))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AlertError::Delivery {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(alert_id = %alert.id(), to = %self.config.to, "SMS alert sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TwilioConfig {
        TwilioConfig {
            account_sid: "AC0123456789".into(),
            auth_token: "secret-token".into(),
            from: "+15550001111".into(),
            to: "+15552223333".into(),
            api_base: "https://api.twilio.com/".into(),
        }
    }

    #[test]
    fn test_messages_url() {
        assert_eq!(
            config().messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC0123456789/Messages.json"
        );
    }

    #[test]
    fn test_form_fields() {
        let cfg = config();
        let form = cfg.form("hello");
        assert_eq!(
            form,
            [("To", "+15552223333"), ("From", "+15550001111"), ("Body", "hello")]
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_transport_error() {
        let handler = TwilioSmsHandler::new(TwilioConfig {
            // Port 9 (discard) on localhost refuses connections.
            api_base: "http://127.0.0.1:9".into(),
            ..config()
        });
        assert_eq!(handler.name(), "twilio-sms");

        let err = handler.handle(&Alert::new("test")).await.unwrap_err();
        assert!(matches!(err, AlertError::Transport(_)));
    }
}
