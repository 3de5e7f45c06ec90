use crate::error::{Error, Result};
use crate::{Delivery, Notifier};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use site_kit_core::ContactSubmission;
use site_kit_core::config::DiscordConfig;

/// Shown in the embed for any field the visitor left empty
pub const NOT_SPECIFIED: &str = "Not Specified";

const EMBED_TITLE: &str = "New Message";
const EMBED_COLOR: u32 = 0x0099FF;

/// Discord rejects embed field values longer than this many characters
pub const FIELD_VALUE_LIMIT: usize = 1024;
const TRUNCATION_MARKER: char = '…';

/// Discord's create-message payload, limited to what we send
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessagePayload {
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Error body Discord returns on non-2xx responses
#[derive(Debug, Deserialize)]
struct DiscordError {
    message: String,
    #[serde(default)]
    code: i64,
}

/// Posts submissions into a channel through Discord's REST API.
///
/// Every send is one authenticated request, so there is no session to warm
/// up. The `reqwest::Client` is passed in and shared by all sends.
#[derive(Clone)]
pub struct DiscordNotifier {
    client: reqwest::Client,
    api_base: String,
    channel_id: Option<String>,
    bot_token: Option<String>,
}

impl DiscordNotifier {
    pub fn new(client: reqwest::Client, config: &DiscordConfig) -> Self {
        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            channel_id: config.channel_id.clone(),
            bot_token: config.bot_token.clone(),
        }
    }

    /// HTTP client with the User-Agent Discord expects from bots
    pub fn default_client() -> Result<reqwest::Client> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!(
                "DiscordBot (https://github.com/innotekhq/site-kit, ",
                env!("CARGO_PKG_VERSION"),
                ")"
            )),
        );

        Ok(reqwest::Client::builder()
            .default_headers(headers)
            .build()?)
    }

    fn messages_url(&self, channel_id: &str) -> String {
        format!("{}/channels/{}/messages", self.api_base, channel_id)
    }

    async fn send(&self, channel_id: &str, payload: &MessagePayload) -> Result<()> {
        let token = self.bot_token.as_deref().ok_or(Error::MissingToken)?;

        let response = self
            .client
            .post(self.messages_url(channel_id))
            .header(AUTHORIZATION, format!("Bot {}", token))
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<DiscordError>(&body) {
            Ok(error) => format!("{} (code {})", error.message, error.code),
            Err(_) if body.is_empty() => status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
            Err(_) => body,
        };

        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn notify(&self, submission: &ContactSubmission) -> Result<Delivery> {
        let Some(channel_id) = self.channel_id.as_deref() else {
            tracing::warn!("DISCORD_CHANNEL_ID is not set, skipping notification");
            return Ok(Delivery::Skipped("channel id not configured".to_string()));
        };

        let payload = build_message(submission);
        self.send(channel_id, &payload).await?;

        tracing::debug!(channel_id, "posted contact notification");
        Ok(Delivery::Sent)
    }
}

/// Build the embed for a submission. The disclaimer is not displayed.
pub fn build_message(submission: &ContactSubmission) -> MessagePayload {
    let field = |name: &str, value: &Option<String>, inline: bool| EmbedField {
        name: name.to_string(),
        value: display_value(value),
        inline,
    };

    MessagePayload {
        embeds: vec![Embed {
            title: EMBED_TITLE.to_string(),
            color: EMBED_COLOR,
            fields: vec![
                field("Name", &submission.name, true),
                field("Email", &submission.email, true),
                field("Message", &submission.message, false),
            ],
        }],
    }
}

/// Blank values become `Not Specified`; long ones are cut to fit a field
fn display_value(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => truncate_chars(v, FIELD_VALUE_LIMIT),
        _ => NOT_SPECIFIED.to_string(),
    }
}

fn truncate_chars(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }

    let mut truncated: String = value.chars().take(limit - 1).collect();
    truncated.push(TRUNCATION_MARKER);
    truncated
}
