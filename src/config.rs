//! Environment configuration.
//!
//! All runtime knobs come from environment variables (optionally via a
//! `.env` file). The parsed [`Config`] is built once at startup and passed
//! to handlers through the application context instead of being read from
//! ambient globals.

use anyhow::{bail, Context, Result};
use std::env;
use teloxide::types::{ChatId, Recipient};
use url::Url;

/// A daily publishing slot, matched against local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostSlot {
    pub hour: u32,
    pub minute: u32,
}

/// Credentials for the YandexGPT post generator. Optional: without them the
/// poster falls back to canned content and `/post` reports it is disabled.
#[derive(Debug, Clone)]
pub struct YandexConfig {
    pub api_key: String,
    pub folder_id: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub channel_id: Recipient,
    pub manager_chat_id: ChatId,
    pub database_path: String,
    pub port: u16,
    /// Public base URL; presence selects webhook mode, absence long polling.
    pub webhook_url: Option<String>,
    pub yandex: Option<YandexConfig>,
    pub post_slots: Vec<PostSlot>,
}

impl Config {
    /// Read configuration from the process environment. Missing required
    /// variables are fatal: the process must not start half-configured.
    pub fn from_env() -> Result<Self> {
        let bot_token =
            env::var("BOT_TOKEN").context("BOT_TOKEN must be set")?;
        let channel_raw =
            env::var("CHANNEL_ID").context("CHANNEL_ID must be set")?;
        let channel_id = parse_recipient(&channel_raw)?;
        let manager_raw = env::var("MANAGER_CHAT_ID")
            .context("MANAGER_CHAT_ID must be set")?;
        let manager_chat_id = ChatId(
            manager_raw
                .parse::<i64>()
                .context("MANAGER_CHAT_ID must be a numeric chat id")?,
        );

        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "blinds.db".to_string());
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().context("PORT must be a number")?,
            Err(_) => 8080,
        };
        let webhook_url = env::var("WEBHOOK_URL").ok().filter(|s| !s.is_empty());

        let yandex = match (env::var("YANDEX_API_KEY"), env::var("FOLDER_ID")) {
            (Ok(api_key), Ok(folder_id)) => Some(YandexConfig { api_key, folder_id }),
            _ => None,
        };

        let post_slots = match env::var("POST_SLOTS") {
            Ok(raw) => parse_slots(&raw)?,
            Err(_) => default_slots(),
        };

        Ok(Self {
            bot_token,
            channel_id,
            manager_chat_id,
            database_path,
            port,
            webhook_url,
            yandex,
            post_slots,
        })
    }
}

/// Default publishing slots: morning tip, afternoon work photo.
pub fn default_slots() -> Vec<PostSlot> {
    vec![
        PostSlot { hour: 10, minute: 0 },
        PostSlot { hour: 15, minute: 0 },
    ]
}

/// Parse a chat reference: `@username` for public channels, otherwise a
/// numeric chat id.
pub fn parse_recipient(raw: &str) -> Result<Recipient> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("chat id must not be empty");
    }
    if trimmed.starts_with('@') {
        return Ok(Recipient::ChannelUsername(trimmed.to_string()));
    }
    let id = trimmed
        .parse::<i64>()
        .with_context(|| format!("chat id must be numeric or @username, got '{trimmed}'"))?;
    Ok(Recipient::Id(ChatId(id)))
}

/// Public webhook endpoint: `{base}/webhook/{token}`. The token path
/// segment is the only authentication on the update route.
pub fn webhook_endpoint(base: &str, token: &str) -> Result<Url> {
    let full = format!("{}/webhook/{}", base.trim_end_matches('/'), token);
    Url::parse(&full).with_context(|| format!("WEBHOOK_URL '{base}' is not a valid base URL"))
}

/// Parse `"HH:MM,HH:MM"` into publishing slots.
pub fn parse_slots(raw: &str) -> Result<Vec<PostSlot>> {
    let mut slots = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (hh, mm) = part
            .split_once(':')
            .with_context(|| format!("slot '{part}' must be HH:MM"))?;
        let hour: u32 = hh
            .parse()
            .with_context(|| format!("bad hour in slot '{part}'"))?;
        let minute: u32 = mm
            .parse()
            .with_context(|| format!("bad minute in slot '{part}'"))?;
        if hour > 23 || minute > 59 {
            bail!("slot '{part}' is out of range");
        }
        slots.push(PostSlot { hour, minute });
    }
    if slots.is_empty() {
        bail!("POST_SLOTS must contain at least one HH:MM slot");
    }
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recipient_username() {
        let r = parse_recipient("@shop").unwrap();
        assert_eq!(r, Recipient::ChannelUsername("@shop".to_string()));
    }

    #[test]
    fn test_parse_recipient_numeric() {
        let r = parse_recipient("-1001234567890").unwrap();
        assert_eq!(r, Recipient::Id(ChatId(-1001234567890)));
    }

    #[test]
    fn test_parse_recipient_rejects_garbage() {
        assert!(parse_recipient("").is_err());
        assert!(parse_recipient("shop").is_err());
    }

    #[test]
    fn test_parse_slots_basic() {
        let slots = parse_slots("10:00,15:30").unwrap();
        assert_eq!(
            slots,
            vec![
                PostSlot { hour: 10, minute: 0 },
                PostSlot { hour: 15, minute: 30 },
            ]
        );
    }

    #[test]
    fn test_parse_slots_rejects_out_of_range() {
        assert!(parse_slots("24:00").is_err());
        assert!(parse_slots("10:60").is_err());
        assert!(parse_slots("").is_err());
    }

    #[test]
    fn test_parse_slots_skips_empty_parts() {
        let slots = parse_slots("9:05, ,21:15").unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0], PostSlot { hour: 9, minute: 5 });
    }

    #[test]
    fn test_webhook_endpoint_joins_token_path() {
        let url = webhook_endpoint("https://bot.example.com", "123:abc").unwrap();
        assert_eq!(url.as_str(), "https://bot.example.com/webhook/123:abc");
    }

    #[test]
    fn test_webhook_endpoint_trims_trailing_slash() {
        let url = webhook_endpoint("https://bot.example.com/", "123:abc").unwrap();
        assert_eq!(url.path(), "/webhook/123:abc");
    }

    #[test]
    fn test_webhook_endpoint_rejects_bad_base() {
        assert!(webhook_endpoint("not a url", "123:abc").is_err());
    }
}
