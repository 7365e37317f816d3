//! Inbound SMS webhook payload: the provider POSTs `&`-joined `key=value` pairs, not JSON.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InboundError {
    #[error("malformed inbound payload: {0}")]
    Malformed(String),
    #[error("inbound message addressed to {to}, not the provisioned number")]
    Misaddressed { to: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Incoming,
    Outgoing,
}

/// An SMS delivered to the provisioned number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub id: Option<String>,
    pub from: String,
    pub to: String,
    pub message: String,
    pub direction: Direction,
    pub created: Option<DateTime<Utc>>,
}

/// Body as sent on the wire; every field optional until validated.
#[derive(Debug, Deserialize)]
struct RawInbound {
    id: Option<String>,
    from: Option<String>,
    to: Option<String>,
    message: Option<String>,
    direction: Option<String>,
    created: Option<String>,
}

impl InboundMessage {
    /// Decode a URL-encoded webhook body and validate required fields (`to`, `from`, `message`).
    pub fn from_form_body(body: &[u8]) -> Result<Self, InboundError> {
        let raw: RawInbound = serde_urlencoded::from_bytes(body)
            .map_err(|e| InboundError::Malformed(e.to_string()))?;
        Self::validate(raw)
    }

    fn validate(raw: RawInbound) -> Result<Self, InboundError> {
        let missing: Vec<&str> = [
            ("to", raw.to.is_none()),
            ("from", raw.from.is_none()),
            ("message", raw.message.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();
        let (Some(to), Some(from), Some(message)) = (raw.to, raw.from, raw.message) else {
            return Err(InboundError::Malformed(format!(
                "missing field(s): {}",
                missing.join(", ")
            )));
        };

        let direction = match raw.direction.as_deref().map(str::trim) {
            None | Some("") | Some("incoming") => Direction::Incoming,
            Some("outgoing") => Direction::Outgoing,
            Some(other) => {
                return Err(InboundError::Malformed(format!(
                    "unknown direction {:?}",
                    other
                )))
            }
        };

        let created = match raw.created.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(parse_created(s).ok_or_else(|| {
                InboundError::Malformed(format!("unparseable created timestamp {:?}", s))
            })?),
        };

        Ok(Self {
            id: raw.id.filter(|s| !s.is_empty()),
            from,
            to,
            message,
            direction,
            created,
        })
    }
}

/// Provider timestamps look like `2018-07-13T13:57:23.741000` (UTC, no offset); RFC 3339 is accepted too.
fn parse_created(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|n| n.and_utc())
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|d| d.with_timezone(&Utc))
        })
}
