//! Call-permission decision for an inbound reply.
//!
//! Any affirmative reply to the provisioned number triggers a call. Replies are not
//! correlated with an earlier permission request.

use crate::outreach::inbound::{InboundError, InboundMessage};
use crate::outreach::message_kind::MessageKind;

/// Replies (after trim + lowercase) treated as consent. English and Swedish.
pub const AFFIRMATIVE_WORDS: &[&str] = &["okay", "ok", "sure", "yes", "okej", "ja", "visst"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Place a call to `to` playing `kind`.
    Call { to: String, kind: MessageKind },
    /// Not a consent reply; nothing to do.
    Ignore,
}

pub fn is_affirmative(text: &str) -> bool {
    let normalized = text.trim().to_lowercase();
    AFFIRMATIVE_WORDS.contains(&normalized.as_str())
}

/// Decide what to do with an inbound message. Messages not addressed to `provisioned_number` are rejected.
pub fn decide(message: &InboundMessage, provisioned_number: &str) -> Result<Decision, InboundError> {
    if message.to != provisioned_number {
        return Err(InboundError::Misaddressed {
            to: message.to.clone(),
        });
    }
    if is_affirmative(&message.message) {
        Ok(Decision::Call {
            to: message.from.clone(),
            kind: MessageKind::default(),
        })
    } else {
        Ok(Decision::Ignore)
    }
}
