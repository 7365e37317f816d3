//! Outreach flow: ask for permission by SMS, call on consent, nudge after hangup.
//!
//! Each operation is a one-shot request to the provider. Nothing is stored between
//! requests and failures are not retried.

mod consent;
mod inbound;
mod message_kind;

pub use consent::{decide, is_affirmative, Decision, AFFIRMATIVE_WORDS};
pub use inbound::{Direction, InboundError, InboundMessage};
pub use message_kind::{MessageKind, UnknownMessageKind};

use crate::provider::{CallRequest, ProviderError, ProviderResponse, Telephony};
use reqwest::Url;

pub const PERMISSION_REQUEST_TEXT: &str =
    "Är det okej att vi ringer upp dig? Svara 'okej' isåfall.";
pub const FINAL_NUDGE_TEXT: &str = "Här kommer länken jag pratade om!";

/// Ask `to` for permission to call.
pub async fn send_permission_request(
    provider: &dyn Telephony,
    to: &str,
) -> Result<ProviderResponse, ProviderError> {
    provider.send_sms(to, PERMISSION_REQUEST_TEXT).await
}

/// Follow-up SMS sent after a call ends.
pub async fn send_final_nudge(
    provider: &dyn Telephony,
    to: &str,
) -> Result<ProviderResponse, ProviderError> {
    provider.send_sms(to, FINAL_NUDGE_TEXT).await
}

/// Build the call request for `to`: audio from `<public_url>/static/audio/<kind>.mp3`,
/// hangup callback to `<public_url>/sms/final?to=<to>`.
pub fn call_request(public_url: &Url, to: &str, kind: MessageKind) -> Result<CallRequest, ProviderError> {
    let play_url = public_url
        .join(&kind.asset_path())
        .map_err(|e| ProviderError::Url(e.to_string()))?;
    let mut hangup_url = public_url
        .join("sms/final")
        .map_err(|e| ProviderError::Url(e.to_string()))?;
    hangup_url.query_pairs_mut().append_pair("to", to);
    Ok(CallRequest {
        to: to.to_string(),
        play_url,
        hangup_url,
    })
}

/// Call `to` and play the prerecorded message `kind`.
pub async fn send_call(
    provider: &dyn Telephony,
    public_url: &Url,
    to: &str,
    kind: MessageKind,
) -> Result<ProviderResponse, ProviderError> {
    let call = call_request(public_url, to, kind)?;
    provider.place_call(&call).await
}

/// What [`receive_inbound`] did with a valid, correctly addressed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundOutcome {
    /// Consent given and the call was accepted by the provider.
    Called { to: String },
    /// Consent given but placing the call failed (already logged).
    CallFailed { to: String },
    /// Not a consent reply.
    Ignored,
}

/// Parse an inbound webhook body, decide, and place a call on consent.
/// Malformed or misaddressed payloads are rejected before any provider request.
pub async fn receive_inbound(
    provider: &dyn Telephony,
    provisioned_number: &str,
    public_url: &Url,
    body: &[u8],
) -> Result<InboundOutcome, InboundError> {
    let message = InboundMessage::from_form_body(body)?;
    log::debug!(
        "inbound sms {:?} from {} to {}",
        message.id,
        message.from,
        message.to
    );
    match decide(&message, provisioned_number)? {
        Decision::Call { to, kind } => {
            log::info!("consent received from {}, calling with {}", to, kind);
            match send_call(provider, public_url, &to, kind).await {
                Ok(res) => {
                    log::debug!("call accepted: {} {}", res.status, res.body);
                    Ok(InboundOutcome::Called { to })
                }
                Err(e) => {
                    log::error!("call to {} failed: {}", to, e);
                    Ok(InboundOutcome::CallFailed { to })
                }
            }
        }
        Decision::Ignore => {
            log::info!("reply from {} is not consent, no call", message.from);
            Ok(InboundOutcome::Ignored)
        }
    }
}
