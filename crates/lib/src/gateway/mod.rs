//! Gateway: HTTP surface for the provider's webhooks and manual triggers.
//!
//! `POST /sms/request`, `POST /sms/final` and `POST /sms/receive`, plus static audio
//! under `/static` for call playback.

mod error;
mod server;

pub use error::ApiError;
pub use server::{router, run_gateway, GatewayState};
