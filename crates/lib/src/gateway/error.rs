//! Handler errors and their HTTP status.

use crate::outreach::InboundError;
use crate::provider::ProviderError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Inbound(#[from] InboundError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Inbound(InboundError::Malformed(_)) => StatusCode::BAD_REQUEST,
            ApiError::Inbound(InboundError::Misaddressed { .. }) => StatusCode::FORBIDDEN,
            ApiError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error responses carry no body; the provider relays webhook response bodies to the contact.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::warn!("rejected request: {}", self);
        }
        status.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbound_errors_are_client_errors() {
        assert_eq!(
            ApiError::from(InboundError::Malformed("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(InboundError::Misaddressed { to: "+1".into() }).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn provider_errors_are_server_errors() {
        let err = ApiError::from(ProviderError::Api {
            status: StatusCode::UNAUTHORIZED,
            body: "bad credentials".into(),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
