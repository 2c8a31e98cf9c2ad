//! services/api/src/web/response.rs
//!
//! Turns core `ServiceError`s into HTTP responses. This is the only place that
//! decides status codes and how much of an error a client gets to see.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use insightlearn_core::{AuthFailure, ServiceError};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

/// The JSON body of every error response.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}

/// An error on its way out of a handler.
#[derive(Debug)]
pub enum HttpError {
    Service(ServiceError),
    /// A request refused by the transport layer before any service saw it,
    /// e.g. a body over the configured upload limit. Keeps the rejection's status.
    Rejected(StatusCode, String),
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        Self::Service(err)
    }
}

impl From<AuthFailure> for HttpError {
    fn from(err: AuthFailure) -> Self {
        Self::Service(err.into())
    }
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Service(ServiceError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Service(ServiceError::Unauthorized(_)) => StatusCode::UNAUTHORIZED,
            Self::Service(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Service(ServiceError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Self::Service(ServiceError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Rejected(status, _) => *status,
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::Service(err) => err.to_string(),
            Self::Rejected(_, detail) => detail.clone(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Token rejections are already logged by the token service.
        if let Self::Service(ServiceError::Internal(msg)) = &self {
            error!("Request failed: {}", msg);
        }

        let body = Json(ErrorBody {
            detail: self.detail(),
        });
        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insightlearn_core::TokenError;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::{
        layer::{Context, SubscriberExt},
        Layer,
    };

    /// Counts events at or above WARN.
    #[derive(Clone, Default)]
    struct WarningCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for WarningCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() <= Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ServiceError::Conflict("dup".into()), StatusCode::CONFLICT),
            (ServiceError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (ServiceError::InvalidInput("bad".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AuthFailure::InvalidCredentials.into(), StatusCode::UNAUTHORIZED),
        ];
        for (err, status) in cases {
            assert_eq!(HttpError::from(err).status(), status);
        }
    }

    #[test]
    fn test_rejection_keeps_its_status_and_detail() {
        let err = HttpError::Rejected(StatusCode::PAYLOAD_TOO_LARGE, "too big".to_string());
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn test_unauthorized_carries_bearer_challenge_and_hides_cause() {
        let response = HttpError::from(AuthFailure::Token(TokenError::Expired)).into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn test_token_rejection_is_not_logged_again() {
        let counter = WarningCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());

        tracing::subscriber::with_default(subscriber, || {
            HttpError::from(AuthFailure::Token(TokenError::InvalidSignature)).into_response();
        });

        assert_eq!(counter.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_internal_error_is_logged_once() {
        let counter = WarningCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());

        tracing::subscriber::with_default(subscriber, || {
            HttpError::from(ServiceError::Internal("db down".into())).into_response();
        });

        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_not_found_has_no_challenge() {
        let response = HttpError::from(ServiceError::NotFound("x".into())).into_response();
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }
}
