use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::checkout::CheckoutError;
use crate::payment::PaymentFailure;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: String,
    error: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<&'a PaymentFailure>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Checkout(err) => match err {
                CheckoutError::EmptyCart
                | CheckoutError::InvalidTransition { .. }
                | CheckoutError::StaleAttempt
                | CheckoutError::CartLocked => StatusCode::CONFLICT,
                CheckoutError::ResourceLoadFailure(_) | CheckoutError::CollaboratorUnavailable => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                CheckoutError::PaymentFailed(_) | CheckoutError::PaymentAbandoned => {
                    StatusCode::PAYMENT_REQUIRED
                }
                CheckoutError::PaymentTimedOut => StatusCode::GATEWAY_TIMEOUT,
                CheckoutError::AmountOutOfRange => StatusCode::UNPROCESSABLE_ENTITY,
            },
        }
    }

    /// Stable machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::Checkout(err) => match err {
                CheckoutError::EmptyCart => "empty_cart",
                CheckoutError::ResourceLoadFailure(_) => "resource_load_failure",
                CheckoutError::CollaboratorUnavailable => "collaborator_unavailable",
                CheckoutError::PaymentFailed(_) => "payment_failed",
                CheckoutError::PaymentTimedOut => "payment_timed_out",
                CheckoutError::PaymentAbandoned => "payment_abandoned",
                CheckoutError::InvalidTransition { .. } => "invalid_transition",
                CheckoutError::StaleAttempt => "stale_attempt",
                CheckoutError::CartLocked => "cart_locked",
                CheckoutError::AmountOutOfRange => "amount_out_of_range",
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let failure = match &self {
            AppError::Checkout(CheckoutError::PaymentFailed(failure)) => Some(failure),
            _ => None,
        };
        let body = ErrorBody {
            message: self.to_string(),
            error: self.kind(),
            failure,
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
