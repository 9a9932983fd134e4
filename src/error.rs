use actix_web::{HttpResponse, ResponseError, error::BlockingError, http::StatusCode};
use log::error;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("chain is empty: genesis block missing")]
    EmptyChain,
    #[error("peer {peer} unreachable: {reason}")]
    PeerUnreachable { peer: String, reason: String },
    #[error("peer {peer} sent a malformed response: {reason}")]
    PeerMalformedResponse { peer: String, reason: String },
    #[error("invalid peer address: {0}")]
    InvalidPeerAddress(String),
    #[error("chain advanced while mining; previous hash is no longer the tip")]
    StaleTip,
    #[error("proof-of-work search timed out")]
    MiningTimedOut,
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("http client error: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("proof-of-work worker failed: {0}")]
    Blocking(#[from] BlockingError),
}

impl ResponseError for LedgerError {
    fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::MissingField(_) | LedgerError::InvalidPeerAddress(_) => {
                StatusCode::BAD_REQUEST
            }
            LedgerError::StaleTip => StatusCode::CONFLICT,
            LedgerError::MiningTimedOut => StatusCode::SERVICE_UNAVAILABLE,
            LedgerError::PeerUnreachable { .. } | LedgerError::PeerMalformedResponse { .. } => {
                StatusCode::BAD_GATEWAY
            }
            LedgerError::EmptyChain
            | LedgerError::Serialization(_)
            | LedgerError::HttpClient(_)
            | LedgerError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            error!("{self}");
        }
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::LedgerError;
    use actix_web::{ResponseError, http::StatusCode};

    #[test]
    fn missing_field_is_bad_request() {
        let err = LedgerError::MissingField("amount");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("amount"));
    }

    #[test]
    fn empty_chain_is_server_error() {
        assert_eq!(
            LedgerError::EmptyChain.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
