use derive_more::{Display, Error, From};
use reqwest::StatusCode;
use crate::client::cart::CartError;
use crate::client::model::identity::Role;
use crate::client::model::order::TransitionError;

#[derive(Debug, Display, Error, From)]
pub(crate) enum ClientError {
    /// the request never produced a response
    #[display("request error: {_0}")]
    #[from(skip)]
    Transport(reqwest::Error),
    /// non-2xx answer; `message` is the server's `error` text, verbatim
    #[display("{message}")]
    #[from(skip)]
    Server { status: StatusCode, message: String },
    /// rejected locally before anything was sent
    #[display("{_0}")]
    #[from(skip)]
    Validation(#[error(not(source))] String),
    #[display("{_0}")]
    Cart(CartError),
    #[display("{_0}")]
    Transition(TransitionError),
    #[display("not logged in as {_0}")]
    #[from(skip)]
    NotLoggedIn(#[error(not(source))] Role),
    #[display("{_0} is already in progress")]
    #[from(skip)]
    InFlight(#[error(not(source))] &'static str),
    /// 2xx answer that does not match the contract
    #[display("unexpected response: {_0}")]
    #[from(skip)]
    Decode(reqwest::Error),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    /// Whether the failure was reported by the server rather than raised locally.
    pub fn is_server(&self) -> bool {
        matches!(self, ClientError::Server { .. })
    }
}
