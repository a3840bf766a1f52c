//! Error type shared by the client handle and its backends.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("SDK_SPEAK_PORT is not set, the SDK daemon cannot be reached")]
    MissingPort,

    #[error("invalid SDK daemon address: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("unable to build HTTP client for the SDK daemon: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("request to SDK daemon endpoint '{endpoint}' failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("SDK daemon endpoint '{endpoint}' answered with status {status}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("SDK daemon endpoint '{endpoint}' returned an unreadable body: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("prompt reply has no string value for field '{name}'")]
    MissingAnswer { name: String },

    #[error("an answer is required for '{name}'")]
    EmptyInput { name: String },

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
