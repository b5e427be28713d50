use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("catalog base url is required")]
    MissingBaseUrl,

    #[error("failed to construct http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("catalog unreachable: {0}")]
    RemoteUnavailable(#[source] reqwest::Error),

    #[error("catalog rejected request: {status}")]
    RemoteRejected { status: StatusCode, body: String },

    #[error("malformed catalog payload: {0}")]
    Decode(#[from] serde_json::Error),
}
