use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForexError {
    #[error("Tiingo API key is not configured")]
    MissingApiKey,

    #[error("Tiingo API permission error (403): check that the API key is valid and has access to this dataset")]
    PermissionDenied,

    #[error("Tiingo request failed: {0}")]
    Request(reqwest::Error),

    #[error("Cannot build request url: {0}")]
    Url(#[from] url::ParseError),

    #[error("Tiingo response is not a list: {0}")]
    NotAList(String),

    #[error("Cannot parse price item <{1}>: {0}")]
    MalformedItem(String, String),
}

// Request urls can carry credentials, so they never reach the message.
impl From<reqwest::Error> for ForexError {
    fn from(e: reqwest::Error) -> Self {
        ForexError::Request(e.without_url())
    }
}
