use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Gateway responded with HTTP {code}")]
    HttpStatus { code: u16 },

    #[error("Malformed gateway data: {0}")]
    MalformedData(String),

    #[error("Fetch worker failed: {0}")]
    Worker(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),
}

impl From<ureq::Error> for AppError {
    fn from(err: ureq::Error) -> Self {
        match err {
            // The body of a failed response is never read.
            ureq::Error::Status(code, _) => AppError::HttpStatus { code },
            ureq::Error::Transport(transport) => AppError::Transport(transport.to_string()),
        }
    }
}
