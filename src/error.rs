use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Cannot reach the server: {0}")]
    Network(String),

    #[error("Request rejected ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { status: u16, message: Option<String> },

    #[error("Server error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Server { status: u16, message: Option<String> },

    #[error("Malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        if status >= 500 {
            ApiError::Server { status, message }
        } else {
            ApiError::Rejected { status, message }
        }
    }

    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } | ApiError::Server { message, .. } => {
                message.as_deref().filter(|m| !m.is_empty())
            }
            _ => None,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "Cannot reach the server".to_string(),
            _ => self
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| self.to_string()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Network(_) => "network",
            ApiError::Rejected { .. } => "rejected",
            ApiError::Server { .. } => "server",
            ApiError::Decode(_) => "decode",
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please upload an audio file.")]
    MissingAudio,

    #[error("Please upload an image file for the single.")]
    MissingArtwork,

    #[error("Please select at least one artist.")]
    MissingArtist,

    #[error("Song title cannot be empty.")]
    EmptyTitle,

    #[error("Artist name cannot be empty.")]
    EmptyName,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid API base URL '{0}': {1}")]
    InvalidBaseUrl(String, String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}
