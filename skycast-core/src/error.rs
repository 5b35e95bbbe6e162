use reqwest::StatusCode;

/// The only message a user ever sees for a failed fetch.
pub const FETCH_ERROR_MESSAGE: &str = "City not found or API error.";

/// Why a weather fetch failed.
///
/// The variants exist for logging; the view collapses all of them into
/// [`FETCH_ERROR_MESSAGE`].
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to weather API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("weather API responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode weather API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("weather API response is malformed: {0}")]
    Malformed(String),
}

impl FetchError {
    pub fn user_message(&self) -> &'static str {
        FETCH_ERROR_MESSAGE
    }
}

/// Why a geolocation request produced no coordinates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    #[error("location request was denied")]
    Denied,
    #[error("location service unavailable: {0}")]
    Unavailable(String),
    #[error("geolocation is disabled in configuration")]
    Disabled,
}

impl From<reqwest::Error> for LocationError {
    fn from(err: reqwest::Error) -> Self {
        LocationError::Unavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_fetch_error_has_the_same_user_message() {
        let errors = [
            FetchError::Status { status: StatusCode::NOT_FOUND, body: "{}".into() },
            FetchError::Status { status: StatusCode::TOO_MANY_REQUESTS, body: String::new() },
            FetchError::Malformed("duplicate forecast date".into()),
            FetchError::Decode(serde_json::from_str::<u8>("nope").unwrap_err()),
        ];

        for err in &errors {
            assert_eq!(err.user_message(), "City not found or API error.");
        }
    }

    #[test]
    fn status_error_display_includes_code() {
        let err = FetchError::Status { status: StatusCode::UNAUTHORIZED, body: "bad key".into() };
        let msg = err.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("bad key"));
    }
}
