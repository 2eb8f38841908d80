use storemap_client::ClientError;
use storemap_core::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("admin session required")]
    PermissionDenied,

    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("request failed: {0}")]
    Client(#[from] ClientError),

    #[error("no store named {0:?} is on the map")]
    UnknownStore(String),

    #[error("account does not have admin rights")]
    NotAdmin,

    #[error("{0} is required")]
    MissingCredential(&'static str),
}

impl AppError {
    /// Text for the user-facing alert. Server-supplied messages pass through
    /// verbatim; transport failures get a generic line.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::PermissionDenied => "You must be logged in as admin.".to_string(),
            Self::Validation(err) => err.to_string(),
            Self::Client(err) => match err.api_message() {
                Some(message) => message.to_string(),
                None => "Request failed. Please try again.".to_string(),
            },
            Self::UnknownStore(name) => format!("Store {name:?} was not found."),
            Self::NotAdmin => "This account does not have admin rights.".to_string(),
            Self::MissingCredential(field) => format!("Please enter the {field}."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_message_passes_through() {
        let err = AppError::from(ClientError::Api("Thiếu thông tin".to_string()));
        assert_eq!(err.user_message(), "Thiếu thông tin");
    }

    #[test]
    fn transport_failure_is_generic() {
        let err = AppError::from(ClientError::UnexpectedStatus {
            status: 502,
            url: "http://localhost/api/stores".to_string(),
        });
        assert_eq!(err.user_message(), "Request failed. Please try again.");
    }
}
