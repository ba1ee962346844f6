use raki_core::services::ServiceError;
use thiserror::Error;

pub type SkillResult<T> = Result<T, SkillError>;

#[derive(Error, Debug)]
pub enum SkillError {
    #[error("command refused: {0}")]
    NotAllowed(String),

    #[error("not configured: {0}")]
    NotConfigured(String),

    #[error("offline mode is on")]
    Offline,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("mail error: {0}")]
    Mail(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Failed(String),
}

impl From<SkillError> for ServiceError {
    fn from(e: SkillError) -> Self {
        match e {
            SkillError::NotAllowed(cmd) => ServiceError::NotAllowed(cmd),
            SkillError::NotConfigured(_) | SkillError::Offline => ServiceError::Unavailable(e.to_string()),
            SkillError::Http(_) => ServiceError::Network(e.to_string()),
            SkillError::Mail(_) | SkillError::Io(_) | SkillError::Failed(_) => ServiceError::Failed(e.to_string()),
        }
    }
}

impl From<lettre::error::Error> for SkillError {
    fn from(e: lettre::error::Error) -> Self {
        SkillError::Mail(e.to_string())
    }
}

impl From<lettre::address::AddressError> for SkillError {
    fn from(e: lettre::address::AddressError) -> Self {
        SkillError::Mail(format!("invalid address: {}", e))
    }
}

impl From<lettre::transport::smtp::Error> for SkillError {
    fn from(e: lettre::transport::smtp::Error) -> Self {
        SkillError::Mail(e.to_string())
    }
}
