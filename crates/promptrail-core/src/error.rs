pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("history document JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("execution store error: {message}")]
    Store { message: String },
}
