use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("record encoding error: {0}")]
    Codec(#[from] serde_json::Error),
}
