#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// The entity existed but its time-to-live has lapsed.
    #[error("Entity expired: {entity} with id {id}")]
    Expired { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),
}
