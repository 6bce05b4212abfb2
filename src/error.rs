/// Errors from editing a [`crate::model::LifeMap`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MapError {
    #[error("Unknown node: {id}")]
    UnknownNode { id: String },

    #[error("Unknown edge: {id}")]
    UnknownEdge { id: String },
}

/// Errors from the project store that callers may want to tell apart.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Project not found: {id}")]
    NotFound { id: String },

    #[error("Project {id} belongs to another user")]
    NotOwner { id: String },

    #[error("Project name must not be empty")]
    EmptyName,

    #[error("Invalid project id: {id:?}")]
    InvalidId { id: String },

    #[error("Corrupt project {id}: {source}")]
    Corrupt {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}
