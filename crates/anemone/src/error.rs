#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed hierarchy input: {message}")]
    MalformedTree { message: String },

    #[error("link references an unknown node id: {source_id} -> {target_id}")]
    UnknownLinkEndpoint {
        source_id: String,
        target_id: String,
    },

    #[error("duplicate node id: {id}")]
    DuplicateNodeId { id: String },
}

pub type Result<T> = std::result::Result<T, Error>;
