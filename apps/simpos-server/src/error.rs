//! Error types for the simulator server.
//!
//! Only startup can fail. Per-request problems are rendered into replies by
//! the engine and never surface here.

/// Server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("could not listen on {addr}: {source} (is another process bound to the port?)")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP server failed: {0}")]
    Serve(#[source] std::io::Error),
}

/// Convenience type alias for Results with ServerError.
pub type ServerResult<T> = Result<T, ServerError>;
