use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the CML engine.
///
/// No internal recovery is attempted; every failure propagates to the
/// immediate caller.
#[derive(Debug, Error)]
pub enum CmlError {
    /// The tag grammar itself failed to compile.
    #[error("CML Syntax Error: {0}")]
    Syntax(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// A whole-content parse failed in one of its sub-extractions. The
    /// original failure stays inspectable as the chained cause.
    #[error("Error parsing content: {source}")]
    Content {
        #[source]
        source: Box<CmlError>,
    },

    /// Generation was requested with an unrecognized block kind.
    #[error("Invalid block type: {0}")]
    InvalidBlockType(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
