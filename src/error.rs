//! Error types for the camt053_downgrade library.

use quick_xml::events::attributes::AttrError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while fixing a statement document.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error occurred during read or write operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input file does not exist.
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Input is not well-formed XML.
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// Root element is not namespace-qualified.
    #[error("Input XML has no namespace; expected ISO 20022 camt.053")]
    MissingNamespace,

    /// No `BkToCstmrStmt` element under the working namespace.
    #[error("Could not find BkToCstmrStmt; not a camt.053 statement?")]
    NotACamtStatement,
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlError(err.to_string())
    }
}

impl From<AttrError> for Error {
    fn from(err: AttrError) -> Self {
        Error::XmlError(err.to_string())
    }
}
