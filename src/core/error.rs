use thiserror::Error;

use super::profile::{Profile, ZugferdFormat, ZugferdVersion};

/// Errors that can occur while detecting, reading or writing an invoice.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ZugferdError {
    /// The stream cannot be positioned (seek or tell failed).
    #[error("illegal stream: {0}")]
    IllegalStream(String),

    /// No reader recognised the document.
    #[error("unknown format: no reader recognised the document")]
    UnknownFormat,

    /// A date element carried a format code no reader understands.
    #[error("unsupported date format code '{0}'")]
    UnsupportedDateFormat(String),

    /// A structurally required element (root, trade transaction) is missing.
    #[error("missing required element: {0}")]
    MissingNode(String),

    /// The input is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(String),

    /// An attachment carries binary content but no filename.
    #[error("attachment '{0}' has binary content but no filename")]
    MissingFilename(String),

    /// The writer cannot emit the requested profile.
    #[error("profile {profile} is not supported by the {version:?} writer")]
    UnsupportedProfile {
        profile: Profile,
        version: ZugferdVersion,
    },

    /// The version/format combination has no writer.
    #[error("{format:?} is not available for {version:?}")]
    UnsupportedFormat {
        version: ZugferdVersion,
        format: ZugferdFormat,
    },

    /// A value derived while writing does not fit a decimal.
    #[error("arithmetic overflow computing {0}")]
    Overflow(&'static str),

    /// Reading from or writing to the underlying stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<roxmltree::Error> for ZugferdError {
    fn from(e: roxmltree::Error) -> Self {
        ZugferdError::Xml(e.to_string())
    }
}

pub(crate) fn illegal_stream(e: std::io::Error) -> ZugferdError {
    ZugferdError::IllegalStream(e.to_string())
}
