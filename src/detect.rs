//! Format and version detection by literal identifier sniffing.
//!
//! The stream is read to the end, all whitespace is removed and the text is
//! lower-cased. A reader claims the document when one of its identifiers
//! occurs either as a quoted attribute value (`="id"`) or as the complete
//! text of an element (`>id<`). Candidates are tried in [`DETECTION_ORDER`];
//! the first claim wins.
//!
//! Identifiers shared between CII 2.0 and 2.1+ (e.g.
//! `urn:cen.eu:en16931:2017`) therefore select the 2.1+ reader.

use std::io::{Read, Seek, SeekFrom};

use crate::cii::{CiiVersion1Reader, CiiVersion20Reader, CiiVersion23Reader};
use crate::core::{InvoiceDescriptor, ZugferdError, ZugferdFormat, ZugferdVersion, illegal_stream};
use crate::io::InvoiceReader;
#[cfg(feature = "ubl")]
use crate::ubl::UblReader;

/// A (syntax, version) pair with a reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    #[cfg(feature = "ubl")]
    Ubl,
    CiiVersion1,
    CiiVersion20,
    CiiVersion23,
}

/// Priority in which readers are asked to claim a document.
pub const DETECTION_ORDER: &[DocumentKind] = &[
    #[cfg(feature = "ubl")]
    DocumentKind::Ubl,
    DocumentKind::CiiVersion1,
    DocumentKind::CiiVersion23,
    DocumentKind::CiiVersion20,
];

impl DocumentKind {
    pub fn version(self) -> ZugferdVersion {
        match self {
            #[cfg(feature = "ubl")]
            DocumentKind::Ubl => ZugferdVersion::Version23,
            DocumentKind::CiiVersion1 => ZugferdVersion::Version1,
            DocumentKind::CiiVersion20 => ZugferdVersion::Version20,
            DocumentKind::CiiVersion23 => ZugferdVersion::Version23,
        }
    }

    pub fn format(self) -> ZugferdFormat {
        match self {
            #[cfg(feature = "ubl")]
            DocumentKind::Ubl => ZugferdFormat::Ubl,
            _ => ZugferdFormat::Cii,
        }
    }

    pub fn identifiers(self) -> Vec<&'static str> {
        match self {
            #[cfg(feature = "ubl")]
            DocumentKind::Ubl => UblReader.identifiers(),
            DocumentKind::CiiVersion1 => CiiVersion1Reader.identifiers(),
            DocumentKind::CiiVersion20 => CiiVersion20Reader.identifiers(),
            DocumentKind::CiiVersion23 => CiiVersion23Reader.identifiers(),
        }
    }

    /// Read a document with this kind's reader.
    pub fn load<R: Read + Seek>(self, stream: &mut R) -> Result<InvoiceDescriptor, ZugferdError> {
        match self {
            #[cfg(feature = "ubl")]
            DocumentKind::Ubl => UblReader.load(stream),
            DocumentKind::CiiVersion1 => CiiVersion1Reader.load(stream),
            DocumentKind::CiiVersion20 => CiiVersion20Reader.load(stream),
            DocumentKind::CiiVersion23 => CiiVersion23Reader.load(stream),
        }
    }
}

/// Identify the dialect of the document at the current stream position.
///
/// Read-only: the stream position is restored before returning, on success
/// and on failure.
pub fn detect<R: Read + Seek>(stream: &mut R) -> Result<DocumentKind, ZugferdError> {
    let text = sniff(stream)?;
    for kind in DETECTION_ORDER {
        if kind.identifiers().iter().any(|id| matches_identifier(&text, id)) {
            tracing::debug!(?kind, "document format detected");
            return Ok(*kind);
        }
    }
    tracing::debug!("no reader recognised the document");
    Err(ZugferdError::UnknownFormat)
}

/// Does the stream mention any of `identifiers`? Position is restored.
pub fn contains_any<R: Read + Seek>(stream: &mut R, identifiers: &[&str]) -> Result<bool, ZugferdError> {
    let text = sniff(stream)?;
    Ok(identifiers.iter().any(|id| matches_identifier(&text, id)))
}

/// Read the rest of the stream as normalized text, then rewind.
fn sniff<R: Read + Seek>(stream: &mut R) -> Result<String, ZugferdError> {
    let start = stream.stream_position().map_err(illegal_stream)?;
    let mut raw = Vec::new();
    let read = stream.read_to_end(&mut raw);
    stream.seek(SeekFrom::Start(start)).map_err(illegal_stream)?;
    read?;
    Ok(normalize(&String::from_utf8_lossy(&raw)))
}

fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn matches_identifier(normalized: &str, identifier: &str) -> bool {
    let id = normalize(identifier);
    normalized.contains(&format!("=\"{id}\"")) || normalized.contains(&format!(">{id}<"))
}
