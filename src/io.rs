//! Reader and writer contracts.

use std::io::{Read, Seek, SeekFrom, Write};

use crate::core::{InvoiceDescriptor, Profile, ZugferdError, ZugferdVersion, illegal_stream};
use crate::detect;

/// Turns one XML dialect into an [`InvoiceDescriptor`].
pub trait InvoiceReader {
    /// Literal identifiers whose presence marks a document as readable.
    fn identifiers(&self) -> Vec<&'static str>;

    /// Parse a complete document.
    fn parse(&self, doc: &roxmltree::Document<'_>) -> Result<InvoiceDescriptor, ZugferdError>;

    /// Sniff the stream for this reader's identifiers. The stream position
    /// is left unchanged.
    fn is_readable_by<R: Read + Seek>(&self, stream: &mut R) -> Result<bool, ZugferdError> {
        let ids = self.identifiers();
        detect::contains_any(stream, &ids)
    }

    /// Read the document from the current position to the end of the stream.
    fn load<R: Read + Seek>(&self, stream: &mut R) -> Result<InvoiceDescriptor, ZugferdError> {
        let xml = read_to_string(stream)?;
        self.parse_str(&xml)
    }

    fn parse_str(&self, xml: &str) -> Result<InvoiceDescriptor, ZugferdError> {
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
        let doc = roxmltree::Document::parse(xml)?;
        self.parse(&doc)
    }
}

/// Turns an [`InvoiceDescriptor`] into one XML dialect.
pub trait InvoiceWriter {
    fn version(&self) -> ZugferdVersion;

    /// Profiles this writer can emit.
    fn supports(&self, profile: Profile) -> bool;

    /// Serialize the descriptor. Called by [`InvoiceWriter::save`] after the
    /// descriptor has been checked.
    fn write<W: Write>(&self, descriptor: &InvoiceDescriptor, out: W) -> Result<(), ZugferdError>;

    /// Write at the current stream position, then move the cursor back to
    /// where writing started.
    ///
    /// Fails before any byte is written when the profile is not supported or
    /// an attachment has content but no filename. Later failures leave the
    /// partially written bytes in place.
    fn save<W: Write + Seek>(&self, descriptor: &InvoiceDescriptor, stream: &mut W) -> Result<(), ZugferdError> {
        if !self.supports(descriptor.profile) {
            return Err(ZugferdError::UnsupportedProfile {
                profile: descriptor.profile,
                version: self.version(),
            });
        }
        check_attachments(descriptor)?;

        let start = stream.stream_position().map_err(illegal_stream)?;
        self.write(descriptor, &mut *stream)?;
        stream.flush()?;
        stream.seek(SeekFrom::Start(start)).map_err(illegal_stream)?;
        tracing::debug!(
            version = ?self.version(),
            profile = %descriptor.profile,
            invoice_no = %descriptor.invoice_no,
            "invoice written"
        );
        Ok(())
    }
}

pub(crate) fn read_to_string<R: Read + Seek>(stream: &mut R) -> Result<String, ZugferdError> {
    stream.stream_position().map_err(illegal_stream)?;
    let mut xml = String::new();
    stream.read_to_string(&mut xml)?;
    Ok(xml)
}

/// Every embedded attachment needs a filename.
pub(crate) fn check_attachments(descriptor: &InvoiceDescriptor) -> Result<(), ZugferdError> {
    let line_docs = descriptor
        .trade_line_items
        .iter()
        .flat_map(|l| l.additional_referenced_documents.iter());
    for doc in descriptor.additional_referenced_documents.iter().chain(line_docs) {
        let named = doc.filename.as_deref().is_some_and(|f| !f.trim().is_empty());
        if doc.has_attachment() && !named {
            return Err(ZugferdError::MissingFilename(doc.id.clone()));
        }
    }
    Ok(())
}
