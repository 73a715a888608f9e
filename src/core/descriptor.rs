use std::io::{Cursor, ErrorKind, Read, Seek, Write};

use super::error::{ZugferdError, illegal_stream};
use super::profile::{ZugferdFormat, ZugferdVersion};
use super::types::InvoiceDescriptor;
use crate::cii::{CiiVersion1Writer, CiiVersion20Writer, CiiVersion23Writer};
use crate::detect;
use crate::io::InvoiceWriter;
#[cfg(feature = "ubl")]
use crate::ubl::UblWriter;

impl InvoiceDescriptor {
    /// Detect the dialect of the document at the current stream position
    /// and read it.
    ///
    /// A stream that cannot be read fails with
    /// [`ZugferdError::IllegalStream`]. Input that is not UTF-8 stays an
    /// [`ZugferdError::Io`] error.
    ///
    /// ```
    /// use zugferd::{InvoiceDescriptor, ZugferdError};
    ///
    /// let err = InvoiceDescriptor::load_str("<note>not an invoice</note>").unwrap_err();
    /// assert!(matches!(err, ZugferdError::UnknownFormat));
    /// ```
    pub fn load<R: Read + Seek>(stream: &mut R) -> Result<Self, ZugferdError> {
        let kind = detect::detect(stream).map_err(unreadable)?;
        kind.load(stream).map_err(unreadable)
    }

    pub fn load_str(xml: &str) -> Result<Self, ZugferdError> {
        Self::load(&mut Cursor::new(xml.as_bytes()))
    }

    /// Write the descriptor in the given version and syntax.
    ///
    /// The descriptor's own [`Profile`](super::Profile) selects the
    /// guideline id and which elements are written. UBL exists only for
    /// [`ZugferdVersion::Version23`].
    pub fn save<W: Write + Seek>(
        &self,
        stream: &mut W,
        version: ZugferdVersion,
        format: ZugferdFormat,
    ) -> Result<(), ZugferdError> {
        match (format, version) {
            (ZugferdFormat::Cii, ZugferdVersion::Version1) => CiiVersion1Writer.save(self, stream),
            (ZugferdFormat::Cii, ZugferdVersion::Version20) => CiiVersion20Writer.save(self, stream),
            (ZugferdFormat::Cii, ZugferdVersion::Version23) => CiiVersion23Writer.save(self, stream),
            #[cfg(feature = "ubl")]
            (ZugferdFormat::Ubl, ZugferdVersion::Version23) => UblWriter.save(self, stream),
            (ZugferdFormat::Ubl, _) => Err(ZugferdError::UnsupportedFormat { version, format }),
        }
    }

    /// [`InvoiceDescriptor::save`] into a string.
    pub fn to_xml(&self, version: ZugferdVersion, format: ZugferdFormat) -> Result<String, ZugferdError> {
        let mut cursor = Cursor::new(Vec::new());
        self.save(&mut cursor, version, format)?;
        String::from_utf8(cursor.into_inner()).map_err(|e| ZugferdError::Xml(e.to_string()))
    }
}

fn unreadable(e: ZugferdError) -> ZugferdError {
    match e {
        ZugferdError::Io(io) if io.kind() != ErrorKind::InvalidData => illegal_stream(io),
        other => other,
    }
}
