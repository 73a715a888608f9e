use std::io::{self, Cursor, Read, Seek, SeekFrom};

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use zugferd::codes::{CurrencyCode, TaxCategoryCode};
use zugferd::*;

fn invoice(profile: Profile) -> InvoiceDescriptor {
    InvoiceBuilder::new("D-1", NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), CurrencyCode::Eur)
        .profile(profile)
        .seller(PartyBuilder::new("Verkäufer GmbH").build())
        .add_line(
            LineItemBuilder::new("1", "Artikel", dec!(1), dec!(10))
                .tax(TaxCategoryCode::StandardRate, dec!(19))
                .build(),
        )
        .build()
}

fn written(profile: Profile, version: ZugferdVersion, format: ZugferdFormat) -> Cursor<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    invoice(profile).save(&mut cursor, version, format).unwrap();
    cursor
}

#[test]
fn writer_output_is_detected_as_its_own_kind() {
    let cases = [
        (Profile::BASIC, ZugferdVersion::Version1, ZugferdFormat::Cii, DocumentKind::CiiVersion1),
        (Profile::BASIC_WL, ZugferdVersion::Version20, ZugferdFormat::Cii, DocumentKind::CiiVersion20),
        (Profile::EXTENDED, ZugferdVersion::Version23, ZugferdFormat::Cii, DocumentKind::CiiVersion23),
        #[cfg(feature = "ubl")]
        (Profile::COMFORT, ZugferdVersion::Version23, ZugferdFormat::Ubl, DocumentKind::Ubl),
    ];
    for (profile, version, format, expected) in cases {
        let mut cursor = written(profile, version, format);
        let kind = detect(&mut cursor).unwrap();
        assert_eq!(kind, expected, "{profile} {version:?} {format:?}");
        assert_eq!(kind.version(), version);
        assert_eq!(kind.format(), format);

        let back = InvoiceDescriptor::load(&mut cursor).unwrap();
        assert_eq!(back.profile, profile);
        assert_eq!(back.invoice_no, "D-1");
    }
}

#[test]
fn comfort_2x_documents_go_to_the_newer_reader() {
    // The Comfort identifier is shared by 2.0 and 2.1+.
    let mut cursor = written(Profile::COMFORT, ZugferdVersion::Version20, ZugferdFormat::Cii);
    assert_eq!(detect(&mut cursor).unwrap(), DocumentKind::CiiVersion23);
    let back = InvoiceDescriptor::load(&mut cursor).unwrap();
    assert_eq!(back.profile, Profile::COMFORT);
}

#[test]
fn is_readable_by_leaves_the_stream_alone() {
    let mut cursor = written(Profile::EXTENDED, ZugferdVersion::Version23, ZugferdFormat::Cii);
    cursor.set_position(0);

    assert!(CiiVersion23Reader.is_readable_by(&mut cursor).unwrap());
    assert!(!CiiVersion1Reader.is_readable_by(&mut cursor).unwrap());
    assert!(!CiiVersion20Reader.is_readable_by(&mut cursor).unwrap());
    assert_eq!(cursor.position(), 0);
    assert_eq!(detect(&mut cursor).unwrap(), detect(&mut cursor).unwrap());
}

#[test]
fn byte_order_mark_is_tolerated() {
    let xml = invoice(Profile::BASIC)
        .to_xml(ZugferdVersion::Version23, ZugferdFormat::Cii)
        .unwrap();
    let with_bom = format!("\u{feff}{xml}");
    let back = InvoiceDescriptor::load_str(&with_bom).unwrap();
    assert_eq!(back.invoice_no, "D-1");
}

/// Reads fine, refuses to seek.
struct NoSeek(Cursor<Vec<u8>>);

impl Read for NoSeek {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl Seek for NoSeek {
    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "not seekable"))
    }
}

#[test]
fn unseekable_stream_is_illegal() {
    let mut stream = NoSeek(Cursor::new(b"<a/>".to_vec()));
    let err = detect(&mut stream).unwrap_err();
    assert!(matches!(err, ZugferdError::IllegalStream(_)));
}

/// Seeks fine, fails every read.
struct NoRead(Cursor<Vec<u8>>);

impl Read for NoRead {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "not readable"))
    }
}

impl Seek for NoRead {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.0.seek(pos)
    }
}

#[test]
fn unreadable_stream_fails_detection_with_io_and_load_as_illegal() {
    let mut stream = NoRead(Cursor::new(b"<a/>".to_vec()));
    assert!(matches!(detect(&mut stream).unwrap_err(), ZugferdError::Io(_)));
    let err = InvoiceDescriptor::load(&mut stream).unwrap_err();
    assert!(matches!(err, ZugferdError::IllegalStream(_)));
    assert_eq!(stream.0.position(), 0);
}
