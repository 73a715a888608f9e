//! UN/CEFACT Cross Industry Invoice readers and writers.
//!
//! | Version | Root | Writer profiles |
//! |---------|------|-----------------|
//! | ZUGFeRD 1.0 | `rsm:CrossIndustryDocument` | Basic, Comfort, Extended |
//! | ZUGFeRD 2.0 | `rsm:CrossIndustryInvoice` | Minimum … Extended, XRechnung 1.x |
//! | ZUGFeRD 2.1–2.3 / Factur-X | `rsm:CrossIndustryInvoice` | Minimum … Extended, XRechnung |
//!
//! Each version has its own reader and writer. Only the party,
//! referenced-document, note and bank-account sub-parsers are shared.

pub(crate) mod common;
mod v1_reader;
mod v1_writer;
mod v20_reader;
mod v20_writer;
mod v23_reader;
mod v23_writer;

pub use v1_reader::CiiVersion1Reader;
pub use v1_writer::CiiVersion1Writer;
pub use v20_reader::CiiVersion20Reader;
pub use v20_writer::CiiVersion20Writer;
pub use v23_reader::CiiVersion23Reader;
pub use v23_writer::CiiVersion23Writer;

use crate::xml::Namespaces;

/// ZUGFeRD 1.0 namespace URIs.
pub mod ns_v1 {
    pub const RSM: &str = "urn:ferd:CrossIndustryDocument:invoice:1p0";
    pub const RAM: &str =
        "urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:12";
    pub const UDT: &str = "urn:un:unece:uncefact:data:standard:UnqualifiedDataType:15";
}

/// CII D16B namespace URIs (ZUGFeRD 2.x).
pub mod ns {
    pub const RSM: &str = "urn:un:unece:uncefact:data:standard:CrossIndustryInvoice:100";
    pub const RAM: &str =
        "urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:100";
    pub const QDT: &str = "urn:un:unece:uncefact:data:standard:QualifiedDataType:100";
    pub const UDT: &str = "urn:un:unece:uncefact:data:standard:UnqualifiedDataType:100";
}

pub(crate) const NAMESPACES_V1: Namespaces = &[
    ("rsm", ns_v1::RSM),
    ("ram", ns_v1::RAM),
    ("udt", ns_v1::UDT),
];

pub(crate) const NAMESPACES: Namespaces = &[
    ("rsm", ns::RSM),
    ("ram", ns::RAM),
    ("qdt", ns::QDT),
    ("udt", ns::UDT),
];
