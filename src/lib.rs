//! # zugferd
//!
//! Read and write ZUGFeRD / Factur-X / XRechnung e-invoice XML through a
//! single dialect-neutral model.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! The model follows the [EN 16931](https://standards.cencenelec.eu/dyn/www/f?p=205:110:0::::FSP_PROJECT:60602) semantic model.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use zugferd::codes::{CountryCode, CurrencyCode, TaxCategoryCode};
//! use zugferd::*;
//!
//! let mut invoice = InvoiceBuilder::new("RE-2024-001", NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(), CurrencyCode::Eur)
//!     .profile(Profile::COMFORT)
//!     .seller(PartyBuilder::new("ACME GmbH").address("Hauptstr. 1", "10115", "Berlin", CountryCode::De)
//!         .vat_id("DE123456789").build())
//!     .buyer(PartyBuilder::new("Kunde AG").address("Marienplatz 2", "80331", "München", CountryCode::De).build())
//!     .add_line(LineItemBuilder::new("1", "Beratung", dec!(10), dec!(150))
//!         .tax(TaxCategoryCode::StandardRate, dec!(19)).build())
//!     .build();
//! invoice.add_tax(dec!(1500), dec!(19), TaxCategoryCode::StandardRate);
//!
//! let xml = invoice.to_xml(ZugferdVersion::Version23, ZugferdFormat::Cii).unwrap();
//! let back = InvoiceDescriptor::load_str(&xml).unwrap();
//! assert_eq!(back.taxes[0].tax_amount, dec!(285.00));
//! ```
//!
//! ## Dialects
//!
//! | Syntax | Versions | Module |
//! |--------|----------|--------|
//! | CII | ZUGFeRD 1.0, 2.0, 2.1–2.3 | [`cii`] |
//! | UBL 2.1 | 2.1–2.3 (feature `ubl`, default) | `ubl` |
//!
//! [`InvoiceDescriptor::load`] sniffs the dialect via [`detect()`];
//! [`InvoiceDescriptor::save`] picks the writer from version and syntax.

pub mod cii;
pub mod codes;
pub mod core;
pub mod detect;
pub mod io;
#[cfg(feature = "ubl")]
pub mod ubl;
pub mod xml;

pub use crate::cii::{
    CiiVersion1Reader, CiiVersion1Writer, CiiVersion20Reader, CiiVersion20Writer, CiiVersion23Reader,
    CiiVersion23Writer,
};
pub use crate::core::*;
pub use crate::detect::{DocumentKind, detect};
pub use crate::io::{InvoiceReader, InvoiceWriter};
#[cfg(feature = "ubl")]
pub use crate::ubl::{UblReader, UblWriter};
