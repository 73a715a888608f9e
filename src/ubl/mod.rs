//! OASIS UBL 2.1 `Invoice` / `CreditNote` as profiled by EN 16931 and
//! XRechnung.
//!
//! UBL only exists for ZUGFeRD/Factur-X 2.1+; the customization id uses the
//! same identifier table as CII 2.1–2.3. Credit notes get their own root
//! element, namespace and line element names.

mod reader;
mod writer;

pub use reader::UblReader;
pub use writer::UblWriter;

use crate::core::PartyRole;
use crate::xml::Namespaces;

/// UBL 2.1 namespace URIs.
pub mod ns {
    pub const INVOICE: &str = "urn:oasis:names:specification:ubl:schema:xsd:Invoice-2";
    pub const CREDIT_NOTE: &str = "urn:oasis:names:specification:ubl:schema:xsd:CreditNote-2";
    pub const CAC: &str = "urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2";
    pub const CBC: &str = "urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2";
}

pub(crate) const NAMESPACES: Namespaces = &[
    ("inv", ns::INVOICE),
    ("cn", ns::CREDIT_NOTE),
    ("cac", ns::CAC),
    ("cbc", ns::CBC),
];

/// Party roles UBL can carry. Ship-from, invoicer, invoicee and
/// ultimate ship-to have no place in the syntax.
pub const SUPPORTED_ROLES: &[PartyRole] = &[
    PartyRole::Seller,
    PartyRole::Buyer,
    PartyRole::ShipTo,
    PartyRole::Payee,
    PartyRole::SellerTaxRepresentative,
];

/// `schemeID` marking the seller's SEPA creditor identifier.
pub(crate) const SEPA_SCHEME: &str = "SEPA";

/// Root-dependent element names.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DocumentLayout {
    pub root: &'static str,
    /// Root as a query step.
    pub step: &'static str,
    pub namespace: &'static str,
    pub type_code: &'static str,
    pub line: &'static str,
    pub quantity: &'static str,
}

pub(crate) const INVOICE_LAYOUT: DocumentLayout = DocumentLayout {
    root: "ubl:Invoice",
    step: "inv:Invoice",
    namespace: ns::INVOICE,
    type_code: "cbc:InvoiceTypeCode",
    line: "cac:InvoiceLine",
    quantity: "cbc:InvoicedQuantity",
};

pub(crate) const CREDIT_NOTE_LAYOUT: DocumentLayout = DocumentLayout {
    root: "ubl:CreditNote",
    step: "cn:CreditNote",
    namespace: ns::CREDIT_NOTE,
    type_code: "cbc:CreditNoteTypeCode",
    line: "cac:CreditNoteLine",
    quantity: "cbc:CreditedQuantity",
};
