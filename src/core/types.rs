use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::profile::Profile;
use crate::codes::*;

/// The in-memory invoice document shared by every reader and writer.
///
/// Party roles and referenced-document roles are positional fields, so a
/// document read from one dialect can be written to another.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDescriptor {
    /// BT-1: Invoice number.
    pub invoice_no: String,
    /// BT-2: Issue date.
    pub invoice_date: Option<NaiveDate>,
    /// BT-3: Document type (invoice, credit note, correction...).
    pub invoice_type: InvoiceType,
    /// Document name (ZUGFeRD 1.0 / Extended).
    pub name: Option<String>,
    pub is_test: bool,
    /// BT-23: Business process identifier.
    pub business_process: Option<String>,
    pub profile: Profile,
    /// BT-5: Invoice currency.
    pub currency: CurrencyCode,
    /// BT-6: VAT accounting currency.
    pub tax_currency: Option<CurrencyCode>,
    /// BG-1: Notes.
    pub notes: Vec<Note>,
    /// BT-10: Buyer reference (Leitweg-ID for XRechnung).
    pub buyer_reference: Option<String>,
    /// BT-83: Remittance information.
    pub payment_reference: Option<String>,

    pub seller: Option<Party>,
    pub buyer: Option<Party>,
    pub ship_to: Option<Party>,
    pub ultimate_ship_to: Option<Party>,
    pub ship_from: Option<Party>,
    pub invoicee: Option<Party>,
    pub invoicer: Option<Party>,
    pub payee: Option<Party>,
    pub seller_tax_representative: Option<Party>,

    /// BT-13: Purchase order reference.
    pub buyer_order_referenced_document: Option<ReferencedDocument>,
    /// BT-14: Sales order reference.
    pub seller_order_referenced_document: Option<ReferencedDocument>,
    /// BT-12: Contract reference.
    pub contract_referenced_document: Option<ReferencedDocument>,
    pub delivery_note_referenced_document: Option<ReferencedDocument>,
    /// BT-16: Despatch advice reference.
    pub despatch_advice_referenced_document: Option<ReferencedDocument>,
    /// BG-3: Preceding invoice references.
    pub invoice_referenced_documents: Vec<ReferencedDocument>,
    /// BG-24: Additional supporting documents, possibly with attachments.
    pub additional_referenced_documents: Vec<ReferencedDocument>,
    /// BT-11: Project reference.
    pub specified_procuring_project: Option<ProcuringProject>,

    /// BT-72: Actual delivery date.
    pub actual_delivery_date: Option<NaiveDate>,
    /// BG-14: Invoicing period.
    pub billing_period: Option<BillingPeriod>,

    /// BG-25: Invoice lines, in document order.
    pub trade_line_items: Vec<TradeLineItem>,
    /// BG-23: VAT breakdown.
    pub taxes: Vec<Tax>,
    /// BG-20 / BG-21: Document-level allowances and charges.
    pub trade_allowance_charges: Vec<TradeAllowanceCharge>,
    /// Logistics service charges (ZUGFeRD 1.0 / Extended).
    pub service_charges: Vec<ServiceCharge>,

    /// BG-16: Payment instructions.
    pub payment_means: Option<PaymentMeans>,
    pub creditor_bank_accounts: Vec<BankAccount>,
    pub debitor_bank_accounts: Vec<BankAccount>,
    pub payment_terms: Vec<PaymentTerms>,

    /// BG-22: Document totals.
    pub totals: MonetarySummation,
    /// BT-19: Buyer accounting reference.
    pub receivable_accounting_accounts: Vec<AccountingAccount>,
}

/// An identifier qualified by an optional coding scheme.
///
/// `scheme: None` (no scheme given) is distinct from an empty `value`
/// (no identifier). Writers skip identifiers with an empty value and never
/// emit a scheme on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemedId<S> {
    pub scheme: Option<S>,
    pub value: String,
}

impl<S: CodeList> SchemedId<S> {
    pub fn new(scheme: S, value: impl Into<String>) -> Self {
        Self {
            scheme: Some(scheme),
            value: value.into(),
        }
    }

    pub fn unqualified(value: impl Into<String>) -> Self {
        Self {
            scheme: None,
            value: value.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Token for the `schemeID` attribute, if one should be written.
    pub fn scheme_token(&self) -> Option<&'static str> {
        if self.is_empty() {
            return None;
        }
        self.scheme.map(CodeList::format).filter(|t| !t.is_empty())
    }
}

/// ISO 6523 qualified party or product identifier.
pub type GlobalId = SchemedId<GlobalIdScheme>;
/// BT-34 / BT-49: Electronic address.
pub type ElectronicAddress = SchemedId<ElectronicAddressScheme>;
/// BT-31 / BT-32: VAT id or fiscal number.
pub type TaxRegistration = SchemedId<TaxRegistrationScheme>;

/// A trading party. Its role is the descriptor field it is stored in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    /// Proprietary party id (`ram:ID`).
    pub id: Option<GlobalId>,
    pub global_id: Option<GlobalId>,
    pub description: Option<String>,
    pub contact: Option<Contact>,
    pub street: Option<String>,
    pub address_line2: Option<String>,
    pub address_line3: Option<String>,
    pub city: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<CountryCode>,
    pub subdivision: Option<String>,
    pub legal_organization: Option<LegalOrganization>,
    pub electronic_address: Option<ElectronicAddress>,
    pub tax_registrations: Vec<TaxRegistration>,
}

impl Party {
    pub fn tax_registration(&self, scheme: TaxRegistrationScheme) -> Option<&str> {
        self.tax_registrations
            .iter()
            .find(|r| r.scheme == Some(scheme) && !r.is_empty())
            .map(|r| r.value.as_str())
    }
}

/// Positional party roles, used by dialects that cannot carry every role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartyRole {
    Seller,
    Buyer,
    ShipTo,
    UltimateShipTo,
    ShipFrom,
    Invoicee,
    Invoicer,
    Payee,
    SellerTaxRepresentative,
}

impl PartyRole {
    pub const ALL: [PartyRole; 9] = [
        PartyRole::Seller,
        PartyRole::Buyer,
        PartyRole::ShipTo,
        PartyRole::UltimateShipTo,
        PartyRole::ShipFrom,
        PartyRole::Invoicee,
        PartyRole::Invoicer,
        PartyRole::Payee,
        PartyRole::SellerTaxRepresentative,
    ];
}

impl InvoiceDescriptor {
    pub fn party(&self, role: PartyRole) -> Option<&Party> {
        match role {
            PartyRole::Seller => self.seller.as_ref(),
            PartyRole::Buyer => self.buyer.as_ref(),
            PartyRole::ShipTo => self.ship_to.as_ref(),
            PartyRole::UltimateShipTo => self.ultimate_ship_to.as_ref(),
            PartyRole::ShipFrom => self.ship_from.as_ref(),
            PartyRole::Invoicee => self.invoicee.as_ref(),
            PartyRole::Invoicer => self.invoicer.as_ref(),
            PartyRole::Payee => self.payee.as_ref(),
            PartyRole::SellerTaxRepresentative => self.seller_tax_representative.as_ref(),
        }
    }
}

/// BG-6 / BG-9: Contact point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: Option<String>,
    pub org_unit: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
}

impl Contact {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.org_unit.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.fax.is_none()
    }
}

/// BT-30 / BT-28: Legal registration and trading name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalOrganization {
    pub id: Option<GlobalId>,
    pub trading_business_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub content: String,
    pub subject_code: Option<SubjectCode>,
    pub content_code: Option<ContentCode>,
}

impl Note {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_subject(content: impl Into<String>, subject: SubjectCode) -> Self {
        Self {
            content: content.into(),
            subject_code: Some(subject),
            content_code: None,
        }
    }
}

/// A reference to another document.
///
/// One shape covers every role (preceding invoice, orders, contract,
/// delivery note, despatch advice, supporting document); the role is the
/// field the reference is stored in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencedDocument {
    pub id: String,
    pub issue_date: Option<NaiveDate>,
    /// Referenced line within the other document.
    pub line_id: Option<String>,
    pub type_code: Option<DocumentTypeCode>,
    pub reference_type_code: Option<ReferenceTypeCode>,
    /// Description of the supporting document.
    pub name: Option<String>,
    /// External location of the document.
    pub uri: Option<String>,
    /// Embedded binary payload.
    pub attachment: Option<Vec<u8>>,
    pub filename: Option<String>,
}

impl ReferencedDocument {
    pub fn new(id: impl Into<String>, issue_date: Option<NaiveDate>) -> Self {
        Self {
            id: id.into(),
            issue_date,
            ..Self::default()
        }
    }

    pub fn has_attachment(&self) -> bool {
        self.attachment.as_ref().is_some_and(|b| !b.is_empty())
    }

    /// MIME type derived from the attachment filename extension.
    pub fn mime_type(&self) -> &'static str {
        mime_type_for(self.filename.as_deref().unwrap_or_default())
    }
}

/// MIME type for an attachment filename, by extension.
pub fn mime_type_for(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "csv" => "text/csv",
        "txt" => "text/plain",
        "xml" => "application/xml",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ods" => "application/vnd.oasis.opendocument.spreadsheet",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcuringProject {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// BG-25: Invoice line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeLineItem {
    pub line_id: String,
    pub parent_line_id: Option<String>,
    pub notes: Vec<Note>,

    pub global_id: Option<GlobalId>,
    pub seller_assigned_id: Option<String>,
    pub buyer_assigned_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub product_characteristics: Vec<ProductCharacteristic>,
    pub product_classifications: Vec<ProductClassification>,
    pub origin_country: Option<CountryCode>,

    pub billed_quantity: Decimal,
    pub unit_code: Option<QuantityCode>,
    /// Basis quantity the unit prices refer to.
    pub unit_quantity: Option<Decimal>,
    pub charge_free_quantity: Option<Decimal>,
    pub package_quantity: Option<Decimal>,

    pub net_unit_price: Option<Decimal>,
    pub gross_unit_price: Option<Decimal>,
    pub line_total_amount: Option<Decimal>,

    pub tax_type: TaxType,
    pub tax_category_code: TaxCategoryCode,
    pub tax_percent: Decimal,
    pub tax_exemption_reason: Option<String>,

    /// Allowances and charges applied to the gross price.
    pub price_allowance_charges: Vec<TradeAllowanceCharge>,
    /// BG-27 / BG-28: Line-level allowances and charges.
    pub allowance_charges: Vec<TradeAllowanceCharge>,

    pub buyer_order_referenced_document: Option<ReferencedDocument>,
    pub contract_referenced_document: Option<ReferencedDocument>,
    pub delivery_note_referenced_document: Option<ReferencedDocument>,
    pub additional_referenced_documents: Vec<ReferencedDocument>,

    pub ship_to: Option<Party>,
    pub actual_delivery_date: Option<NaiveDate>,
    pub billing_period: Option<BillingPeriod>,
    pub receivable_accounting_accounts: Vec<AccountingAccount>,
}

/// BG-32: Item attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCharacteristic {
    pub type_code: Option<String>,
    pub description: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductClassification {
    pub list_id: Option<ProductClassificationCode>,
    pub list_version_id: Option<String>,
    pub class_code: Option<String>,
    pub class_name: Option<String>,
}

/// BG-23 VAT breakdown entry, also used as the tax of allowances, charges
/// and service charges (where only type, category and percent apply).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tax {
    pub type_code: TaxType,
    pub category_code: TaxCategoryCode,
    pub percent: Decimal,
    pub basis_amount: Decimal,
    pub tax_amount: Decimal,
    pub exemption_reason: Option<String>,
    pub exemption_reason_code: Option<TaxExemptionReasonCode>,
    pub allowance_charge_basis_amount: Option<Decimal>,
    pub line_total_basis_amount: Option<Decimal>,
}

impl Tax {
    pub fn new(category_code: TaxCategoryCode, percent: Decimal) -> Self {
        Self {
            type_code: TaxType::ValueAddedTax,
            category_code,
            percent,
            ..Self::default()
        }
    }
}

/// Reason code of an allowance (UNTDID 5189) or a charge (UNTDID 7161).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllowanceChargeReasonCode {
    Allowance(AllowanceReasonCode),
    Charge(ChargeReasonCode),
}

impl AllowanceChargeReasonCode {
    pub fn format(self) -> &'static str {
        match self {
            AllowanceChargeReasonCode::Allowance(code) => code.format(),
            AllowanceChargeReasonCode::Charge(code) => code.format(),
        }
    }

    /// Parse against the list selected by the charge indicator.
    pub fn parse(token: &str, charge_indicator: bool) -> Self {
        if charge_indicator {
            AllowanceChargeReasonCode::Charge(ChargeReasonCode::parse(token))
        } else {
            AllowanceChargeReasonCode::Allowance(AllowanceReasonCode::parse(token))
        }
    }
}

/// BG-20 / BG-21 / BG-27 / BG-28: Allowance (`charge_indicator == false`)
/// or charge. Amounts are always non-negative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeAllowanceCharge {
    pub charge_indicator: bool,
    pub currency: Option<CurrencyCode>,
    pub actual_amount: Decimal,
    pub basis_amount: Option<Decimal>,
    pub charge_percentage: Option<Decimal>,
    pub reason: Option<String>,
    pub reason_code: Option<AllowanceChargeReasonCode>,
    pub tax: Option<Tax>,
}

/// Logistics service charge (`ram:SpecifiedLogisticsServiceCharge`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceCharge {
    pub description: String,
    pub amount: Decimal,
    pub tax: Option<Tax>,
}

/// BG-16: Payment instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMeans {
    pub type_code: PaymentMeansType,
    pub information: Option<String>,
    /// BT-90: SEPA creditor identifier.
    pub sepa_creditor_identifier: Option<String>,
    /// BT-89: SEPA mandate reference.
    pub sepa_mandate_reference: Option<String>,
    pub financial_card: Option<FinancialCard>,
}

/// BG-18: Payment card (only the last digits are transmitted).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialCard {
    pub id: String,
    pub cardholder_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub iban: Option<String>,
    pub bic: Option<String>,
    /// National account number.
    pub id: Option<String>,
    pub bank_name: Option<String>,
    /// National routing code (e.g. German Bankleitzahl).
    pub bank_leitzahl: Option<String>,
    /// Account holder name.
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentTermsType {
    /// Early payment discount (Skonto).
    Discount,
    /// Late payment penalty (Verzug).
    Penalty,
}

/// BT-20 / BT-9 and the Extended discount/penalty terms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentTerms {
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    /// `None` when the terms carry no discount or penalty.
    pub terms_type: Option<PaymentTermsType>,
    pub percentage: Option<Decimal>,
    pub due_days: Option<u32>,
    pub basis_amount: Option<Decimal>,
    pub actual_amount: Option<Decimal>,
}

/// BG-22: Document totals. Taken as given; never recomputed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonetarySummation {
    pub line_total_amount: Option<Decimal>,
    pub charge_total_amount: Option<Decimal>,
    pub allowance_total_amount: Option<Decimal>,
    pub tax_basis_amount: Option<Decimal>,
    pub tax_total_amount: Option<Decimal>,
    /// BT-111: Tax total in the tax currency.
    pub tax_total_amount_in_tax_currency: Option<Decimal>,
    pub rounding_amount: Option<Decimal>,
    pub grand_total_amount: Option<Decimal>,
    pub total_prepaid_amount: Option<Decimal>,
    pub due_payable_amount: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingAccount {
    pub id: String,
    pub type_code: Option<AccountingAccountType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schemed_id_without_value_writes_no_scheme() {
        let id = GlobalId::new(GlobalIdScheme::Gln, "   ");
        assert!(id.is_empty());
        assert_eq!(id.scheme_token(), None);

        let id = GlobalId::new(GlobalIdScheme::Gln, "4000001123452");
        assert_eq!(id.scheme_token(), Some("0088"));

        let id = GlobalId::new(GlobalIdScheme::Unknown, "4000001123452");
        assert_eq!(id.scheme_token(), None);
    }

    #[test]
    fn mime_type_from_extension() {
        assert_eq!(mime_type_for("invoice.pdf"), "application/pdf");
        assert_eq!(mime_type_for("Scan.JPG"), "image/jpeg");
        assert!(mime_type_for("times.xlsx").ends_with("spreadsheetml.sheet"));
        assert_eq!(mime_type_for("noext"), "application/octet-stream");
    }

    #[test]
    fn reason_code_list_follows_indicator() {
        assert_eq!(
            AllowanceChargeReasonCode::parse("95", false),
            AllowanceChargeReasonCode::Allowance(AllowanceReasonCode::Discount)
        );
        assert_eq!(
            AllowanceChargeReasonCode::parse("FC", true),
            AllowanceChargeReasonCode::Charge(ChargeReasonCode::Freight)
        );
        assert_eq!(AllowanceChargeReasonCode::parse("FC", true).format(), "FC");
    }

    #[test]
    fn party_lookup_by_role() {
        let doc = InvoiceDescriptor {
            payee: Some(Party {
                name: "Factor Bank".into(),
                ..Party::default()
            }),
            ..InvoiceDescriptor::default()
        };
        assert_eq!(doc.party(PartyRole::Payee).map(|p| p.name.as_str()), Some("Factor Bank"));
        assert!(doc.party(PartyRole::Seller).is_none());
    }
}
