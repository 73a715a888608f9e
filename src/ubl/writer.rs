use std::io::Write;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{CREDIT_NOTE_LAYOUT, DocumentLayout, INVOICE_LAYOUT, SEPA_SCHEME, SUPPORTED_ROLES, ns};
use crate::cii::common::{creditor_accounts, encode_attachment, has_address, line_total};
use crate::codes::{CodeList, TaxRegistrationScheme};
use crate::core::*;
use crate::io::InvoiceWriter;
use crate::xml::ProfileAwareXmlWriter;
use crate::xml::format::format_iso_date;

/// Generate EN 16931 / XRechnung UBL 2.1 from an [`InvoiceDescriptor`].
///
/// Credit notes (see [`crate::codes::InvoiceType::is_credit_note`]) are
/// written as `CreditNote` documents. Parties in roles UBL cannot carry
/// are skipped with a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct UblWriter;

const ALL: Profile = Profile::COMFORT.union(Profile::XRECHNUNG1).union(Profile::XRECHNUNG);

type XmlOut<W> = ProfileAwareXmlWriter<W>;

impl InvoiceWriter for UblWriter {
    fn version(&self) -> ZugferdVersion {
        ZugferdVersion::Version23
    }

    fn supports(&self, profile: Profile) -> bool {
        !profile.is_unknown() && ALL.contains(profile)
    }

    fn write<W: Write>(&self, desc: &InvoiceDescriptor, out: W) -> Result<(), ZugferdError> {
        let layout = if desc.invoice_type.is_credit_note() {
            CREDIT_NOTE_LAYOUT
        } else {
            INVOICE_LAYOUT
        };
        warn_unsupported(desc);

        let mut w = ProfileAwareXmlWriter::new(out, desc.profile)?;
        let currency = desc.currency.format();
        let cur = Some(currency);

        w.start_element_with_attrs(
            layout.root,
            &[
                ("xmlns:ubl", layout.namespace),
                ("xmlns:cac", ns::CAC),
                ("xmlns:cbc", ns::CBC),
            ],
        )?;

        // BT-24 / BT-23
        w.text_element(
            "cbc:CustomizationID",
            desc.profile.identifier(ZugferdVersion::Version23).unwrap_or_default(),
        )?;
        w.optional_element("cbc:ProfileID", desc.business_process.as_deref(), ALL)?;
        w.text_element("cbc:ID", &desc.invoice_no)?;
        if let Some(date) = desc.invoice_date {
            w.text_element("cbc:IssueDate", &format_iso_date(date))?;
        }
        // A CreditNote has no DueDate; its due date goes into PaymentMeans.
        let due_date = desc.payment_terms.iter().find_map(|t| t.due_date);
        let is_invoice = layout.root == INVOICE_LAYOUT.root;
        if let Some(due) = due_date.filter(|_| is_invoice) {
            w.text_element("cbc:DueDate", &format_iso_date(due))?;
        }
        w.text_element(layout.type_code, desc.invoice_type.format())?;
        for note in &desc.notes {
            w.text_element("cbc:Note", &note_text(note))?;
        }
        w.text_element("cbc:DocumentCurrencyCode", currency)?;
        w.optional_element("cbc:TaxCurrencyCode", desc.tax_currency.map(|c| c.format()), ALL)?;
        // BT-19
        if let Some(account) = desc.receivable_accounting_accounts.first() {
            w.optional_element("cbc:AccountingCost", Some(account.id.as_str()), ALL)?;
        }
        w.optional_element("cbc:BuyerReference", desc.buyer_reference.as_deref(), ALL)?;

        if let Some(period) = &desc.billing_period {
            write_period(&mut w, period)?;
        }

        // --- Document references ---
        if let Some(order) = &desc.buyer_order_referenced_document {
            w.start_element("cac:OrderReference")?;
            w.text_element("cbc:ID", &order.id)?;
            if let Some(sales) = &desc.seller_order_referenced_document {
                w.optional_element("cbc:SalesOrderID", Some(sales.id.as_str()), ALL)?;
            }
            w.end_element("cac:OrderReference")?;
        }
        for invoice in &desc.invoice_referenced_documents {
            w.start_element("cac:BillingReference")?;
            w.start_element("cac:InvoiceDocumentReference")?;
            w.text_element("cbc:ID", &invoice.id)?;
            if let Some(date) = invoice.issue_date {
                w.text_element("cbc:IssueDate", &format_iso_date(date))?;
            }
            w.end_element("cac:InvoiceDocumentReference")?;
            w.end_element("cac:BillingReference")?;
        }
        write_id_reference(&mut w, "cac:DespatchDocumentReference", desc.despatch_advice_referenced_document.as_ref())?;
        write_id_reference(&mut w, "cac:ContractDocumentReference", desc.contract_referenced_document.as_ref())?;
        for doc in &desc.additional_referenced_documents {
            write_additional_reference(&mut w, doc)?;
        }
        if let Some(project) = &desc.specified_procuring_project {
            w.start_element("cac:ProjectReference")?;
            w.text_element("cbc:ID", &project.id)?;
            w.end_element("cac:ProjectReference")?;
        }

        // --- Parties ---
        let sepa_creditor = desc
            .payment_means
            .as_ref()
            .and_then(|m| m.sepa_creditor_identifier.as_deref());
        if let Some(seller) = &desc.seller {
            w.start_element("cac:AccountingSupplierParty")?;
            w.start_element("cac:Party")?;
            write_party(&mut w, seller, sepa_creditor)?;
            w.end_element("cac:Party")?;
            w.end_element("cac:AccountingSupplierParty")?;
        }
        if let Some(buyer) = &desc.buyer {
            w.start_element("cac:AccountingCustomerParty")?;
            w.start_element("cac:Party")?;
            write_party(&mut w, buyer, None)?;
            w.end_element("cac:Party")?;
            w.end_element("cac:AccountingCustomerParty")?;
        }
        if let Some(payee) = &desc.payee {
            w.start_element("cac:PayeeParty")?;
            write_party(&mut w, payee, None)?;
            w.end_element("cac:PayeeParty")?;
        }
        if let Some(representative) = &desc.seller_tax_representative {
            w.start_element("cac:TaxRepresentativeParty")?;
            write_party(&mut w, representative, None)?;
            w.end_element("cac:TaxRepresentativeParty")?;
        }

        // BG-13
        if desc.ship_to.is_some() || desc.actual_delivery_date.is_some() {
            w.start_element("cac:Delivery")?;
            if let Some(date) = desc.actual_delivery_date {
                w.text_element("cbc:ActualDeliveryDate", &format_iso_date(date))?;
            }
            if let Some(ship_to) = &desc.ship_to {
                w.start_element("cac:DeliveryLocation")?;
                write_schemed_id(&mut w, "cbc:ID", ship_to.global_id.as_ref())?;
                if has_address(ship_to) {
                    write_address(&mut w, "cac:Address", ship_to)?;
                }
                w.end_element("cac:DeliveryLocation")?;
                w.start_element("cac:DeliveryParty")?;
                w.start_element("cac:PartyName")?;
                w.text_element("cbc:Name", &ship_to.name)?;
                w.end_element("cac:PartyName")?;
                w.end_element("cac:DeliveryParty")?;
            }
            w.end_element("cac:Delivery")?;
        }

        // BG-16
        if let Some(means) = &desc.payment_means {
            for account in creditor_accounts(desc) {
                let payment_due_date = due_date.filter(|_| !is_invoice);
                write_payment_means(&mut w, desc, means, account, payment_due_date)?;
            }
        }
        for terms in desc.payment_terms.iter().filter(|t| t.description.is_some()) {
            w.start_element("cac:PaymentTerms")?;
            w.optional_element("cbc:Note", terms.description.as_deref(), ALL)?;
            w.end_element("cac:PaymentTerms")?;
        }

        for charge in &desc.trade_allowance_charges {
            write_allowance_charge(&mut w, charge, cur, true)?;
        }

        // --- BG-23 ---
        let tax_total = match desc.totals.tax_total_amount {
            Some(total) => total,
            None => desc
                .taxes
                .iter()
                .try_fold(Decimal::ZERO, |sum, t| sum.checked_add(t.tax_amount))
                .ok_or(ZugferdError::Overflow("tax total"))?,
        };
        w.start_element("cac:TaxTotal")?;
        w.decimal_element_if("cbc:TaxAmount", tax_total, 2, cur, ALL)?;
        for tax in &desc.taxes {
            w.start_element("cac:TaxSubtotal")?;
            w.decimal_element_if("cbc:TaxableAmount", tax.basis_amount, 2, cur, ALL)?;
            w.decimal_element_if("cbc:TaxAmount", tax.tax_amount, 2, cur, ALL)?;
            w.start_element("cac:TaxCategory")?;
            w.text_element("cbc:ID", tax.category_code.format())?;
            w.decimal_element_if("cbc:Percent", tax.percent, 2, None, ALL)?;
            w.optional_element(
                "cbc:TaxExemptionReasonCode",
                tax.exemption_reason_code.map(|c| c.format()),
                ALL,
            )?;
            w.optional_element("cbc:TaxExemptionReason", tax.exemption_reason.as_deref(), ALL)?;
            write_tax_scheme(&mut w, tax.type_code.format())?;
            w.end_element("cac:TaxCategory")?;
            w.end_element("cac:TaxSubtotal")?;
        }
        w.end_element("cac:TaxTotal")?;

        // BT-111
        if let (Some(tax_currency), Some(amount)) = (desc.tax_currency, desc.totals.tax_total_amount_in_tax_currency) {
            w.start_element("cac:TaxTotal")?;
            w.decimal_element_if("cbc:TaxAmount", amount, 2, Some(tax_currency.format()), ALL)?;
            w.end_element("cac:TaxTotal")?;
        }

        // --- BG-22 ---
        let t = &desc.totals;
        w.start_element("cac:LegalMonetaryTotal")?;
        w.optional_decimal_element("cbc:LineExtensionAmount", t.line_total_amount, 2, cur, ALL)?;
        w.optional_decimal_element("cbc:TaxExclusiveAmount", t.tax_basis_amount, 2, cur, ALL)?;
        w.optional_decimal_element("cbc:TaxInclusiveAmount", t.grand_total_amount, 2, cur, ALL)?;
        w.optional_decimal_element("cbc:AllowanceTotalAmount", t.allowance_total_amount, 2, cur, ALL)?;
        w.optional_decimal_element("cbc:ChargeTotalAmount", t.charge_total_amount, 2, cur, ALL)?;
        w.optional_decimal_element("cbc:PrepaidAmount", t.total_prepaid_amount, 2, cur, ALL)?;
        w.optional_decimal_element("cbc:PayableRoundingAmount", t.rounding_amount, 2, cur, ALL)?;
        w.optional_decimal_element("cbc:PayableAmount", t.due_payable_amount, 2, cur, ALL)?;
        w.end_element("cac:LegalMonetaryTotal")?;

        for line in &desc.trade_line_items {
            write_line(&mut w, &layout, line, cur)?;
        }

        w.end_element(layout.root)?;
        Ok(())
    }
}

fn warn_unsupported(desc: &InvoiceDescriptor) {
    for role in PartyRole::ALL {
        if desc.party(role).is_some() && !SUPPORTED_ROLES.contains(&role) {
            tracing::warn!(?role, "party role has no UBL representation, skipping it");
        }
    }
    if desc.delivery_note_referenced_document.is_some() {
        tracing::warn!("delivery note reference has no UBL representation, skipping it");
    }
    if desc.seller_order_referenced_document.is_some() && desc.buyer_order_referenced_document.is_none() {
        tracing::warn!("sales order reference without a purchase order reference, skipping it");
    }
    if !desc.service_charges.is_empty() {
        tracing::warn!(
            count = desc.service_charges.len(),
            "logistics service charges have no UBL representation, skipping them"
        );
    }
}

/// Note text, prefixed with `#SUBJECT#` when a subject code is set.
fn note_text(note: &Note) -> String {
    match note.subject_code.filter(|c| !c.is_unknown()) {
        Some(code) => format!("#{}#{}", code.format(), note.content),
        None => note.content.clone(),
    }
}

fn write_period<W: Write>(w: &mut XmlOut<W>, period: &BillingPeriod) -> Result<(), ZugferdError> {
    w.start_element("cac:InvoicePeriod")?;
    if let Some(start) = period.start {
        w.text_element("cbc:StartDate", &format_iso_date(start))?;
    }
    if let Some(end) = period.end {
        w.text_element("cbc:EndDate", &format_iso_date(end))?;
    }
    w.end_element("cac:InvoicePeriod")?;
    Ok(())
}

fn write_id_reference<W: Write>(
    w: &mut XmlOut<W>,
    element: &str,
    doc: Option<&ReferencedDocument>,
) -> Result<(), ZugferdError> {
    let Some(doc) = doc else {
        return Ok(());
    };
    w.start_element(element)?;
    w.text_element("cbc:ID", &doc.id)?;
    w.end_element(element)?;
    Ok(())
}

/// BG-24 supporting document, with an inline attachment or an external URI.
fn write_additional_reference<W: Write>(w: &mut XmlOut<W>, doc: &ReferencedDocument) -> Result<(), ZugferdError> {
    w.start_element("cac:AdditionalDocumentReference")?;
    w.text_element("cbc:ID", &doc.id)?;
    w.optional_element("cbc:DocumentTypeCode", doc.type_code.map(|c| c.format()), ALL)?;
    w.optional_element("cbc:DocumentDescription", doc.name.as_deref(), ALL)?;
    if doc.has_attachment() || doc.uri.is_some() {
        w.start_element("cac:Attachment")?;
        if let Some(bytes) = doc.attachment.as_deref().filter(|b| !b.is_empty()) {
            w.text_element_with_attrs(
                "cbc:EmbeddedDocumentBinaryObject",
                &encode_attachment(bytes),
                &[
                    ("mimeCode", doc.mime_type()),
                    ("filename", doc.filename.as_deref().unwrap_or_default()),
                ],
            )?;
        }
        if let Some(uri) = doc.uri.as_deref() {
            w.start_element("cac:ExternalReference")?;
            w.text_element("cbc:URI", uri)?;
            w.end_element("cac:ExternalReference")?;
        }
        w.end_element("cac:Attachment")?;
    }
    w.end_element("cac:AdditionalDocumentReference")?;
    Ok(())
}

fn write_schemed_id<W: Write, S: CodeList>(
    w: &mut XmlOut<W>,
    element: &str,
    id: Option<&SchemedId<S>>,
) -> Result<(), ZugferdError> {
    let Some(id) = id.filter(|id| !id.is_empty()) else {
        return Ok(());
    };
    match id.scheme_token() {
        Some(scheme) => w.text_element_with_attrs(element, &id.value, &[("schemeID", scheme)])?,
        None => w.text_element(element, &id.value)?,
    };
    Ok(())
}

fn write_tax_scheme<W: Write>(w: &mut XmlOut<W>, id: &str) -> Result<(), ZugferdError> {
    w.start_element("cac:TaxScheme")?;
    w.text_element("cbc:ID", if id.is_empty() { "VAT" } else { id })?;
    w.end_element("cac:TaxScheme")?;
    Ok(())
}

fn write_address<W: Write>(w: &mut XmlOut<W>, element: &str, party: &Party) -> Result<(), ZugferdError> {
    w.start_element(element)?;
    w.optional_element("cbc:StreetName", party.street.as_deref(), ALL)?;
    w.optional_element("cbc:AdditionalStreetName", party.address_line2.as_deref(), ALL)?;
    w.optional_element("cbc:CityName", party.city.as_deref(), ALL)?;
    w.optional_element("cbc:PostalZone", party.postcode.as_deref(), ALL)?;
    w.optional_element("cbc:CountrySubentity", party.subdivision.as_deref(), ALL)?;
    if let Some(line) = party.address_line3.as_deref() {
        w.start_element("cac:AddressLine")?;
        w.text_element("cbc:Line", line)?;
        w.end_element("cac:AddressLine")?;
    }
    if let Some(country) = party.country.filter(|c| !c.is_unknown()) {
        w.start_element("cac:Country")?;
        w.text_element("cbc:IdentificationCode", country.format())?;
        w.end_element("cac:Country")?;
    }
    w.end_element(element)?;
    Ok(())
}

/// Content of a UBL `PartyType`. The SEPA creditor id, when given, is
/// written as an extra `PartyIdentification`.
fn write_party<W: Write>(w: &mut XmlOut<W>, party: &Party, sepa_creditor: Option<&str>) -> Result<(), ZugferdError> {
    // BT-34 / BT-49
    write_schemed_id(w, "cbc:EndpointID", party.electronic_address.as_ref())?;

    if let Some(global_id) = party.global_id.as_ref().filter(|id| !id.is_empty()) {
        w.start_element("cac:PartyIdentification")?;
        write_schemed_id(w, "cbc:ID", Some(global_id))?;
        w.end_element("cac:PartyIdentification")?;
    }
    if let Some(id) = party.id.as_ref().filter(|id| !id.is_empty()) {
        w.start_element("cac:PartyIdentification")?;
        w.text_element("cbc:ID", &id.value)?;
        w.end_element("cac:PartyIdentification")?;
    }
    if let Some(creditor_id) = sepa_creditor.filter(|id| !id.trim().is_empty()) {
        w.start_element("cac:PartyIdentification")?;
        w.text_element_with_attrs("cbc:ID", creditor_id, &[("schemeID", SEPA_SCHEME)])?;
        w.end_element("cac:PartyIdentification")?;
    }

    let legal = party.legal_organization.as_ref();
    if let Some(trading_name) = legal.and_then(|l| l.trading_business_name.as_deref()) {
        w.start_element("cac:PartyName")?;
        w.text_element("cbc:Name", trading_name)?;
        w.end_element("cac:PartyName")?;
    }

    if has_address(party) {
        write_address(w, "cac:PostalAddress", party)?;
    }

    for registration in party.tax_registrations.iter().filter(|r| !r.is_empty()) {
        let scheme = match registration.scheme {
            Some(TaxRegistrationScheme::FiscalNumber) => "FC",
            _ => "VAT",
        };
        w.start_element("cac:PartyTaxScheme")?;
        w.text_element("cbc:CompanyID", &registration.value)?;
        write_tax_scheme(w, scheme)?;
        w.end_element("cac:PartyTaxScheme")?;
    }

    w.start_element("cac:PartyLegalEntity")?;
    w.text_element("cbc:RegistrationName", &party.name)?;
    write_schemed_id(w, "cbc:CompanyID", legal.and_then(|l| l.id.as_ref()))?;
    w.optional_element("cbc:CompanyLegalForm", party.description.as_deref(), ALL)?;
    w.end_element("cac:PartyLegalEntity")?;

    if let Some(contact) = party.contact.as_ref().filter(|c| !c.is_empty()) {
        w.start_element("cac:Contact")?;
        w.optional_element("cbc:Name", contact.name.as_deref(), ALL)?;
        w.optional_element("cbc:Telephone", contact.phone.as_deref(), ALL)?;
        w.optional_element("cbc:ElectronicMail", contact.email.as_deref(), ALL)?;
        w.end_element("cac:Contact")?;
    }
    Ok(())
}

fn write_payment_means<W: Write>(
    w: &mut XmlOut<W>,
    desc: &InvoiceDescriptor,
    means: &PaymentMeans,
    account: Option<&BankAccount>,
    due_date: Option<NaiveDate>,
) -> Result<(), ZugferdError> {
    w.start_element("cac:PaymentMeans")?;
    match means.information.as_deref() {
        Some(info) => w.text_element_with_attrs("cbc:PaymentMeansCode", means.type_code.format(), &[("name", info)])?,
        None => w.text_element("cbc:PaymentMeansCode", means.type_code.format())?,
    };
    if let Some(due) = due_date {
        w.text_element("cbc:PaymentDueDate", &format_iso_date(due))?;
    }
    w.optional_element("cbc:PaymentID", desc.payment_reference.as_deref(), ALL)?;

    // BG-18
    if let Some(card) = &means.financial_card {
        w.start_element("cac:CardAccount")?;
        w.text_element("cbc:PrimaryAccountNumberID", &card.id)?;
        w.text_element("cbc:NetworkID", "NA")?;
        w.optional_element("cbc:HolderName", card.cardholder_name.as_deref(), ALL)?;
        w.end_element("cac:CardAccount")?;
    }

    // BG-17
    if let Some(account) = account {
        w.start_element("cac:PayeeFinancialAccount")?;
        w.optional_element("cbc:ID", account.iban.as_deref().or(account.id.as_deref()), ALL)?;
        w.optional_element("cbc:Name", account.name.as_deref(), ALL)?;
        if let Some(bic) = account.bic.as_deref() {
            w.start_element("cac:FinancialInstitutionBranch")?;
            w.text_element("cbc:ID", bic)?;
            w.end_element("cac:FinancialInstitutionBranch")?;
        }
        w.end_element("cac:PayeeFinancialAccount")?;
    }

    // BG-19
    let debitor = desc.debitor_bank_accounts.first();
    if means.sepa_mandate_reference.is_some() || debitor.is_some() {
        w.start_element("cac:PaymentMandate")?;
        w.optional_element("cbc:ID", means.sepa_mandate_reference.as_deref(), ALL)?;
        if let Some(id) = debitor.and_then(|d| d.iban.as_deref().or(d.id.as_deref())) {
            w.start_element("cac:PayerFinancialAccount")?;
            w.text_element("cbc:ID", id)?;
            w.end_element("cac:PayerFinancialAccount")?;
        }
        w.end_element("cac:PaymentMandate")?;
    }
    w.end_element("cac:PaymentMeans")?;
    Ok(())
}

fn write_allowance_charge<W: Write>(
    w: &mut XmlOut<W>,
    charge: &TradeAllowanceCharge,
    cur: Option<&str>,
    with_tax: bool,
) -> Result<(), ZugferdError> {
    w.start_element("cac:AllowanceCharge")?;
    w.text_element("cbc:ChargeIndicator", if charge.charge_indicator { "true" } else { "false" })?;
    w.optional_element("cbc:AllowanceChargeReasonCode", charge.reason_code.map(|c| c.format()), ALL)?;
    w.optional_element("cbc:AllowanceChargeReason", charge.reason.as_deref(), ALL)?;
    w.optional_decimal_element("cbc:MultiplierFactorNumeric", charge.charge_percentage, 2, None, ALL)?;
    w.decimal_element_if("cbc:Amount", charge.actual_amount, 2, cur, ALL)?;
    w.optional_decimal_element("cbc:BaseAmount", charge.basis_amount, 2, cur, ALL)?;
    if let Some(tax) = charge.tax.as_ref().filter(|_| with_tax) {
        w.start_element("cac:TaxCategory")?;
        w.text_element("cbc:ID", tax.category_code.format())?;
        w.decimal_element_if("cbc:Percent", tax.percent, 2, None, ALL)?;
        write_tax_scheme(w, tax.type_code.format())?;
        w.end_element("cac:TaxCategory")?;
    }
    w.end_element("cac:AllowanceCharge")?;
    Ok(())
}

fn write_line<W: Write>(
    w: &mut XmlOut<W>,
    layout: &DocumentLayout,
    line: &TradeLineItem,
    cur: Option<&str>,
) -> Result<(), ZugferdError> {
    let unit = line.unit_code.map(|u| u.format());

    w.start_element(layout.line)?;
    w.text_element("cbc:ID", &line.line_id)?;
    for note in &line.notes {
        w.text_element("cbc:Note", &note.content)?;
    }
    w.quantity_element_if(layout.quantity, line.billed_quantity, unit, ALL)?;
    w.decimal_element_if("cbc:LineExtensionAmount", line_total(line)?, 2, cur, ALL)?;
    if let Some(account) = line.receivable_accounting_accounts.first() {
        w.optional_element("cbc:AccountingCost", Some(account.id.as_str()), ALL)?;
    }
    if let Some(period) = &line.billing_period {
        write_period(w, period)?;
    }
    if let Some(line_id) = line
        .buyer_order_referenced_document
        .as_ref()
        .and_then(|o| o.line_id.as_deref())
    {
        w.start_element("cac:OrderLineReference")?;
        w.text_element("cbc:LineID", line_id)?;
        w.end_element("cac:OrderLineReference")?;
    }
    for doc in &line.additional_referenced_documents {
        w.start_element("cac:DocumentReference")?;
        w.text_element("cbc:ID", &doc.id)?;
        w.optional_element("cbc:DocumentTypeCode", doc.type_code.map(|c| c.format()), ALL)?;
        w.end_element("cac:DocumentReference")?;
    }
    for charge in &line.allowance_charges {
        write_allowance_charge(w, charge, cur, false)?;
    }

    // --- Item ---
    w.start_element("cac:Item")?;
    w.optional_element("cbc:Description", line.description.as_deref(), ALL)?;
    w.text_element("cbc:Name", &line.name)?;
    if let Some(id) = line.buyer_assigned_id.as_deref() {
        w.start_element("cac:BuyersItemIdentification")?;
        w.text_element("cbc:ID", id)?;
        w.end_element("cac:BuyersItemIdentification")?;
    }
    if let Some(id) = line.seller_assigned_id.as_deref() {
        w.start_element("cac:SellersItemIdentification")?;
        w.text_element("cbc:ID", id)?;
        w.end_element("cac:SellersItemIdentification")?;
    }
    if let Some(global_id) = line.global_id.as_ref().filter(|id| !id.is_empty()) {
        w.start_element("cac:StandardItemIdentification")?;
        write_schemed_id(w, "cbc:ID", Some(global_id))?;
        w.end_element("cac:StandardItemIdentification")?;
    }
    if let Some(country) = line.origin_country.filter(|c| !c.is_unknown()) {
        w.start_element("cac:OriginCountry")?;
        w.text_element("cbc:IdentificationCode", country.format())?;
        w.end_element("cac:OriginCountry")?;
    }
    for class in &line.product_classifications {
        let Some(code) = class.class_code.as_deref() else {
            continue;
        };
        let list_id = class.list_id.map(|l| l.format()).unwrap_or_default();
        let mut attrs = vec![("listID", list_id)];
        if let Some(version) = class.list_version_id.as_deref() {
            attrs.push(("listVersionID", version));
        }
        w.start_element("cac:CommodityClassification")?;
        w.text_element_with_attrs("cbc:ItemClassificationCode", code, &attrs)?;
        w.end_element("cac:CommodityClassification")?;
    }
    w.start_element("cac:ClassifiedTaxCategory")?;
    w.text_element("cbc:ID", line.tax_category_code.format())?;
    w.decimal_element_if("cbc:Percent", line.tax_percent, 2, None, ALL)?;
    write_tax_scheme(w, line.tax_type.format())?;
    w.end_element("cac:ClassifiedTaxCategory")?;
    for characteristic in &line.product_characteristics {
        w.start_element("cac:AdditionalItemProperty")?;
        w.text_element("cbc:Name", &characteristic.description)?;
        w.text_element("cbc:Value", &characteristic.value)?;
        w.end_element("cac:AdditionalItemProperty")?;
    }
    w.end_element("cac:Item")?;

    // --- BG-29 ---
    w.start_element("cac:Price")?;
    w.decimal_element_if("cbc:PriceAmount", line.net_unit_price.unwrap_or_default(), 4, cur, ALL)?;
    if let Some(basis) = line.unit_quantity {
        w.quantity_element_if("cbc:BaseQuantity", basis, unit, ALL)?;
    }
    if let Some(gross) = line.gross_unit_price {
        let discount = gross
            .checked_sub(line.net_unit_price.unwrap_or(gross))
            .ok_or(ZugferdError::Overflow("price discount"))?
            .max(Decimal::ZERO);
        w.start_element("cac:AllowanceCharge")?;
        w.text_element("cbc:ChargeIndicator", "false")?;
        w.decimal_element_if("cbc:Amount", discount, 4, cur, ALL)?;
        w.decimal_element_if("cbc:BaseAmount", gross, 4, cur, ALL)?;
        w.end_element("cac:AllowanceCharge")?;
    }
    w.end_element("cac:Price")?;

    w.end_element(layout.line)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::{CountryCode, CurrencyCode, InvoiceType, PaymentMeansType, SubjectCode, TaxCategoryCode};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sample() -> InvoiceDescriptor {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        InvoiceBuilder::new("RE-2024-001", date, CurrencyCode::Eur)
            .profile(Profile::XRECHNUNG)
            .buyer_reference("04011000-12345-03")
            .note_with_subject("Lieferung frei Haus", SubjectCode::GeneralInformation)
            .seller(
                PartyBuilder::new("ACME GmbH")
                    .address("Hauptstraße 1", "10115", "Berlin", CountryCode::De)
                    .vat_id("DE123456789")
                    .build(),
            )
            .buyer(PartyBuilder::new("Kunde AG").build())
            .payment_means(PaymentMeansType::SepaCreditTransfer, Some("Überweisung"))
            .add_creditor_account("DE89370400440532013000", Some("COBADEFFXXX"))
            .add_line(
                LineItemBuilder::new("1", "Beratung", dec!(10), dec!(150))
                    .tax(TaxCategoryCode::StandardRate, dec!(19))
                    .build(),
            )
            .add_tax(dec!(1500), dec!(19), TaxCategoryCode::StandardRate)
            .build()
    }

    fn render(desc: &InvoiceDescriptor) -> String {
        let mut out = Vec::new();
        UblWriter.write(desc, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn invoice_root_and_customization() {
        let xml = render(&sample());
        assert!(xml.contains("<ubl:Invoice xmlns:ubl=\"urn:oasis:names:specification:ubl:schema:xsd:Invoice-2\""));
        assert!(xml.contains("urn:xeinkauf.de:kosit:xrechnung_3.0</cbc:CustomizationID>"));
        assert!(xml.contains("<cbc:InvoiceTypeCode>380</cbc:InvoiceTypeCode>"));
        assert!(xml.contains("<cbc:Note>#AAI#Lieferung frei Haus</cbc:Note>"));
        assert!(xml.contains(r#"<cbc:PaymentMeansCode name="Überweisung">58</cbc:PaymentMeansCode>"#));
        assert!(xml.contains(r#"<cbc:TaxAmount currencyID="EUR">285.00</cbc:TaxAmount>"#));
        assert!(xml.contains("<cac:InvoiceLine>"));
    }

    #[test]
    fn credit_note_switches_root_and_lines() {
        let mut desc = sample();
        desc.invoice_type = InvoiceType::CreditNote;
        desc.payment_terms.push(PaymentTerms {
            due_date: NaiveDate::from_ymd_opt(2024, 7, 15),
            ..PaymentTerms::default()
        });
        let xml = render(&desc);
        assert!(xml.contains("<ubl:CreditNote xmlns:ubl=\"urn:oasis:names:specification:ubl:schema:xsd:CreditNote-2\""));
        assert!(xml.contains("<cbc:CreditNoteTypeCode>381</cbc:CreditNoteTypeCode>"));
        assert!(xml.contains("<cac:CreditNoteLine>"));
        assert!(xml.contains(r#"<cbc:CreditedQuantity unitCode="C62">10.0000</cbc:CreditedQuantity>"#));
        assert!(!xml.contains("<cbc:DueDate>"));
        assert!(xml.contains("<cbc:PaymentDueDate>2024-07-15</cbc:PaymentDueDate>"));
    }

    #[test]
    fn unsupported_roles_are_skipped() {
        let mut desc = sample();
        desc.invoicee = Some(PartyBuilder::new("Rechnungsempfänger").build());
        desc.ship_from = Some(PartyBuilder::new("Lager Nord").build());
        let xml = render(&desc);
        assert!(!xml.contains("Rechnungsempfänger"));
        assert!(!xml.contains("Lager Nord"));
    }

    #[test]
    fn sepa_creditor_id_on_seller() {
        let mut desc = sample();
        if let Some(means) = desc.payment_means.as_mut() {
            means.sepa_creditor_identifier = Some("DE98ZZZ09999999999".into());
        }
        let xml = render(&desc);
        assert!(xml.contains(r#"<cbc:ID schemeID="SEPA">DE98ZZZ09999999999</cbc:ID>"#));
    }

    #[test]
    fn supports_en16931_profiles_only() {
        assert!(UblWriter.supports(Profile::COMFORT));
        assert!(UblWriter.supports(Profile::XRECHNUNG1));
        assert!(!UblWriter.supports(Profile::EXTENDED));
        assert!(!UblWriter.supports(Profile::UNKNOWN));
    }
}
