use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDate;
use roxmltree::Node;
use rust_decimal::Decimal;

use crate::codes::{CodeList, CurrencyCode};
use crate::core::*;
use crate::xml::format::format_date_102;
use crate::xml::{ProfileAwareXmlWriter, XmlQuery};

// Profile sets shared by the CII writers. Profiles never nest implicitly,
// so each set names its members.
pub(crate) const ALL: Profile = Profile::MINIMUM
    .union(Profile::BASIC_WL)
    .union(Profile::BASIC)
    .union(Profile::COMFORT)
    .union(Profile::EXTENDED)
    .union(Profile::XRECHNUNG1)
    .union(Profile::XRECHNUNG);
pub(crate) const NOT_MINIMUM: Profile = Profile::BASIC_WL
    .union(Profile::BASIC)
    .union(Profile::COMFORT)
    .union(Profile::EXTENDED)
    .union(Profile::XRECHNUNG1)
    .union(Profile::XRECHNUNG);
pub(crate) const WITH_LINES: Profile = Profile::BASIC
    .union(Profile::COMFORT)
    .union(Profile::EXTENDED)
    .union(Profile::XRECHNUNG1)
    .union(Profile::XRECHNUNG);
pub(crate) const EN16931: Profile = Profile::COMFORT
    .union(Profile::EXTENDED)
    .union(Profile::XRECHNUNG1)
    .union(Profile::XRECHNUNG);
pub(crate) const EXTENDED: Profile = Profile::EXTENDED;
pub(crate) const EXTENDED_XR: Profile = Profile::EXTENDED
    .union(Profile::XRECHNUNG1)
    .union(Profile::XRECHNUNG);

/// Where a referenced document keeps its id and date in one CII version.
pub(crate) struct ReferenceLayout {
    pub id: &'static str,
    pub date: &'static str,
}

pub(crate) const V1_REFERENCE: ReferenceLayout = ReferenceLayout {
    id: "ram:ID",
    date: "ram:IssueDateTime",
};

pub(crate) const V2_REFERENCE: ReferenceLayout = ReferenceLayout {
    id: "ram:IssuerAssignedID",
    date: "ram:FormattedIssueDateTime/qdt:DateTimeString",
};

// --- Reading ---

/// Trade party at `path`, or `None` when the element is absent.
pub(crate) fn parse_party(q: &XmlQuery, from: Node<'_, '_>, path: &str) -> Option<Party> {
    let node = q.node(from, path)?;

    let contact = q.node(node, "ram:DefinedTradeContact").map(|c| Contact {
        name: q.text(c, "ram:PersonName"),
        org_unit: q.text(c, "ram:DepartmentName"),
        email: q.text(c, "ram:EmailURIUniversalCommunication/ram:URIID"),
        phone: q.text(c, "ram:TelephoneUniversalCommunication/ram:CompleteNumber"),
        fax: q.text(c, "ram:FaxUniversalCommunication/ram:CompleteNumber"),
    });
    let legal_organization = q
        .node(node, "ram:SpecifiedLegalOrganization")
        .map(|l| LegalOrganization {
            id: q.schemed_id(l, "ram:ID"),
            trading_business_name: q.text(l, "ram:TradingBusinessName"),
        });
    let tax_registrations = q
        .nodes(node, "ram:SpecifiedTaxRegistration")
        .into_iter()
        .filter_map(|r| q.schemed_id(r, "ram:ID"))
        .collect();

    let address = "ram:PostalTradeAddress";
    let addr = q.node(node, address);
    let addr_text = |step: &str| addr.and_then(|a| q.text(a, step));

    Some(Party {
        name: q.string(node, "ram:Name"),
        id: q.schemed_id(node, "ram:ID"),
        global_id: q.schemed_id(node, "ram:GlobalID"),
        description: q.text(node, "ram:Description"),
        contact,
        street: addr_text("ram:LineOne"),
        address_line2: addr_text("ram:LineTwo"),
        address_line3: addr_text("ram:LineThree"),
        city: addr_text("ram:CityName"),
        postcode: addr_text("ram:PostcodeCode"),
        country: addr.and_then(|a| q.code(a, "ram:CountryID")),
        subdivision: addr_text("ram:CountrySubDivisionName"),
        legal_organization,
        electronic_address: q.schemed_id(node, "ram:URIUniversalCommunication/ram:URIID"),
        tax_registrations,
    })
}

/// Referenced document at `path`, or `None` when the element is absent.
pub(crate) fn parse_referenced_document(
    q: &XmlQuery,
    from: Node<'_, '_>,
    path: &str,
    layout: &ReferenceLayout,
) -> Result<Option<ReferencedDocument>, ZugferdError> {
    match q.node(from, path) {
        Some(node) => referenced_document(q, node, layout).map(Some),
        None => Ok(None),
    }
}

/// Every referenced document at `path`.
pub(crate) fn parse_referenced_documents(
    q: &XmlQuery,
    from: Node<'_, '_>,
    path: &str,
    layout: &ReferenceLayout,
) -> Result<Vec<ReferencedDocument>, ZugferdError> {
    q.nodes(from, path)
        .into_iter()
        .map(|node| referenced_document(q, node, layout))
        .collect()
}

fn referenced_document(
    q: &XmlQuery,
    node: Node<'_, '_>,
    layout: &ReferenceLayout,
) -> Result<ReferencedDocument, ZugferdError> {
    let attachment_path = "ram:AttachmentBinaryObject";
    let attachment = q.text(node, attachment_path).and_then(|b64| decode_attachment(&b64));
    Ok(ReferencedDocument {
        id: q.string(node, layout.id),
        issue_date: q.date(node, layout.date)?,
        line_id: q.text(node, "ram:LineID"),
        type_code: q.code(node, "ram:TypeCode"),
        reference_type_code: q.code(node, "ram:ReferenceTypeCode"),
        name: q.text(node, "ram:Name"),
        uri: q.text(node, "ram:URIID"),
        attachment,
        filename: q.attribute(node, attachment_path, "filename"),
    })
}

pub(crate) fn decode_attachment(b64: &str) -> Option<Vec<u8>> {
    let compact: String = b64.chars().filter(|c| !c.is_whitespace()).collect();
    match STANDARD.decode(compact) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            tracing::warn!(error = %e, "attachment is not valid base64, dropping it");
            None
        }
    }
}

pub(crate) fn parse_notes(q: &XmlQuery, from: Node<'_, '_>, path: &str) -> Vec<Note> {
    q.nodes(from, path)
        .into_iter()
        .map(|n| Note {
            content: q.string(n, "ram:Content"),
            subject_code: q.code(n, "ram:SubjectCode"),
            content_code: q.code(n, "ram:ContentCode"),
        })
        .collect()
}

/// Pair financial accounts with institutions by index.
///
/// Produces `max(accounts, institutions)` entries. An entry without a
/// partner leaves the other half empty.
pub(crate) fn pair_bank_accounts(
    q: &XmlQuery,
    accounts: &[Node<'_, '_>],
    institutions: &[Node<'_, '_>],
) -> Vec<BankAccount> {
    let count = accounts.len().max(institutions.len());
    (0..count)
        .map(|i| {
            let mut account = BankAccount::default();
            if let Some(a) = accounts.get(i) {
                account.iban = q.text(*a, "ram:IBANID");
                account.name = q.text(*a, "ram:AccountName");
                account.id = q.text(*a, "ram:ProprietaryID");
            }
            if let Some(inst) = institutions.get(i) {
                account.bic = q.text(*inst, "ram:BICID");
                account.bank_leitzahl = q.text(*inst, "ram:GermanBankleitzahlID");
                account.bank_name = q.text(*inst, "ram:Name");
            }
            account
        })
        .collect()
}

/// Allowance or charge rooted at `node`. A missing `currencyID` falls back
/// to `default_currency`.
pub(crate) fn parse_allowance_charge(
    q: &XmlQuery,
    node: Node<'_, '_>,
    default_currency: Option<CurrencyCode>,
    percent_path: &str,
) -> TradeAllowanceCharge {
    let charge_indicator = q.boolean(node, "ram:ChargeIndicator/udt:Indicator");
    let currency = q
        .code_attribute(node, "ram:ActualAmount", "currencyID")
        .or(default_currency);
    let tax = q.node(node, "ram:CategoryTradeTax").map(|t| Tax {
        type_code: q.code(t, "ram:TypeCode").unwrap_or_default(),
        category_code: q.code(t, "ram:CategoryCode").unwrap_or_default(),
        percent: q.decimal_or_zero(t, percent_path),
        ..Tax::default()
    });
    TradeAllowanceCharge {
        charge_indicator,
        currency,
        actual_amount: q.decimal_or_zero(node, "ram:ActualAmount"),
        basis_amount: q.decimal(node, "ram:BasisAmount"),
        charge_percentage: q.decimal(node, "ram:CalculationPercent"),
        reason: q.text(node, "ram:Reason"),
        reason_code: q
            .text(node, "ram:ReasonCode")
            .map(|t| AllowanceChargeReasonCode::parse(&t, charge_indicator)),
        tax,
    }
}

pub(crate) fn parse_accounting_accounts(q: &XmlQuery, from: Node<'_, '_>, path: &str) -> Vec<AccountingAccount> {
    q.nodes(from, path)
        .into_iter()
        .filter_map(|n| {
            Some(AccountingAccount {
                id: q.text(n, "ram:ID")?,
                type_code: q.code(n, "ram:TypeCode"),
            })
        })
        .collect()
}

pub(crate) fn parse_billing_period(
    q: &XmlQuery,
    from: Node<'_, '_>,
    path: &str,
) -> Result<Option<BillingPeriod>, ZugferdError> {
    let Some(node) = q.node(from, path) else {
        return Ok(None);
    };
    Ok(Some(BillingPeriod {
        start: q.date(node, "ram:StartDateTime/udt:DateTimeString")?,
        end: q.date(node, "ram:EndDateTime/udt:DateTimeString")?,
    }))
}

// --- Writing ---

/// `<element><udt:DateTimeString format="102">yyyymmdd</...></element>`
pub(crate) fn write_date<W: Write>(
    w: &mut ProfileAwareXmlWriter<W>,
    element: &str,
    date: Option<NaiveDate>,
    allowed: Profile,
) -> Result<(), ZugferdError> {
    let Some(date) = date else {
        return Ok(());
    };
    w.start_element_if(element, allowed)?;
    w.text_element_with_attrs("udt:DateTimeString", &format_date_102(date), &[("format", "102")])?;
    w.end_element(element)?;
    Ok(())
}

pub(crate) fn write_schemed_id<W: Write, S: CodeList>(
    w: &mut ProfileAwareXmlWriter<W>,
    element: &str,
    id: Option<&SchemedId<S>>,
    allowed: Profile,
) -> Result<(), ZugferdError> {
    let Some(id) = id.filter(|id| !id.is_empty()) else {
        return Ok(());
    };
    match id.scheme_token() {
        Some(scheme) => w.text_element_with_attrs_if(element, &id.value, &[("schemeID", scheme)], allowed)?,
        None => w.text_element_if(element, &id.value, allowed)?,
    };
    Ok(())
}

pub(crate) fn write_notes<W: Write>(
    w: &mut ProfileAwareXmlWriter<W>,
    notes: &[Note],
    allowed: Profile,
) -> Result<(), ZugferdError> {
    for note in notes {
        w.start_element_if("ram:IncludedNote", allowed)?;
        if let Some(code) = note.content_code {
            w.optional_element("ram:ContentCode", Some(code.format()), EXTENDED)?;
        }
        w.text_element("ram:Content", &note.content)?;
        if let Some(code) = note.subject_code {
            w.optional_element("ram:SubjectCode", Some(code.format()), ALL)?;
        }
        w.end_element("ram:IncludedNote")?;
    }
    Ok(())
}

/// CII D16B trade party (ZUGFeRD 2.x). Element order follows the schema:
/// ID, GlobalID, Name, Description, SpecifiedLegalOrganization,
/// DefinedTradeContact, PostalTradeAddress, URIUniversalCommunication,
/// SpecifiedTaxRegistration.
pub(crate) fn write_party<W: Write>(
    w: &mut ProfileAwareXmlWriter<W>,
    element: &str,
    party: Option<&Party>,
    role: PartyRole,
    allowed: Profile,
) -> Result<(), ZugferdError> {
    let Some(party) = party else {
        return Ok(());
    };
    // Minimum carries only name, legal id and, for the seller, address and
    // tax registration.
    let detail = if role == PartyRole::Seller { ALL } else { NOT_MINIMUM };

    w.start_element_if(element, allowed)?;
    write_schemed_id(w, "ram:ID", party.id.as_ref(), NOT_MINIMUM)?;
    write_schemed_id(w, "ram:GlobalID", party.global_id.as_ref(), NOT_MINIMUM)?;
    w.optional_element("ram:Name", Some(party.name.as_str()), ALL)?;
    w.optional_element("ram:Description", party.description.as_deref(), EN16931)?;

    if let Some(legal) = &party.legal_organization {
        w.start_element_if("ram:SpecifiedLegalOrganization", ALL)?;
        write_schemed_id(w, "ram:ID", legal.id.as_ref(), ALL)?;
        w.optional_element("ram:TradingBusinessName", legal.trading_business_name.as_deref(), NOT_MINIMUM)?;
        w.end_element("ram:SpecifiedLegalOrganization")?;
    }

    if let Some(contact) = party.contact.as_ref().filter(|c| !c.is_empty()) {
        write_contact(w, contact)?;
    }

    if has_address(party) {
        w.start_element_if("ram:PostalTradeAddress", detail)?;
        w.optional_element("ram:PostcodeCode", party.postcode.as_deref(), NOT_MINIMUM)?;
        w.optional_element("ram:LineOne", party.street.as_deref(), NOT_MINIMUM)?;
        w.optional_element("ram:LineTwo", party.address_line2.as_deref(), NOT_MINIMUM)?;
        w.optional_element("ram:LineThree", party.address_line3.as_deref(), NOT_MINIMUM)?;
        w.optional_element("ram:CityName", party.city.as_deref(), NOT_MINIMUM)?;
        w.optional_element("ram:CountryID", party.country.map(|c| c.format()), ALL)?;
        w.optional_element("ram:CountrySubDivisionName", party.subdivision.as_deref(), NOT_MINIMUM)?;
        w.end_element("ram:PostalTradeAddress")?;
    }

    if let Some(address) = party.electronic_address.as_ref().filter(|a| !a.is_empty()) {
        w.start_element_if("ram:URIUniversalCommunication", NOT_MINIMUM)?;
        write_schemed_id(w, "ram:URIID", Some(address), NOT_MINIMUM)?;
        w.end_element("ram:URIUniversalCommunication")?;
    }

    for registration in party.tax_registrations.iter().filter(|r| !r.is_empty()) {
        w.start_element_if("ram:SpecifiedTaxRegistration", detail)?;
        write_schemed_id(w, "ram:ID", Some(registration), ALL)?;
        w.end_element("ram:SpecifiedTaxRegistration")?;
    }
    w.end_element(element)?;
    Ok(())
}

fn write_contact<W: Write>(w: &mut ProfileAwareXmlWriter<W>, contact: &Contact) -> Result<(), ZugferdError> {
    w.start_element_if("ram:DefinedTradeContact", EN16931)?;
    w.optional_element("ram:PersonName", contact.name.as_deref(), ALL)?;
    w.optional_element("ram:DepartmentName", contact.org_unit.as_deref(), ALL)?;
    if let Some(phone) = contact.phone.as_deref() {
        w.start_element("ram:TelephoneUniversalCommunication")?;
        w.text_element("ram:CompleteNumber", phone)?;
        w.end_element("ram:TelephoneUniversalCommunication")?;
    }
    if let Some(fax) = contact.fax.as_deref() {
        w.start_element_if("ram:FaxUniversalCommunication", EXTENDED)?;
        w.text_element("ram:CompleteNumber", fax)?;
        w.end_element("ram:FaxUniversalCommunication")?;
    }
    if let Some(email) = contact.email.as_deref() {
        w.start_element("ram:EmailURIUniversalCommunication")?;
        w.text_element("ram:URIID", email)?;
        w.end_element("ram:EmailURIUniversalCommunication")?;
    }
    w.end_element("ram:DefinedTradeContact")?;
    Ok(())
}

pub(crate) fn has_address(party: &Party) -> bool {
    party.street.is_some()
        || party.address_line2.is_some()
        || party.address_line3.is_some()
        || party.city.is_some()
        || party.postcode.is_some()
        || party.country.is_some()
        || party.subdivision.is_some()
}

/// Pairs `creditor_bank_accounts` with the payment means for writing: one
/// `SpecifiedTradeSettlementPaymentMeans` per account, or a single one
/// without an account.
pub(crate) fn creditor_accounts(descriptor: &InvoiceDescriptor) -> Vec<Option<&BankAccount>> {
    if descriptor.creditor_bank_accounts.is_empty() {
        vec![None]
    } else {
        descriptor.creditor_bank_accounts.iter().map(Some).collect()
    }
}

/// Whether any account carries institution data. Institutions are then
/// written for every account so that readers pair them by position.
pub(crate) fn any_institution(accounts: &[BankAccount]) -> bool {
    accounts
        .iter()
        .any(|a| a.bic.is_some() || a.bank_leitzahl.is_some() || a.bank_name.is_some())
}

/// Stated line total, or quantity times net price per basis quantity.
pub(crate) fn line_total(line: &TradeLineItem) -> Result<Decimal, ZugferdError> {
    if let Some(total) = line.line_total_amount {
        return Ok(total);
    }
    let price = line.net_unit_price.unwrap_or_default();
    let basis = line.unit_quantity.filter(|q| !q.is_zero()).unwrap_or(Decimal::ONE);
    line.billed_quantity
        .checked_mul(price)
        .and_then(|amount| amount.checked_div(basis))
        .ok_or(ZugferdError::Overflow("line total"))
}

/// Base64 payload for an attachment.
pub(crate) fn encode_attachment(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
