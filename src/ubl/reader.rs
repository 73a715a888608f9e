use roxmltree::{Document, Node};

use super::{CREDIT_NOTE_LAYOUT, DocumentLayout, INVOICE_LAYOUT, NAMESPACES, SEPA_SCHEME, ns};
use crate::cii::common::decode_attachment;
use crate::codes::*;
use crate::core::*;
use crate::io::InvoiceReader;
use crate::xml::XmlQuery;

/// Reader for UBL 2.1 `Invoice` and `CreditNote` documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct UblReader;

const Q: XmlQuery = XmlQuery::new(NAMESPACES);

impl InvoiceReader for UblReader {
    fn identifiers(&self) -> Vec<&'static str> {
        vec![ns::INVOICE, ns::CREDIT_NOTE]
    }

    fn parse(&self, doc: &Document<'_>) -> Result<InvoiceDescriptor, ZugferdError> {
        let root = doc.root_element();
        let layout = if Q.is(root, INVOICE_LAYOUT.step) {
            INVOICE_LAYOUT
        } else if Q.is(root, CREDIT_NOTE_LAYOUT.step) {
            CREDIT_NOTE_LAYOUT
        } else {
            return Err(ZugferdError::MissingNode("ubl:Invoice".into()));
        };

        let mut desc = InvoiceDescriptor {
            profile: Profile::from_identifier(&Q.string(root, "cbc:CustomizationID"), ZugferdVersion::Version23),
            business_process: Q.text(root, "cbc:ProfileID"),
            invoice_no: Q.string(root, "cbc:ID"),
            invoice_date: Q.date(root, "cbc:IssueDate")?,
            invoice_type: Q.code(root, layout.type_code).unwrap_or_default(),
            notes: Q
                .nodes(root, "cbc:Note")
                .into_iter()
                .filter_map(|n| Q.text(n, "."))
                .map(parse_note)
                .collect(),
            currency: Q.code(root, "cbc:DocumentCurrencyCode").unwrap_or_default(),
            tax_currency: Q.code(root, "cbc:TaxCurrencyCode"),
            buyer_reference: Q.text(root, "cbc:BuyerReference"),
            receivable_accounting_accounts: accounting_cost(root),
            billing_period: parse_period(root)?,
            ..InvoiceDescriptor::default()
        };

        read_references(root, &mut desc)?;

        // --- Parties ---
        let seller_path = "cac:AccountingSupplierParty/cac:Party";
        desc.seller = parse_party(root, seller_path);
        desc.buyer = parse_party(root, "cac:AccountingCustomerParty/cac:Party");
        desc.payee = parse_party(root, "cac:PayeeParty");
        desc.seller_tax_representative = parse_party(root, "cac:TaxRepresentativeParty");

        if let Some(delivery) = Q.node(root, "cac:Delivery") {
            desc.actual_delivery_date = Q.date(delivery, "cbc:ActualDeliveryDate")?;
            desc.ship_to = parse_delivery_party(delivery);
        }

        read_payment(root, seller_path, &mut desc)?;

        desc.trade_allowance_charges = Q
            .nodes(root, "cac:AllowanceCharge")
            .into_iter()
            .map(|n| parse_allowance_charge(n, Some(desc.currency)))
            .collect();

        read_taxes(root, &mut desc);

        if let Some(sum) = Q.node(root, "cac:LegalMonetaryTotal") {
            let t = &mut desc.totals;
            t.line_total_amount = Q.decimal(sum, "cbc:LineExtensionAmount");
            t.tax_basis_amount = Q.decimal(sum, "cbc:TaxExclusiveAmount");
            t.grand_total_amount = Q.decimal(sum, "cbc:TaxInclusiveAmount");
            t.allowance_total_amount = Q.decimal(sum, "cbc:AllowanceTotalAmount");
            t.charge_total_amount = Q.decimal(sum, "cbc:ChargeTotalAmount");
            t.total_prepaid_amount = Q.decimal(sum, "cbc:PrepaidAmount");
            t.rounding_amount = Q.decimal(sum, "cbc:PayableRoundingAmount");
            t.due_payable_amount = Q.decimal(sum, "cbc:PayableAmount");
        }

        let order_id = desc.buyer_order_referenced_document.as_ref().map(|o| o.id.clone());
        for line in Q.nodes(root, layout.line) {
            desc.trade_line_items.push(read_line(line, &layout, order_id.as_deref())?);
        }

        tracing::debug!(
            invoice_no = %desc.invoice_no,
            profile = %desc.profile,
            root = layout.root,
            lines = desc.trade_line_items.len(),
            "UBL document read"
        );
        Ok(desc)
    }
}

/// `#SUBJECT#text` carries the note subject code.
fn parse_note(text: String) -> Note {
    if let Some((code, content)) = text.strip_prefix('#').and_then(|rest| rest.split_once('#')) {
        let subject = SubjectCode::parse(code);
        if !subject.is_unknown() {
            return Note::with_subject(content, subject);
        }
    }
    Note::new(text)
}

fn accounting_cost(from: Node<'_, '_>) -> Vec<AccountingAccount> {
    Q.text(from, "cbc:AccountingCost")
        .map(|id| AccountingAccount { id, type_code: None })
        .into_iter()
        .collect()
}

fn parse_period(from: Node<'_, '_>) -> Result<Option<BillingPeriod>, ZugferdError> {
    let Some(node) = Q.node(from, "cac:InvoicePeriod") else {
        return Ok(None);
    };
    Ok(Some(BillingPeriod {
        start: Q.date(node, "cbc:StartDate")?,
        end: Q.date(node, "cbc:EndDate")?,
    }))
}

fn id_reference(from: Node<'_, '_>, path: &str) -> Option<ReferencedDocument> {
    Q.node(from, path)
        .map(|n| ReferencedDocument::new(Q.string(n, "cbc:ID"), None))
}

fn read_references(root: Node<'_, '_>, desc: &mut InvoiceDescriptor) -> Result<(), ZugferdError> {
    if let Some(order) = Q.node(root, "cac:OrderReference") {
        desc.buyer_order_referenced_document = Q.text(order, "cbc:ID").map(|id| ReferencedDocument::new(id, None));
        desc.seller_order_referenced_document =
            Q.text(order, "cbc:SalesOrderID").map(|id| ReferencedDocument::new(id, None));
    }
    for node in Q.nodes(root, "cac:BillingReference/cac:InvoiceDocumentReference") {
        desc.invoice_referenced_documents.push(ReferencedDocument::new(
            Q.string(node, "cbc:ID"),
            Q.date(node, "cbc:IssueDate")?,
        ));
    }
    desc.despatch_advice_referenced_document = id_reference(root, "cac:DespatchDocumentReference");
    desc.contract_referenced_document = id_reference(root, "cac:ContractDocumentReference");

    for node in Q.nodes(root, "cac:AdditionalDocumentReference") {
        let binary = "cac:Attachment/cbc:EmbeddedDocumentBinaryObject";
        desc.additional_referenced_documents.push(ReferencedDocument {
            id: Q.string(node, "cbc:ID"),
            type_code: Q.code(node, "cbc:DocumentTypeCode"),
            name: Q.text(node, "cbc:DocumentDescription"),
            uri: Q.text(node, "cac:Attachment/cac:ExternalReference/cbc:URI"),
            attachment: Q.text(node, binary).and_then(|b64| decode_attachment(&b64)),
            filename: Q.attribute(node, binary, "filename"),
            ..ReferencedDocument::default()
        });
    }
    desc.specified_procuring_project = Q.text(root, "cac:ProjectReference/cbc:ID").map(|id| ProcuringProject {
        id,
        name: String::new(),
    });
    Ok(())
}

fn fill_address(party: &mut Party, address: Node<'_, '_>) {
    party.street = Q.text(address, "cbc:StreetName");
    party.address_line2 = Q.text(address, "cbc:AdditionalStreetName");
    party.address_line3 = Q.text(address, "cac:AddressLine/cbc:Line");
    party.city = Q.text(address, "cbc:CityName");
    party.postcode = Q.text(address, "cbc:PostalZone");
    party.subdivision = Q.text(address, "cbc:CountrySubentity");
    party.country = Q.code(address, "cac:Country/cbc:IdentificationCode");
}

/// UBL `PartyType` at `path`. The name comes from the legal entity, or
/// from the party name when no registration name is given.
fn parse_party(from: Node<'_, '_>, path: &str) -> Option<Party> {
    let node = Q.node(from, path)?;
    let registration_name = Q.text(node, "cac:PartyLegalEntity/cbc:RegistrationName");
    let party_name = Q.text(node, "cac:PartyName/cbc:Name");

    let mut party = Party {
        electronic_address: Q.schemed_id(node, "cbc:EndpointID"),
        description: Q.text(node, "cac:PartyLegalEntity/cbc:CompanyLegalForm"),
        ..Party::default()
    };

    for id_node in Q.nodes(node, "cac:PartyIdentification/cbc:ID") {
        if Q.attribute(id_node, ".", "schemeID").as_deref() == Some(SEPA_SCHEME) {
            continue;
        }
        let Some(id) = Q.schemed_id::<GlobalIdScheme>(id_node, ".") else {
            continue;
        };
        if id.scheme.is_some() {
            party.global_id.get_or_insert(id);
        } else {
            party.id.get_or_insert(id);
        }
    }

    let legal_id = Q.schemed_id(node, "cac:PartyLegalEntity/cbc:CompanyID");
    let trading_name = registration_name.as_ref().and(party_name.clone());
    if legal_id.is_some() || trading_name.is_some() {
        party.legal_organization = Some(LegalOrganization {
            id: legal_id,
            trading_business_name: trading_name,
        });
    }
    party.name = registration_name.or(party_name).unwrap_or_default();

    if let Some(address) = Q.node(node, "cac:PostalAddress") {
        fill_address(&mut party, address);
    }

    party.tax_registrations = Q
        .nodes(node, "cac:PartyTaxScheme")
        .into_iter()
        .filter_map(|n| {
            let value = Q.text(n, "cbc:CompanyID")?;
            let scheme = match Q.text(n, "cac:TaxScheme/cbc:ID").as_deref() {
                Some("VAT") => Some(TaxRegistrationScheme::VatId),
                Some("FC") => Some(TaxRegistrationScheme::FiscalNumber),
                _ => None,
            };
            Some(TaxRegistration { scheme, value })
        })
        .collect();

    party.contact = Q.node(node, "cac:Contact").map(|c| Contact {
        name: Q.text(c, "cbc:Name"),
        phone: Q.text(c, "cbc:Telephone"),
        email: Q.text(c, "cbc:ElectronicMail"),
        ..Contact::default()
    });
    Some(party)
}

/// BG-13 deliver-to party, assembled from the delivery location and the
/// delivery party name.
fn parse_delivery_party(delivery: Node<'_, '_>) -> Option<Party> {
    let location = Q.node(delivery, "cac:DeliveryLocation");
    let name = Q.text(delivery, "cac:DeliveryParty/cac:PartyName/cbc:Name");
    if location.is_none() && name.is_none() {
        return None;
    }
    let mut party = Party {
        name: name.unwrap_or_default(),
        global_id: location.and_then(|l| Q.schemed_id(l, "cbc:ID")),
        ..Party::default()
    };
    if let Some(address) = location.and_then(|l| Q.node(l, "cac:Address")) {
        fill_address(&mut party, address);
    }
    Some(party)
}

fn sepa_creditor_id(root: Node<'_, '_>, seller_path: &str) -> Option<String> {
    let seller = Q.node(root, seller_path)?;
    Q.nodes(seller, "cac:PartyIdentification/cbc:ID")
        .into_iter()
        .find(|n| Q.attribute(*n, ".", "schemeID").as_deref() == Some(SEPA_SCHEME))
        .and_then(|n| Q.text(n, "."))
}

fn read_payment(root: Node<'_, '_>, seller_path: &str, desc: &mut InvoiceDescriptor) -> Result<(), ZugferdError> {
    let means = Q.nodes(root, "cac:PaymentMeans");
    if let Some(first) = means.first().copied() {
        desc.payment_reference = Q.text(first, "cbc:PaymentID");
        desc.payment_means = Some(PaymentMeans {
            type_code: Q.code(first, "cbc:PaymentMeansCode").unwrap_or_default(),
            information: Q.attribute(first, "cbc:PaymentMeansCode", "name"),
            sepa_creditor_identifier: sepa_creditor_id(root, seller_path),
            sepa_mandate_reference: Q.text(first, "cac:PaymentMandate/cbc:ID"),
            financial_card: Q.node(first, "cac:CardAccount").map(|card| FinancialCard {
                id: Q.string(card, "cbc:PrimaryAccountNumberID"),
                cardholder_name: Q.text(card, "cbc:HolderName"),
            }),
        });
        // Each PaymentMeans repeats the mandate; the first one is authoritative.
        desc.debitor_bank_accounts = Q
            .text(first, "cac:PaymentMandate/cac:PayerFinancialAccount/cbc:ID")
            .map(|iban| BankAccount {
                iban: Some(iban),
                ..BankAccount::default()
            })
            .into_iter()
            .collect();
    }
    desc.creditor_bank_accounts = means
        .iter()
        .filter_map(|m| Q.node(*m, "cac:PayeeFinancialAccount"))
        .map(|account| BankAccount {
            iban: Q.text(account, "cbc:ID"),
            name: Q.text(account, "cbc:Name"),
            bic: Q.text(account, "cac:FinancialInstitutionBranch/cbc:ID"),
            ..BankAccount::default()
        })
        .collect();

    desc.payment_terms = Q
        .nodes(root, "cac:PaymentTerms")
        .into_iter()
        .map(|n| PaymentTerms {
            description: Q.text(n, "cbc:Note"),
            ..PaymentTerms::default()
        })
        .collect();
    let due_date = match Q.date(root, "cbc:DueDate")? {
        Some(due) => Some(due),
        None => match means.first() {
            Some(first) => Q.date(*first, "cbc:PaymentDueDate")?,
            None => None,
        },
    };
    if let Some(due) = due_date {
        match desc.payment_terms.first_mut() {
            Some(terms) => terms.due_date = Some(due),
            None => desc.payment_terms.push(PaymentTerms {
                due_date: Some(due),
                ..PaymentTerms::default()
            }),
        }
    }
    Ok(())
}

fn parse_tax_category(node: Node<'_, '_>) -> Tax {
    Tax {
        type_code: Q.code(node, "cac:TaxScheme/cbc:ID").unwrap_or_default(),
        category_code: Q.code(node, "cbc:ID").unwrap_or_default(),
        percent: Q.decimal_or_zero(node, "cbc:Percent"),
        exemption_reason: Q.text(node, "cbc:TaxExemptionReason"),
        exemption_reason_code: Q.code(node, "cbc:TaxExemptionReasonCode"),
        ..Tax::default()
    }
}

fn parse_allowance_charge(node: Node<'_, '_>, default_currency: Option<CurrencyCode>) -> TradeAllowanceCharge {
    let charge_indicator = Q.boolean(node, "cbc:ChargeIndicator");
    TradeAllowanceCharge {
        charge_indicator,
        currency: Q.code_attribute(node, "cbc:Amount", "currencyID").or(default_currency),
        actual_amount: Q.decimal_or_zero(node, "cbc:Amount"),
        basis_amount: Q.decimal(node, "cbc:BaseAmount"),
        charge_percentage: Q.decimal(node, "cbc:MultiplierFactorNumeric"),
        reason: Q.text(node, "cbc:AllowanceChargeReason"),
        reason_code: Q
            .text(node, "cbc:AllowanceChargeReasonCode")
            .map(|t| AllowanceChargeReasonCode::parse(&t, charge_indicator)),
        tax: Q.node(node, "cac:TaxCategory").map(parse_tax_category),
    }
}

/// The `TaxTotal` in the tax currency only carries BT-111; every other
/// `TaxTotal` contributes its subtotals to the VAT breakdown.
fn read_taxes(root: Node<'_, '_>, desc: &mut InvoiceDescriptor) {
    let tax_currency = desc.tax_currency.filter(|c| *c != desc.currency);
    for total in Q.nodes(root, "cac:TaxTotal") {
        let amount = Q.decimal(total, "cbc:TaxAmount");
        let currency: Option<CurrencyCode> = Q.code_attribute(total, "cbc:TaxAmount", "currencyID");
        if tax_currency.is_some() && currency == tax_currency {
            desc.totals.tax_total_amount_in_tax_currency = amount;
            continue;
        }
        desc.totals.tax_total_amount = amount;
        for sub in Q.nodes(total, "cac:TaxSubtotal") {
            let category = Q.node(sub, "cac:TaxCategory");
            desc.taxes.push(Tax {
                basis_amount: Q.decimal_or_zero(sub, "cbc:TaxableAmount"),
                tax_amount: Q.decimal_or_zero(sub, "cbc:TaxAmount"),
                ..category.map(parse_tax_category).unwrap_or_default()
            });
        }
    }
}

fn read_line(node: Node<'_, '_>, layout: &DocumentLayout, order_id: Option<&str>) -> Result<TradeLineItem, ZugferdError> {
    let mut line = TradeLineItem {
        line_id: Q.string(node, "cbc:ID"),
        notes: Q
            .nodes(node, "cbc:Note")
            .into_iter()
            .filter_map(|n| Q.text(n, "."))
            .map(Note::new)
            .collect(),
        billed_quantity: Q.decimal_or_zero(node, layout.quantity),
        unit_code: Q.code_attribute(node, layout.quantity, "unitCode"),
        line_total_amount: Q.decimal(node, "cbc:LineExtensionAmount"),
        receivable_accounting_accounts: accounting_cost(node),
        billing_period: parse_period(node)?,
        buyer_order_referenced_document: Q.text(node, "cac:OrderLineReference/cbc:LineID").map(|line_id| {
            ReferencedDocument {
                id: order_id.unwrap_or_default().to_owned(),
                line_id: Some(line_id),
                ..ReferencedDocument::default()
            }
        }),
        additional_referenced_documents: Q
            .nodes(node, "cac:DocumentReference")
            .into_iter()
            .map(|d| ReferencedDocument {
                id: Q.string(d, "cbc:ID"),
                type_code: Q.code(d, "cbc:DocumentTypeCode"),
                ..ReferencedDocument::default()
            })
            .collect(),
        allowance_charges: Q
            .nodes(node, "cac:AllowanceCharge")
            .into_iter()
            .map(|n| parse_allowance_charge(n, None))
            .collect(),
        net_unit_price: Q.decimal(node, "cac:Price/cbc:PriceAmount"),
        unit_quantity: Q.decimal(node, "cac:Price/cbc:BaseQuantity"),
        gross_unit_price: Q.decimal(node, "cac:Price/cac:AllowanceCharge/cbc:BaseAmount"),
        ..TradeLineItem::default()
    };

    if let Some(item) = Q.node(node, "cac:Item") {
        line.description = Q.text(item, "cbc:Description");
        line.name = Q.string(item, "cbc:Name");
        line.buyer_assigned_id = Q.text(item, "cac:BuyersItemIdentification/cbc:ID");
        line.seller_assigned_id = Q.text(item, "cac:SellersItemIdentification/cbc:ID");
        line.global_id = Q.schemed_id(item, "cac:StandardItemIdentification/cbc:ID");
        line.origin_country = Q.code(item, "cac:OriginCountry/cbc:IdentificationCode");
        line.product_classifications = Q
            .nodes(item, "cac:CommodityClassification/cbc:ItemClassificationCode")
            .into_iter()
            .map(|c| ProductClassification {
                list_id: Q.code_attribute(c, ".", "listID"),
                list_version_id: Q.attribute(c, ".", "listVersionID"),
                class_code: Q.text(c, "."),
                class_name: None,
            })
            .collect();
        if let Some(tax) = Q.node(item, "cac:ClassifiedTaxCategory") {
            let tax = parse_tax_category(tax);
            line.tax_type = tax.type_code;
            line.tax_category_code = tax.category_code;
            line.tax_percent = tax.percent;
            line.tax_exemption_reason = tax.exemption_reason;
        }
        line.product_characteristics = Q
            .nodes(item, "cac:AdditionalItemProperty")
            .into_iter()
            .map(|p| ProductCharacteristic {
                type_code: None,
                description: Q.string(p, "cbc:Name"),
                value: Q.string(p, "cbc:Value"),
            })
            .collect();
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    const CREDIT_NOTE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ubl:CreditNote xmlns:ubl="urn:oasis:names:specification:ubl:schema:xsd:CreditNote-2"
    xmlns:cac="urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2"
    xmlns:cbc="urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2">
  <cbc:CustomizationID>urn:cen.eu:en16931:2017</cbc:CustomizationID>
  <cbc:ID>GS-17</cbc:ID>
  <cbc:IssueDate>2024-03-01</cbc:IssueDate>
  <cbc:CreditNoteTypeCode>381</cbc:CreditNoteTypeCode>
  <cbc:Note>#REG#Handelsregister Berlin HRB 123</cbc:Note>
  <cbc:Note>Gutschrift zur Rechnung RE-9</cbc:Note>
  <cbc:DocumentCurrencyCode>EUR</cbc:DocumentCurrencyCode>
  <cac:BillingReference>
    <cac:InvoiceDocumentReference>
      <cbc:ID>RE-9</cbc:ID>
      <cbc:IssueDate>2024-02-01</cbc:IssueDate>
    </cac:InvoiceDocumentReference>
  </cac:BillingReference>
  <cac:AccountingSupplierParty>
    <cac:Party>
      <cac:PartyIdentification><cbc:ID schemeID="SEPA">DE98ZZZ09999999999</cbc:ID></cac:PartyIdentification>
      <cac:PartyIdentification><cbc:ID schemeID="0088">4000001123452</cbc:ID></cac:PartyIdentification>
      <cac:PartyName><cbc:Name>Lieferant</cbc:Name></cac:PartyName>
      <cac:PartyLegalEntity><cbc:RegistrationName>Lieferant GmbH</cbc:RegistrationName></cac:PartyLegalEntity>
    </cac:Party>
  </cac:AccountingSupplierParty>
  <cac:AccountingCustomerParty>
    <cac:Party>
      <cac:PartyName><cbc:Name>Kunde AG</cbc:Name></cac:PartyName>
      <cac:PartyTaxScheme>
        <cbc:CompanyID>DE987654321</cbc:CompanyID>
        <cac:TaxScheme><cbc:ID>VAT</cbc:ID></cac:TaxScheme>
      </cac:PartyTaxScheme>
    </cac:Party>
  </cac:AccountingCustomerParty>
  <cac:PaymentMeans>
    <cbc:PaymentMeansCode>59</cbc:PaymentMeansCode>
    <cac:PaymentMandate>
      <cbc:ID>MANDAT-1</cbc:ID>
      <cac:PayerFinancialAccount><cbc:ID>DE02120300000000202051</cbc:ID></cac:PayerFinancialAccount>
    </cac:PaymentMandate>
  </cac:PaymentMeans>
  <cac:TaxTotal>
    <cbc:TaxAmount currencyID="EUR">19.00</cbc:TaxAmount>
    <cac:TaxSubtotal>
      <cbc:TaxableAmount currencyID="EUR">100.00</cbc:TaxableAmount>
      <cbc:TaxAmount currencyID="EUR">19.00</cbc:TaxAmount>
      <cac:TaxCategory>
        <cbc:ID>S</cbc:ID>
        <cbc:Percent>19</cbc:Percent>
        <cac:TaxScheme><cbc:ID>VAT</cbc:ID></cac:TaxScheme>
      </cac:TaxCategory>
    </cac:TaxSubtotal>
  </cac:TaxTotal>
  <cac:LegalMonetaryTotal>
    <cbc:LineExtensionAmount currencyID="EUR">100.00</cbc:LineExtensionAmount>
    <cbc:PayableAmount currencyID="EUR">119.00</cbc:PayableAmount>
  </cac:LegalMonetaryTotal>
  <cac:CreditNoteLine>
    <cbc:ID>1</cbc:ID>
    <cbc:CreditedQuantity unitCode="HUR">2</cbc:CreditedQuantity>
    <cbc:LineExtensionAmount currencyID="EUR">100.00</cbc:LineExtensionAmount>
    <cac:Item>
      <cbc:Name>Beratung</cbc:Name>
      <cac:ClassifiedTaxCategory>
        <cbc:ID>S</cbc:ID>
        <cbc:Percent>19</cbc:Percent>
        <cac:TaxScheme><cbc:ID>VAT</cbc:ID></cac:TaxScheme>
      </cac:ClassifiedTaxCategory>
    </cac:Item>
    <cac:Price><cbc:PriceAmount currencyID="EUR">50.00</cbc:PriceAmount></cac:Price>
  </cac:CreditNoteLine>
</ubl:CreditNote>"#;

    #[test]
    fn reads_credit_note() {
        let desc = UblReader.parse_str(CREDIT_NOTE).unwrap();
        assert_eq!(desc.profile, Profile::COMFORT);
        assert_eq!(desc.invoice_type, InvoiceType::CreditNote);
        assert_eq!(desc.invoice_no, "GS-17");
        assert_eq!(desc.invoice_referenced_documents[0].id, "RE-9");
        assert_eq!(desc.trade_line_items.len(), 1);
        assert_eq!(desc.trade_line_items[0].billed_quantity, dec!(2));
        assert_eq!(desc.trade_line_items[0].unit_code, Some(QuantityCode::parse("HUR")));
        assert_eq!(desc.trade_line_items[0].tax_percent, dec!(19));
        assert_eq!(desc.totals.due_payable_amount, Some(dec!(119.00)));
        assert_eq!(desc.taxes.len(), 1);
        assert_eq!(desc.taxes[0].category_code, TaxCategoryCode::StandardRate);
    }

    #[test]
    fn notes_carry_subject_codes() {
        let desc = UblReader.parse_str(CREDIT_NOTE).unwrap();
        assert_eq!(desc.notes[0].subject_code, Some(SubjectCode::Regulatory));
        assert_eq!(desc.notes[0].content, "Handelsregister Berlin HRB 123");
        assert_eq!(desc.notes[1].subject_code, None);
    }

    #[test]
    fn party_name_falls_back_to_party_name() {
        let desc = UblReader.parse_str(CREDIT_NOTE).unwrap();
        let seller = desc.seller.unwrap();
        assert_eq!(seller.name, "Lieferant GmbH");
        assert_eq!(
            seller.legal_organization.and_then(|l| l.trading_business_name).as_deref(),
            Some("Lieferant")
        );
        assert_eq!(seller.global_id, Some(GlobalId::new(GlobalIdScheme::Gln, "4000001123452")));

        let buyer = desc.buyer.unwrap();
        assert_eq!(buyer.name, "Kunde AG");
        assert_eq!(buyer.tax_registration(TaxRegistrationScheme::VatId), Some("DE987654321"));
    }

    #[test]
    fn sepa_direct_debit() {
        let desc = UblReader.parse_str(CREDIT_NOTE).unwrap();
        let means = desc.payment_means.unwrap();
        assert_eq!(means.type_code, PaymentMeansType::SepaDirectDebit);
        assert_eq!(means.sepa_creditor_identifier.as_deref(), Some("DE98ZZZ09999999999"));
        assert_eq!(means.sepa_mandate_reference.as_deref(), Some("MANDAT-1"));
        assert_eq!(desc.debitor_bank_accounts[0].iban.as_deref(), Some("DE02120300000000202051"));
    }

    #[test]
    fn wrong_root_is_missing_node() {
        let xml = r#"<Order xmlns="urn:oasis:names:specification:ubl:schema:xsd:Order-2"/>"#;
        assert!(matches!(UblReader.parse_str(xml), Err(ZugferdError::MissingNode(_))));
    }
}
