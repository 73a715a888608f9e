use std::io::Write;

use super::common::{any_institution, creditor_accounts, line_total, write_date, write_schemed_id};
use super::ns_v1;
use crate::codes::CodeList;
use crate::core::*;
use crate::io::InvoiceWriter;
use crate::xml::ProfileAwareXmlWriter;
use crate::xml::format::format_iso_datetime;

/// Writer for ZUGFeRD 1.0 `CrossIndustryDocument`.
///
/// Every amount carries a `currencyID`; percentages are written as
/// `ram:ApplicablePercent`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CiiVersion1Writer;

const ALL: Profile = Profile::BASIC.union(Profile::COMFORT).union(Profile::EXTENDED);
const COMFORT_UP: Profile = Profile::COMFORT.union(Profile::EXTENDED);
const EXTENDED: Profile = Profile::EXTENDED;

type XmlOut<W> = ProfileAwareXmlWriter<W>;

impl InvoiceWriter for CiiVersion1Writer {
    fn version(&self) -> ZugferdVersion {
        ZugferdVersion::Version1
    }

    fn supports(&self, profile: Profile) -> bool {
        !profile.is_unknown() && ALL.contains(profile)
    }

    fn write<W: Write>(&self, desc: &InvoiceDescriptor, out: W) -> Result<(), ZugferdError> {
        let mut w = ProfileAwareXmlWriter::new(out, desc.profile)?;
        let currency = desc.currency.format();
        let cur = Some(currency);

        w.start_element_with_attrs(
            "rsm:CrossIndustryDocument",
            &[
                ("xmlns:rsm", ns_v1::RSM),
                ("xmlns:ram", ns_v1::RAM),
                ("xmlns:udt", ns_v1::UDT),
            ],
        )?;

        // --- SpecifiedExchangedDocumentContext ---
        w.start_element("rsm:SpecifiedExchangedDocumentContext")?;
        if desc.is_test {
            w.start_element("ram:TestIndicator")?;
            w.text_element("udt:Indicator", "true")?;
            w.end_element("ram:TestIndicator")?;
        }
        w.start_element("ram:GuidelineSpecifiedDocumentContextParameter")?;
        w.text_element(
            "ram:ID",
            desc.profile.identifier(ZugferdVersion::Version1).unwrap_or_default(),
        )?;
        w.end_element("ram:GuidelineSpecifiedDocumentContextParameter")?;
        w.end_element("rsm:SpecifiedExchangedDocumentContext")?;

        // --- HeaderExchangedDocument ---
        w.start_element("rsm:HeaderExchangedDocument")?;
        w.text_element("ram:ID", &desc.invoice_no)?;
        w.text_element("ram:Name", desc.name.as_deref().unwrap_or("RECHNUNG"))?;
        w.text_element("ram:TypeCode", desc.invoice_type.format())?;
        write_date(&mut w, "ram:IssueDateTime", desc.invoice_date, ALL)?;
        for note in &desc.notes {
            w.start_element("ram:IncludedNote")?;
            w.text_element("ram:Content", &note.content)?;
            if let Some(code) = note.subject_code {
                w.optional_element("ram:SubjectCode", Some(code.format()), ALL)?;
            }
            w.end_element("ram:IncludedNote")?;
        }
        w.end_element("rsm:HeaderExchangedDocument")?;

        // --- SpecifiedSupplyChainTradeTransaction ---
        w.start_element("rsm:SpecifiedSupplyChainTradeTransaction")?;

        w.start_element("ram:ApplicableSupplyChainTradeAgreement")?;
        w.optional_element("ram:BuyerReference", desc.buyer_reference.as_deref(), COMFORT_UP)?;
        write_party(&mut w, "ram:SellerTradeParty", desc.seller.as_ref())?;
        write_party(&mut w, "ram:BuyerTradeParty", desc.buyer.as_ref())?;
        write_reference(&mut w, "ram:BuyerOrderReferencedDocument", desc.buyer_order_referenced_document.as_ref(), COMFORT_UP)?;
        write_reference(&mut w, "ram:ContractReferencedDocument", desc.contract_referenced_document.as_ref(), COMFORT_UP)?;
        for doc in &desc.additional_referenced_documents {
            w.start_element_if("ram:AdditionalReferencedDocument", EXTENDED)?;
            if let Some(date) = doc.issue_date {
                w.text_element("ram:IssueDateTime", &format_iso_datetime(date))?;
            }
            w.optional_element("ram:LineID", doc.line_id.as_deref(), ALL)?;
            w.text_element("ram:ID", &doc.id)?;
            w.optional_element("ram:TypeCode", doc.type_code.map(|c| c.format()), ALL)?;
            w.end_element("ram:AdditionalReferencedDocument")?;
        }
        w.end_element("ram:ApplicableSupplyChainTradeAgreement")?;

        w.start_element("ram:ApplicableSupplyChainTradeDelivery")?;
        if let Some(ship_to) = desc.ship_to.as_ref() {
            w.start_element_if("ram:ShipToTradeParty", COMFORT_UP)?;
            write_party_content(&mut w, ship_to)?;
            w.end_element("ram:ShipToTradeParty")?;
        }
        if let Some(date) = desc.actual_delivery_date {
            w.start_element("ram:ActualDeliverySupplyChainEvent")?;
            write_date(&mut w, "ram:OccurrenceDateTime", Some(date), ALL)?;
            w.end_element("ram:ActualDeliverySupplyChainEvent")?;
        }
        write_reference(
            &mut w,
            "ram:DeliveryNoteReferencedDocument",
            desc.delivery_note_referenced_document.as_ref(),
            COMFORT_UP,
        )?;
        w.end_element("ram:ApplicableSupplyChainTradeDelivery")?;

        // --- ApplicableSupplyChainTradeSettlement ---
        w.start_element("ram:ApplicableSupplyChainTradeSettlement")?;
        w.optional_element("ram:PaymentReference", desc.payment_reference.as_deref(), ALL)?;
        w.text_element("ram:InvoiceCurrencyCode", currency)?;
        if let Some(invoicee) = desc.invoicee.as_ref() {
            w.start_element_if("ram:InvoiceeTradeParty", COMFORT_UP)?;
            write_party_content(&mut w, invoicee)?;
            w.end_element("ram:InvoiceeTradeParty")?;
        }
        if let Some(payee) = desc.payee.as_ref() {
            w.start_element_if("ram:PayeeTradeParty", EXTENDED)?;
            write_party_content(&mut w, payee)?;
            w.end_element("ram:PayeeTradeParty")?;
        }

        if let Some(means) = &desc.payment_means {
            let with_institutions = any_institution(&desc.creditor_bank_accounts);
            let with_debitor_institutions = any_institution(&desc.debitor_bank_accounts);
            for (index, account) in creditor_accounts(desc).into_iter().enumerate() {
                // Debtor accounts go into the first block only.
                let debitors: &[BankAccount] = if index == 0 { &desc.debitor_bank_accounts } else { &[] };
                w.start_element("ram:SpecifiedTradeSettlementPaymentMeans")?;
                w.optional_element("ram:TypeCode", Some(means.type_code.format()), COMFORT_UP)?;
                w.optional_element("ram:Information", means.information.as_deref(), COMFORT_UP)?;
                if let Some(creditor_id) = means.sepa_creditor_identifier.as_deref() {
                    match means.sepa_mandate_reference.as_deref() {
                        Some(mandate) => {
                            w.text_element_with_attrs("ram:ID", creditor_id, &[("schemeAgencyID", mandate)])?
                        }
                        None => w.text_element("ram:ID", creditor_id)?,
                    };
                }
                for debitor in debitors {
                    w.start_element("ram:PayerPartyDebtorFinancialAccount")?;
                    w.optional_element("ram:IBANID", debitor.iban.as_deref(), ALL)?;
                    w.optional_element("ram:ProprietaryID", debitor.id.as_deref(), ALL)?;
                    w.end_element("ram:PayerPartyDebtorFinancialAccount")?;
                }
                if let Some(account) = account {
                    w.start_element("ram:PayeePartyCreditorFinancialAccount")?;
                    w.optional_element("ram:IBANID", account.iban.as_deref(), ALL)?;
                    w.optional_element("ram:AccountName", account.name.as_deref(), ALL)?;
                    w.optional_element("ram:ProprietaryID", account.id.as_deref(), ALL)?;
                    w.end_element("ram:PayeePartyCreditorFinancialAccount")?;
                }
                for debitor in debitors.iter().filter(|_| with_debitor_institutions) {
                    w.start_element("ram:PayerSpecifiedDebtorFinancialInstitution")?;
                    w.optional_element("ram:BICID", debitor.bic.as_deref(), ALL)?;
                    w.end_element("ram:PayerSpecifiedDebtorFinancialInstitution")?;
                }
                if let Some(account) = account.filter(|_| with_institutions) {
                    w.start_element("ram:PayeeSpecifiedCreditorFinancialInstitution")?;
                    w.optional_element("ram:BICID", account.bic.as_deref(), ALL)?;
                    w.optional_element("ram:GermanBankleitzahlID", account.bank_leitzahl.as_deref(), ALL)?;
                    w.optional_element("ram:Name", account.bank_name.as_deref(), ALL)?;
                    w.end_element("ram:PayeeSpecifiedCreditorFinancialInstitution")?;
                }
                w.end_element("ram:SpecifiedTradeSettlementPaymentMeans")?;
            }
        }

        for tax in &desc.taxes {
            w.start_element("ram:ApplicableTradeTax")?;
            w.decimal_element_if("ram:CalculatedAmount", tax.tax_amount, 2, cur, ALL)?;
            w.optional_element("ram:TypeCode", Some(tax.type_code.format()), ALL)?;
            w.optional_element("ram:ExemptionReason", tax.exemption_reason.as_deref(), COMFORT_UP)?;
            w.decimal_element_if("ram:BasisAmount", tax.basis_amount, 2, cur, ALL)?;
            w.optional_element("ram:CategoryCode", Some(tax.category_code.format()), COMFORT_UP)?;
            w.decimal_element_if("ram:ApplicablePercent", tax.percent, 2, None, ALL)?;
            w.end_element("ram:ApplicableTradeTax")?;
        }

        if let Some(period) = &desc.billing_period {
            w.start_element_if("ram:BillingSpecifiedPeriod", COMFORT_UP)?;
            write_date(&mut w, "ram:StartDateTime", period.start, ALL)?;
            write_date(&mut w, "ram:EndDateTime", period.end, ALL)?;
            w.end_element("ram:BillingSpecifiedPeriod")?;
        }

        for charge in &desc.trade_allowance_charges {
            let charge_cur = charge.currency.map(|c| c.format()).or(cur);
            w.start_element_if("ram:SpecifiedTradeAllowanceCharge", COMFORT_UP)?;
            w.start_element("ram:ChargeIndicator")?;
            w.text_element("udt:Indicator", if charge.charge_indicator { "true" } else { "false" })?;
            w.end_element("ram:ChargeIndicator")?;
            w.optional_decimal_element("ram:BasisAmount", charge.basis_amount, 2, charge_cur, EXTENDED)?;
            w.decimal_element_if("ram:ActualAmount", charge.actual_amount, 2, charge_cur, ALL)?;
            w.optional_element("ram:Reason", charge.reason.as_deref(), ALL)?;
            if let Some(tax) = &charge.tax {
                w.start_element("ram:CategoryTradeTax")?;
                w.optional_element("ram:TypeCode", Some(tax.type_code.format()), ALL)?;
                w.optional_element("ram:CategoryCode", Some(tax.category_code.format()), ALL)?;
                w.decimal_element_if("ram:ApplicablePercent", tax.percent, 2, None, ALL)?;
                w.end_element("ram:CategoryTradeTax")?;
            }
            w.end_element("ram:SpecifiedTradeAllowanceCharge")?;
        }

        for service in &desc.service_charges {
            w.start_element_if("ram:SpecifiedLogisticsServiceCharge", COMFORT_UP)?;
            w.text_element("ram:Description", &service.description)?;
            w.decimal_element_if("ram:AppliedAmount", service.amount, 2, cur, ALL)?;
            if let Some(tax) = &service.tax {
                w.start_element("ram:AppliedTradeTax")?;
                w.optional_element("ram:TypeCode", Some(tax.type_code.format()), ALL)?;
                w.optional_element("ram:CategoryCode", Some(tax.category_code.format()), ALL)?;
                w.decimal_element_if("ram:ApplicablePercent", tax.percent, 2, None, ALL)?;
                w.end_element("ram:AppliedTradeTax")?;
            }
            w.end_element("ram:SpecifiedLogisticsServiceCharge")?;
        }

        for terms in &desc.payment_terms {
            w.start_element_if("ram:SpecifiedTradePaymentTerms", COMFORT_UP)?;
            w.optional_element("ram:Description", terms.description.as_deref(), ALL)?;
            write_date(&mut w, "ram:DueDateDateTime", terms.due_date, ALL)?;
            if terms.terms_type == Some(PaymentTermsType::Discount) {
                w.start_element_if("ram:ApplicableTradePaymentDiscountTerms", EXTENDED)?;
                if let Some(days) = terms.due_days {
                    w.text_element_with_attrs("ram:BasisPeriodMeasure", &days.to_string(), &[("unitCode", "DAY")])?;
                }
                w.optional_decimal_element("ram:BasisAmount", terms.basis_amount, 2, cur, ALL)?;
                w.optional_decimal_element("ram:CalculationPercent", terms.percentage, 2, None, ALL)?;
                w.optional_decimal_element("ram:ActualDiscountAmount", terms.actual_amount, 2, cur, ALL)?;
                w.end_element("ram:ApplicableTradePaymentDiscountTerms")?;
            }
            w.end_element("ram:SpecifiedTradePaymentTerms")?;
        }

        let t = &desc.totals;
        w.start_element("ram:SpecifiedTradeSettlementMonetarySummation")?;
        w.optional_decimal_element("ram:LineTotalAmount", t.line_total_amount, 2, cur, ALL)?;
        w.optional_decimal_element("ram:ChargeTotalAmount", t.charge_total_amount, 2, cur, ALL)?;
        w.optional_decimal_element("ram:AllowanceTotalAmount", t.allowance_total_amount, 2, cur, ALL)?;
        w.optional_decimal_element("ram:TaxBasisTotalAmount", t.tax_basis_amount, 2, cur, ALL)?;
        w.optional_decimal_element("ram:TaxTotalAmount", t.tax_total_amount, 2, cur, ALL)?;
        w.optional_decimal_element("ram:GrandTotalAmount", t.grand_total_amount, 2, cur, ALL)?;
        w.optional_decimal_element("ram:TotalPrepaidAmount", t.total_prepaid_amount, 2, cur, COMFORT_UP)?;
        w.optional_decimal_element("ram:DuePayableAmount", t.due_payable_amount, 2, cur, COMFORT_UP)?;
        w.end_element("ram:SpecifiedTradeSettlementMonetarySummation")?;

        for account in &desc.receivable_accounting_accounts {
            w.start_element_if("ram:ReceivableSpecifiedTradeAccountingAccount", EXTENDED)?;
            w.text_element("ram:ID", &account.id)?;
            w.end_element("ram:ReceivableSpecifiedTradeAccountingAccount")?;
        }
        w.end_element("ram:ApplicableSupplyChainTradeSettlement")?;

        for line in &desc.trade_line_items {
            write_line(&mut w, line, cur)?;
        }

        w.end_element("rsm:SpecifiedSupplyChainTradeTransaction")?;
        w.end_element("rsm:CrossIndustryDocument")?;
        Ok(())
    }
}

fn write_reference<W: Write>(
    w: &mut XmlOut<W>,
    element: &str,
    doc: Option<&ReferencedDocument>,
    allowed: Profile,
) -> Result<(), ZugferdError> {
    let Some(doc) = doc else {
        return Ok(());
    };
    w.start_element_if(element, allowed)?;
    if let Some(date) = doc.issue_date {
        w.text_element("ram:IssueDateTime", &format_iso_datetime(date))?;
    }
    w.optional_element("ram:LineID", doc.line_id.as_deref(), ALL)?;
    w.text_element("ram:ID", &doc.id)?;
    w.end_element(element)?;
    Ok(())
}

fn write_party<W: Write>(w: &mut XmlOut<W>, element: &str, party: Option<&Party>) -> Result<(), ZugferdError> {
    let Some(party) = party else {
        return Ok(());
    };
    w.start_element(element)?;
    write_party_content(w, party)?;
    w.end_element(element)?;
    Ok(())
}

fn write_party_content<W: Write>(w: &mut XmlOut<W>, party: &Party) -> Result<(), ZugferdError> {
    write_schemed_id(w, "ram:ID", party.id.as_ref(), COMFORT_UP)?;
    write_schemed_id(w, "ram:GlobalID", party.global_id.as_ref(), COMFORT_UP)?;
    w.text_element("ram:Name", &party.name)?;

    if let Some(contact) = party.contact.as_ref().filter(|c| !c.is_empty()) {
        w.start_element_if("ram:DefinedTradeContact", EXTENDED)?;
        w.optional_element("ram:PersonName", contact.name.as_deref(), ALL)?;
        w.optional_element("ram:DepartmentName", contact.org_unit.as_deref(), ALL)?;
        if let Some(phone) = contact.phone.as_deref() {
            w.start_element("ram:TelephoneUniversalCommunication")?;
            w.text_element("ram:CompleteNumber", phone)?;
            w.end_element("ram:TelephoneUniversalCommunication")?;
        }
        if let Some(fax) = contact.fax.as_deref() {
            w.start_element("ram:FaxUniversalCommunication")?;
            w.text_element("ram:CompleteNumber", fax)?;
            w.end_element("ram:FaxUniversalCommunication")?;
        }
        if let Some(email) = contact.email.as_deref() {
            w.start_element("ram:EmailURIUniversalCommunication")?;
            w.text_element("ram:URIID", email)?;
            w.end_element("ram:EmailURIUniversalCommunication")?;
        }
        w.end_element("ram:DefinedTradeContact")?;
    }

    w.start_element("ram:PostalTradeAddress")?;
    w.optional_element("ram:PostcodeCode", party.postcode.as_deref(), ALL)?;
    w.optional_element("ram:LineOne", party.street.as_deref(), ALL)?;
    w.optional_element("ram:LineTwo", party.address_line2.as_deref(), ALL)?;
    w.optional_element("ram:CityName", party.city.as_deref(), ALL)?;
    w.optional_element("ram:CountryID", party.country.map(|c| c.format()), ALL)?;
    w.end_element("ram:PostalTradeAddress")?;

    for registration in party.tax_registrations.iter().filter(|r| !r.is_empty()) {
        w.start_element("ram:SpecifiedTaxRegistration")?;
        write_schemed_id(w, "ram:ID", Some(registration), ALL)?;
        w.end_element("ram:SpecifiedTaxRegistration")?;
    }
    Ok(())
}

fn write_line<W: Write>(w: &mut XmlOut<W>, line: &TradeLineItem, cur: Option<&str>) -> Result<(), ZugferdError> {
    let unit = line.unit_code.map(|u| u.format());

    w.start_element("ram:IncludedSupplyChainTradeLineItem")?;
    w.start_element("ram:AssociatedDocumentLineDocument")?;
    w.text_element("ram:LineID", &line.line_id)?;
    for note in &line.notes {
        w.start_element_if("ram:IncludedNote", COMFORT_UP)?;
        w.text_element("ram:Content", &note.content)?;
        w.end_element("ram:IncludedNote")?;
    }
    w.end_element("ram:AssociatedDocumentLineDocument")?;

    // --- SpecifiedSupplyChainTradeAgreement ---
    w.start_element_if("ram:SpecifiedSupplyChainTradeAgreement", COMFORT_UP)?;
    if let Some(order) = &line.buyer_order_referenced_document {
        w.start_element("ram:BuyerOrderReferencedDocument")?;
        if let Some(date) = order.issue_date {
            w.text_element("ram:IssueDateTime", &format_iso_datetime(date))?;
        }
        w.optional_element("ram:LineID", order.line_id.as_deref(), ALL)?;
        w.optional_element("ram:ID", Some(order.id.as_str()), ALL)?;
        w.end_element("ram:BuyerOrderReferencedDocument")?;
    }
    write_reference(w, "ram:ContractReferencedDocument", line.contract_referenced_document.as_ref(), EXTENDED)?;
    if let Some(gross) = line.gross_unit_price {
        w.start_element("ram:GrossPriceProductTradePrice")?;
        w.decimal_element_if("ram:ChargeAmount", gross, 4, cur, ALL)?;
        if let Some(basis) = line.unit_quantity {
            w.quantity_element_if("ram:BasisQuantity", basis, unit, ALL)?;
        }
        for charge in &line.price_allowance_charges {
            w.start_element("ram:AppliedTradeAllowanceCharge")?;
            w.start_element("ram:ChargeIndicator")?;
            w.text_element("udt:Indicator", if charge.charge_indicator { "true" } else { "false" })?;
            w.end_element("ram:ChargeIndicator")?;
            w.optional_decimal_element("ram:BasisAmount", charge.basis_amount, 4, cur, EXTENDED)?;
            w.decimal_element_if("ram:ActualAmount", charge.actual_amount, 4, cur, ALL)?;
            w.optional_element("ram:Reason", charge.reason.as_deref(), ALL)?;
            w.end_element("ram:AppliedTradeAllowanceCharge")?;
        }
        w.end_element("ram:GrossPriceProductTradePrice")?;
    }
    w.start_element("ram:NetPriceProductTradePrice")?;
    w.decimal_element_if("ram:ChargeAmount", line.net_unit_price.unwrap_or_default(), 4, cur, ALL)?;
    if let Some(basis) = line.unit_quantity {
        w.quantity_element_if("ram:BasisQuantity", basis, unit, ALL)?;
    }
    w.end_element("ram:NetPriceProductTradePrice")?;
    w.end_element("ram:SpecifiedSupplyChainTradeAgreement")?;

    // --- SpecifiedSupplyChainTradeDelivery ---
    w.start_element("ram:SpecifiedSupplyChainTradeDelivery")?;
    w.quantity_element_if("ram:BilledQuantity", line.billed_quantity, unit, ALL)?;
    write_reference(
        w,
        "ram:DeliveryNoteReferencedDocument",
        line.delivery_note_referenced_document.as_ref(),
        EXTENDED,
    )?;
    w.end_element("ram:SpecifiedSupplyChainTradeDelivery")?;

    // --- SpecifiedSupplyChainTradeSettlement ---
    w.start_element("ram:SpecifiedSupplyChainTradeSettlement")?;
    w.start_element_if("ram:ApplicableTradeTax", COMFORT_UP)?;
    w.optional_element("ram:TypeCode", Some(line.tax_type.format()), ALL)?;
    w.optional_element("ram:ExemptionReason", line.tax_exemption_reason.as_deref(), ALL)?;
    w.optional_element("ram:CategoryCode", Some(line.tax_category_code.format()), ALL)?;
    w.decimal_element_if("ram:ApplicablePercent", line.tax_percent, 2, None, ALL)?;
    w.end_element("ram:ApplicableTradeTax")?;
    if let Some(period) = &line.billing_period {
        w.start_element_if("ram:BillingSpecifiedPeriod", EXTENDED)?;
        write_date(w, "ram:StartDateTime", period.start, ALL)?;
        write_date(w, "ram:EndDateTime", period.end, ALL)?;
        w.end_element("ram:BillingSpecifiedPeriod")?;
    }
    w.start_element_if("ram:SpecifiedTradeSettlementMonetarySummation", COMFORT_UP)?;
    w.decimal_element_if("ram:LineTotalAmount", line_total(line)?, 2, cur, ALL)?;
    w.end_element("ram:SpecifiedTradeSettlementMonetarySummation")?;
    w.end_element("ram:SpecifiedSupplyChainTradeSettlement")?;

    // --- SpecifiedTradeProduct ---
    w.start_element("ram:SpecifiedTradeProduct")?;
    write_schemed_id(w, "ram:GlobalID", line.global_id.as_ref(), ALL)?;
    w.optional_element("ram:SellerAssignedID", line.seller_assigned_id.as_deref(), COMFORT_UP)?;
    w.optional_element("ram:BuyerAssignedID", line.buyer_assigned_id.as_deref(), COMFORT_UP)?;
    w.text_element("ram:Name", &line.name)?;
    w.optional_element("ram:Description", line.description.as_deref(), COMFORT_UP)?;
    for characteristic in &line.product_characteristics {
        w.start_element_if("ram:ApplicableProductCharacteristic", EXTENDED)?;
        w.optional_element("ram:TypeCode", characteristic.type_code.as_deref(), ALL)?;
        w.text_element("ram:Description", &characteristic.description)?;
        w.text_element("ram:Value", &characteristic.value)?;
        w.end_element("ram:ApplicableProductCharacteristic")?;
    }
    if let Some(country) = line.origin_country.filter(|c| !c.is_unknown()) {
        w.start_element_if("ram:OriginTradeCountry", EXTENDED)?;
        w.text_element("ram:ID", country.format())?;
        w.end_element("ram:OriginTradeCountry")?;
    }
    w.end_element("ram:SpecifiedTradeProduct")?;
    w.end_element("ram:IncludedSupplyChainTradeLineItem")?;
    Ok(())
}
