use std::io::Write;

use super::common::*;
use super::ns;
use crate::codes::CodeList;
use crate::core::*;
use crate::io::InvoiceWriter;
use crate::xml::ProfileAwareXmlWriter;
use crate::xml::format::format_date_102;

/// Writer for ZUGFeRD 2.1–2.3 / Factur-X / XRechnung CII.
#[derive(Debug, Clone, Copy, Default)]
pub struct CiiVersion23Writer;

type XmlOut<W> = ProfileAwareXmlWriter<W>;

impl InvoiceWriter for CiiVersion23Writer {
    fn version(&self) -> ZugferdVersion {
        ZugferdVersion::Version23
    }

    fn supports(&self, profile: Profile) -> bool {
        !profile.is_unknown() && ALL.contains(profile)
    }

    fn write<W: Write>(&self, desc: &InvoiceDescriptor, out: W) -> Result<(), ZugferdError> {
        let mut w = ProfileAwareXmlWriter::new(out, desc.profile)?;
        let currency = desc.currency.format();

        w.start_element_with_attrs(
            "rsm:CrossIndustryInvoice",
            &[
                ("xmlns:rsm", ns::RSM),
                ("xmlns:ram", ns::RAM),
                ("xmlns:qdt", ns::QDT),
                ("xmlns:udt", ns::UDT),
            ],
        )?;

        // --- ExchangedDocumentContext ---
        w.start_element("rsm:ExchangedDocumentContext")?;
        if desc.is_test {
            w.start_element("ram:TestIndicator")?;
            w.text_element("udt:Indicator", "true")?;
            w.end_element("ram:TestIndicator")?;
        }
        if let Some(process) = desc.business_process.as_deref() {
            w.start_element("ram:BusinessProcessSpecifiedDocumentContextParameter")?;
            w.text_element("ram:ID", process)?;
            w.end_element("ram:BusinessProcessSpecifiedDocumentContextParameter")?;
        }
        w.start_element("ram:GuidelineSpecifiedDocumentContextParameter")?;
        w.text_element(
            "ram:ID",
            desc.profile.identifier(ZugferdVersion::Version23).unwrap_or_default(),
        )?;
        w.end_element("ram:GuidelineSpecifiedDocumentContextParameter")?;
        w.end_element("rsm:ExchangedDocumentContext")?;

        // --- ExchangedDocument ---
        w.start_element("rsm:ExchangedDocument")?;
        w.text_element("ram:ID", &desc.invoice_no)?;
        w.optional_element("ram:Name", desc.name.as_deref(), EXTENDED)?;
        w.text_element("ram:TypeCode", desc.invoice_type.format())?;
        write_date(&mut w, "ram:IssueDateTime", desc.invoice_date, ALL)?;
        write_notes(&mut w, &desc.notes, NOT_MINIMUM)?;
        w.end_element("rsm:ExchangedDocument")?;

        // --- SupplyChainTradeTransaction ---
        w.start_element("rsm:SupplyChainTradeTransaction")?;
        for line in &desc.trade_line_items {
            write_line(&mut w, line)?;
        }

        // --- ApplicableHeaderTradeAgreement ---
        w.start_element("ram:ApplicableHeaderTradeAgreement")?;
        w.optional_element("ram:BuyerReference", desc.buyer_reference.as_deref(), ALL)?;
        write_party(&mut w, "ram:SellerTradeParty", desc.seller.as_ref(), PartyRole::Seller, ALL)?;
        write_party(&mut w, "ram:BuyerTradeParty", desc.buyer.as_ref(), PartyRole::Buyer, ALL)?;
        write_party(
            &mut w,
            "ram:SellerTaxRepresentativeTradeParty",
            desc.seller_tax_representative.as_ref(),
            PartyRole::SellerTaxRepresentative,
            NOT_MINIMUM,
        )?;
        write_reference(&mut w, "ram:SellerOrderReferencedDocument", desc.seller_order_referenced_document.as_ref(), EN16931)?;
        write_reference(&mut w, "ram:BuyerOrderReferencedDocument", desc.buyer_order_referenced_document.as_ref(), ALL)?;
        write_reference(&mut w, "ram:ContractReferencedDocument", desc.contract_referenced_document.as_ref(), NOT_MINIMUM)?;
        for doc in &desc.additional_referenced_documents {
            write_additional_reference(&mut w, doc, EN16931)?;
        }
        if let Some(project) = &desc.specified_procuring_project {
            w.start_element_if("ram:SpecifiedProcuringProject", EN16931)?;
            w.text_element("ram:ID", &project.id)?;
            w.text_element("ram:Name", &project.name)?;
            w.end_element("ram:SpecifiedProcuringProject")?;
        }
        w.end_element("ram:ApplicableHeaderTradeAgreement")?;

        // --- ApplicableHeaderTradeDelivery ---
        w.start_element("ram:ApplicableHeaderTradeDelivery")?;
        write_party(&mut w, "ram:ShipToTradeParty", desc.ship_to.as_ref(), PartyRole::ShipTo, NOT_MINIMUM)?;
        write_party(
            &mut w,
            "ram:UltimateShipToTradeParty",
            desc.ultimate_ship_to.as_ref(),
            PartyRole::UltimateShipTo,
            EXTENDED,
        )?;
        write_party(&mut w, "ram:ShipFromTradeParty", desc.ship_from.as_ref(), PartyRole::ShipFrom, EXTENDED)?;
        if let Some(date) = desc.actual_delivery_date {
            w.start_element_if("ram:ActualDeliverySupplyChainEvent", NOT_MINIMUM)?;
            write_date(&mut w, "ram:OccurrenceDateTime", Some(date), ALL)?;
            w.end_element("ram:ActualDeliverySupplyChainEvent")?;
        }
        write_reference(
            &mut w,
            "ram:DespatchAdviceReferencedDocument",
            desc.despatch_advice_referenced_document.as_ref(),
            NOT_MINIMUM,
        )?;
        write_reference(
            &mut w,
            "ram:DeliveryNoteReferencedDocument",
            desc.delivery_note_referenced_document.as_ref(),
            EXTENDED,
        )?;
        w.end_element("ram:ApplicableHeaderTradeDelivery")?;

        // --- ApplicableHeaderTradeSettlement ---
        w.start_element("ram:ApplicableHeaderTradeSettlement")?;
        let means = desc.payment_means.as_ref();
        w.optional_element(
            "ram:CreditorReferenceID",
            means.and_then(|m| m.sepa_creditor_identifier.as_deref()),
            NOT_MINIMUM,
        )?;
        w.optional_element("ram:PaymentReference", desc.payment_reference.as_deref(), NOT_MINIMUM)?;
        w.optional_element("ram:TaxCurrencyCode", desc.tax_currency.map(|c| c.format()), NOT_MINIMUM)?;
        w.text_element("ram:InvoiceCurrencyCode", currency)?;
        write_party(&mut w, "ram:InvoicerTradeParty", desc.invoicer.as_ref(), PartyRole::Invoicer, EXTENDED)?;
        write_party(&mut w, "ram:InvoiceeTradeParty", desc.invoicee.as_ref(), PartyRole::Invoicee, EXTENDED)?;
        write_party(&mut w, "ram:PayeeTradeParty", desc.payee.as_ref(), PartyRole::Payee, NOT_MINIMUM)?;

        write_payment_means(&mut w, desc)?;

        for tax in &desc.taxes {
            write_header_tax(&mut w, tax)?;
        }

        if let Some(period) = &desc.billing_period {
            w.start_element_if("ram:BillingSpecifiedPeriod", NOT_MINIMUM)?;
            write_date(&mut w, "ram:StartDateTime", period.start, ALL)?;
            write_date(&mut w, "ram:EndDateTime", period.end, ALL)?;
            w.end_element("ram:BillingSpecifiedPeriod")?;
        }

        for charge in &desc.trade_allowance_charges {
            write_allowance_charge(&mut w, "ram:SpecifiedTradeAllowanceCharge", charge, NOT_MINIMUM)?;
        }

        for service in &desc.service_charges {
            w.start_element_if("ram:SpecifiedLogisticsServiceCharge", EXTENDED)?;
            w.text_element("ram:Description", &service.description)?;
            w.decimal_element_if("ram:AppliedAmount", service.amount, 2, None, ALL)?;
            if let Some(tax) = &service.tax {
                w.start_element("ram:AppliedTradeTax")?;
                w.optional_element("ram:TypeCode", Some(tax.type_code.format()), ALL)?;
                w.optional_element("ram:CategoryCode", Some(tax.category_code.format()), ALL)?;
                w.decimal_element_if("ram:RateApplicablePercent", tax.percent, 2, None, ALL)?;
                w.end_element("ram:AppliedTradeTax")?;
            }
            w.end_element("ram:SpecifiedLogisticsServiceCharge")?;
        }

        write_payment_terms(&mut w, desc)?;
        write_summation(&mut w, desc)?;

        for doc in &desc.invoice_referenced_documents {
            write_reference(&mut w, "ram:InvoiceReferencedDocument", Some(doc), NOT_MINIMUM)?;
        }
        for account in &desc.receivable_accounting_accounts {
            write_accounting_account(&mut w, account, NOT_MINIMUM)?;
        }
        w.end_element("ram:ApplicableHeaderTradeSettlement")?;

        w.end_element("rsm:SupplyChainTradeTransaction")?;
        w.end_element("rsm:CrossIndustryInvoice")?;
        Ok(())
    }
}

/// Referenced document with id, line id and formatted issue date.
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
    w.text_element("ram:IssuerAssignedID", &doc.id)?;
    w.optional_element("ram:LineID", doc.line_id.as_deref(), ALL)?;
    if let Some(date) = doc.issue_date {
        w.start_element("ram:FormattedIssueDateTime")?;
        w.text_element_with_attrs("qdt:DateTimeString", &format_date_102(date), &[("format", "102")])?;
        w.end_element("ram:FormattedIssueDateTime")?;
    }
    w.end_element(element)?;
    Ok(())
}

/// BG-24 supporting document, possibly with an embedded attachment.
fn write_additional_reference<W: Write>(
    w: &mut XmlOut<W>,
    doc: &ReferencedDocument,
    allowed: Profile,
) -> Result<(), ZugferdError> {
    w.start_element_if("ram:AdditionalReferencedDocument", allowed)?;
    w.text_element("ram:IssuerAssignedID", &doc.id)?;
    w.optional_element("ram:URIID", doc.uri.as_deref(), ALL)?;
    w.optional_element("ram:LineID", doc.line_id.as_deref(), EXTENDED)?;
    w.optional_element("ram:TypeCode", doc.type_code.map(|c| c.format()), ALL)?;
    w.optional_element("ram:Name", doc.name.as_deref(), ALL)?;
    if let Some(bytes) = doc.attachment.as_deref().filter(|b| !b.is_empty()) {
        let filename = doc.filename.as_deref().unwrap_or_default();
        w.text_element_with_attrs(
            "ram:AttachmentBinaryObject",
            &encode_attachment(bytes),
            &[("mimeCode", doc.mime_type()), ("filename", filename)],
        )?;
    }
    w.optional_element("ram:ReferenceTypeCode", doc.reference_type_code.map(|c| c.format()), ALL)?;
    if let Some(date) = doc.issue_date {
        w.start_element_if("ram:FormattedIssueDateTime", EXTENDED)?;
        w.text_element_with_attrs("qdt:DateTimeString", &format_date_102(date), &[("format", "102")])?;
        w.end_element("ram:FormattedIssueDateTime")?;
    }
    w.end_element("ram:AdditionalReferencedDocument")?;
    Ok(())
}

fn write_payment_means<W: Write>(w: &mut XmlOut<W>, desc: &InvoiceDescriptor) -> Result<(), ZugferdError> {
    let Some(means) = &desc.payment_means else {
        return Ok(());
    };
    let with_institutions = any_institution(&desc.creditor_bank_accounts);
    for (index, account) in creditor_accounts(desc).into_iter().enumerate() {
        w.start_element_if("ram:SpecifiedTradeSettlementPaymentMeans", NOT_MINIMUM)?;
        w.optional_element("ram:TypeCode", Some(means.type_code.format()), ALL)?;
        w.optional_element("ram:Information", means.information.as_deref(), EN16931)?;
        if let Some(card) = &means.financial_card {
            w.start_element_if("ram:ApplicableTradeSettlementFinancialCard", EN16931)?;
            w.text_element("ram:ID", &card.id)?;
            w.optional_element("ram:CardholderName", card.cardholder_name.as_deref(), ALL)?;
            w.end_element("ram:ApplicableTradeSettlementFinancialCard")?;
        }
        // Debtor accounts go into the first block only.
        let debitors: &[BankAccount] = if index == 0 { &desc.debitor_bank_accounts } else { &[] };
        for debitor in debitors {
            w.start_element("ram:PayerPartyDebtorFinancialAccount")?;
            w.optional_element("ram:IBANID", debitor.iban.as_deref(), ALL)?;
            w.end_element("ram:PayerPartyDebtorFinancialAccount")?;
        }
        if let Some(account) = account {
            w.start_element("ram:PayeePartyCreditorFinancialAccount")?;
            w.optional_element("ram:IBANID", account.iban.as_deref(), ALL)?;
            w.optional_element("ram:AccountName", account.name.as_deref(), EN16931)?;
            w.optional_element("ram:ProprietaryID", account.id.as_deref(), ALL)?;
            w.end_element("ram:PayeePartyCreditorFinancialAccount")?;
            if with_institutions {
                w.start_element_if("ram:PayeeSpecifiedCreditorFinancialInstitution", EN16931)?;
                w.optional_element("ram:BICID", account.bic.as_deref(), ALL)?;
                w.end_element("ram:PayeeSpecifiedCreditorFinancialInstitution")?;
            }
        }
        w.end_element("ram:SpecifiedTradeSettlementPaymentMeans")?;
    }
    Ok(())
}

fn write_header_tax<W: Write>(w: &mut XmlOut<W>, tax: &Tax) -> Result<(), ZugferdError> {
    w.start_element_if("ram:ApplicableTradeTax", NOT_MINIMUM)?;
    w.decimal_element_if("ram:CalculatedAmount", tax.tax_amount, 2, None, ALL)?;
    w.optional_element("ram:TypeCode", Some(tax.type_code.format()), ALL)?;
    w.optional_element("ram:ExemptionReason", tax.exemption_reason.as_deref(), ALL)?;
    w.decimal_element_if("ram:BasisAmount", tax.basis_amount, 2, None, ALL)?;
    w.optional_decimal_element("ram:LineTotalBasisAmount", tax.line_total_basis_amount, 2, None, EXTENDED)?;
    w.optional_decimal_element(
        "ram:AllowanceChargeBasisAmount",
        tax.allowance_charge_basis_amount,
        2,
        None,
        EXTENDED,
    )?;
    w.optional_element("ram:CategoryCode", Some(tax.category_code.format()), ALL)?;
    w.optional_element("ram:ExemptionReasonCode", tax.exemption_reason_code.map(|c| c.format()), ALL)?;
    w.decimal_element_if("ram:RateApplicablePercent", tax.percent, 2, None, ALL)?;
    w.end_element("ram:ApplicableTradeTax")?;
    Ok(())
}

fn write_allowance_charge<W: Write>(
    w: &mut XmlOut<W>,
    element: &str,
    charge: &TradeAllowanceCharge,
    allowed: Profile,
) -> Result<(), ZugferdError> {
    w.start_element_if(element, allowed)?;
    w.start_element("ram:ChargeIndicator")?;
    w.text_element("udt:Indicator", if charge.charge_indicator { "true" } else { "false" })?;
    w.end_element("ram:ChargeIndicator")?;
    w.optional_decimal_element("ram:CalculationPercent", charge.charge_percentage, 2, None, ALL)?;
    w.optional_decimal_element("ram:BasisAmount", charge.basis_amount, 2, None, ALL)?;
    w.decimal_element_if("ram:ActualAmount", charge.actual_amount, 2, None, ALL)?;
    w.optional_element("ram:ReasonCode", charge.reason_code.map(|c| c.format()), ALL)?;
    w.optional_element("ram:Reason", charge.reason.as_deref(), ALL)?;
    if let Some(tax) = &charge.tax {
        w.start_element("ram:CategoryTradeTax")?;
        w.optional_element("ram:TypeCode", Some(tax.type_code.format()), ALL)?;
        w.optional_element("ram:CategoryCode", Some(tax.category_code.format()), ALL)?;
        w.decimal_element_if("ram:RateApplicablePercent", tax.percent, 2, None, ALL)?;
        w.end_element("ram:CategoryTradeTax")?;
    }
    w.end_element(element)?;
    Ok(())
}

fn write_payment_terms<W: Write>(w: &mut XmlOut<W>, desc: &InvoiceDescriptor) -> Result<(), ZugferdError> {
    let mandate = desc
        .payment_means
        .as_ref()
        .and_then(|m| m.sepa_mandate_reference.as_deref());
    if desc.payment_terms.is_empty() {
        if let Some(mandate) = mandate {
            w.start_element_if("ram:SpecifiedTradePaymentTerms", NOT_MINIMUM)?;
            w.text_element("ram:DirectDebitMandateID", mandate)?;
            w.end_element("ram:SpecifiedTradePaymentTerms")?;
        }
        return Ok(());
    }

    for (i, terms) in desc.payment_terms.iter().enumerate() {
        w.start_element_if("ram:SpecifiedTradePaymentTerms", NOT_MINIMUM)?;
        w.optional_element("ram:Description", terms.description.as_deref(), ALL)?;
        write_date(w, "ram:DueDateDateTime", terms.due_date, ALL)?;
        if i == 0 {
            w.optional_element("ram:DirectDebitMandateID", mandate, ALL)?;
        }
        match terms.terms_type {
            Some(PaymentTermsType::Discount) => {
                w.start_element_if("ram:ApplicableTradePaymentDiscountTerms", EXTENDED)?;
                write_terms_details(w, terms, "ram:ActualDiscountAmount")?;
                w.end_element("ram:ApplicableTradePaymentDiscountTerms")?;
            }
            Some(PaymentTermsType::Penalty) => {
                w.start_element_if("ram:ApplicableTradePaymentPenaltyTerms", EXTENDED)?;
                write_terms_details(w, terms, "ram:ActualPenaltyAmount")?;
                w.end_element("ram:ApplicableTradePaymentPenaltyTerms")?;
            }
            None => {}
        }
        w.end_element("ram:SpecifiedTradePaymentTerms")?;
    }
    Ok(())
}

fn write_terms_details<W: Write>(
    w: &mut XmlOut<W>,
    terms: &PaymentTerms,
    amount_element: &str,
) -> Result<(), ZugferdError> {
    if let Some(days) = terms.due_days {
        w.text_element_with_attrs("ram:BasisPeriodMeasure", &days.to_string(), &[("unitCode", "DAY")])?;
    }
    w.optional_decimal_element("ram:BasisAmount", terms.basis_amount, 2, None, ALL)?;
    w.optional_decimal_element("ram:CalculationPercent", terms.percentage, 2, None, ALL)?;
    w.optional_decimal_element(amount_element, terms.actual_amount, 2, None, ALL)?;
    Ok(())
}

fn write_summation<W: Write>(w: &mut XmlOut<W>, desc: &InvoiceDescriptor) -> Result<(), ZugferdError> {
    let t = &desc.totals;
    let currency = desc.currency.format();
    w.start_element("ram:SpecifiedTradeSettlementHeaderMonetarySummation")?;
    w.optional_decimal_element("ram:LineTotalAmount", t.line_total_amount, 2, None, NOT_MINIMUM)?;
    w.optional_decimal_element("ram:ChargeTotalAmount", t.charge_total_amount, 2, None, NOT_MINIMUM)?;
    w.optional_decimal_element("ram:AllowanceTotalAmount", t.allowance_total_amount, 2, None, NOT_MINIMUM)?;
    w.optional_decimal_element("ram:TaxBasisTotalAmount", t.tax_basis_amount, 2, None, ALL)?;
    w.optional_decimal_element("ram:TaxTotalAmount", t.tax_total_amount, 2, Some(currency), ALL)?;
    if let Some(tax_currency) = desc.tax_currency.filter(|c| *c != desc.currency) {
        w.optional_decimal_element(
            "ram:TaxTotalAmount",
            t.tax_total_amount_in_tax_currency,
            2,
            Some(tax_currency.format()),
            NOT_MINIMUM,
        )?;
    }
    w.optional_decimal_element("ram:RoundingAmount", t.rounding_amount, 2, None, EN16931)?;
    w.optional_decimal_element("ram:GrandTotalAmount", t.grand_total_amount, 2, None, ALL)?;
    w.optional_decimal_element("ram:TotalPrepaidAmount", t.total_prepaid_amount, 2, None, NOT_MINIMUM)?;
    w.optional_decimal_element("ram:DuePayableAmount", t.due_payable_amount, 2, None, ALL)?;
    w.end_element("ram:SpecifiedTradeSettlementHeaderMonetarySummation")?;
    Ok(())
}

fn write_accounting_account<W: Write>(
    w: &mut XmlOut<W>,
    account: &AccountingAccount,
    allowed: Profile,
) -> Result<(), ZugferdError> {
    w.start_element_if("ram:ReceivableSpecifiedTradeAccountingAccount", allowed)?;
    w.text_element("ram:ID", &account.id)?;
    w.optional_element("ram:TypeCode", account.type_code.map(|c| c.format()), EXTENDED)?;
    w.end_element("ram:ReceivableSpecifiedTradeAccountingAccount")?;
    Ok(())
}

fn write_line<W: Write>(w: &mut XmlOut<W>, line: &TradeLineItem) -> Result<(), ZugferdError> {
    w.start_element_if("ram:IncludedSupplyChainTradeLineItem", WITH_LINES)?;

    w.start_element("ram:AssociatedDocumentLineDocument")?;
    w.text_element("ram:LineID", &line.line_id)?;
    w.optional_element("ram:ParentLineID", line.parent_line_id.as_deref(), EXTENDED)?;
    write_notes(w, &line.notes, EN16931)?;
    w.end_element("ram:AssociatedDocumentLineDocument")?;

    // --- SpecifiedTradeProduct ---
    w.start_element("ram:SpecifiedTradeProduct")?;
    write_schemed_id(w, "ram:GlobalID", line.global_id.as_ref(), ALL)?;
    w.optional_element("ram:SellerAssignedID", line.seller_assigned_id.as_deref(), EN16931)?;
    w.optional_element("ram:BuyerAssignedID", line.buyer_assigned_id.as_deref(), EN16931)?;
    w.text_element("ram:Name", &line.name)?;
    w.optional_element("ram:Description", line.description.as_deref(), EN16931)?;
    for characteristic in &line.product_characteristics {
        w.start_element_if("ram:ApplicableProductCharacteristic", EN16931)?;
        w.optional_element("ram:TypeCode", characteristic.type_code.as_deref(), EXTENDED)?;
        w.text_element("ram:Description", &characteristic.description)?;
        w.text_element("ram:Value", &characteristic.value)?;
        w.end_element("ram:ApplicableProductCharacteristic")?;
    }
    for class in &line.product_classifications {
        w.start_element_if("ram:DesignatedProductClassification", EN16931)?;
        if let Some(code) = class.class_code.as_deref() {
            let mut attrs = Vec::new();
            if let Some(list) = class.list_id.map(|l| l.format()).filter(|l| !l.is_empty()) {
                attrs.push(("listID", list));
            }
            if let Some(version) = class.list_version_id.as_deref() {
                attrs.push(("listVersionID", version));
            }
            w.text_element_with_attrs("ram:ClassCode", code, &attrs)?;
        }
        w.optional_element("ram:ClassName", class.class_name.as_deref(), ALL)?;
        w.end_element("ram:DesignatedProductClassification")?;
    }
    if let Some(country) = line.origin_country.filter(|c| !c.is_unknown()) {
        w.start_element_if("ram:OriginTradeCountry", EN16931)?;
        w.text_element("ram:ID", country.format())?;
        w.end_element("ram:OriginTradeCountry")?;
    }
    w.end_element("ram:SpecifiedTradeProduct")?;

    // --- SpecifiedLineTradeAgreement ---
    w.start_element("ram:SpecifiedLineTradeAgreement")?;
    if let Some(order) = &line.buyer_order_referenced_document {
        w.start_element_if("ram:BuyerOrderReferencedDocument", EN16931)?;
        w.optional_element("ram:IssuerAssignedID", Some(order.id.as_str()), EXTENDED)?;
        w.optional_element("ram:LineID", order.line_id.as_deref(), ALL)?;
        w.end_element("ram:BuyerOrderReferencedDocument")?;
    }
    write_reference(w, "ram:ContractReferencedDocument", line.contract_referenced_document.as_ref(), EXTENDED)?;
    for doc in &line.additional_referenced_documents {
        write_additional_reference(w, doc, EXTENDED_XR)?;
    }
    let unit = line.unit_code.map(|u| u.format());
    if let Some(gross) = line.gross_unit_price {
        w.start_element("ram:GrossPriceProductTradePrice")?;
        w.decimal_element_if("ram:ChargeAmount", gross, 4, None, ALL)?;
        if let Some(basis) = line.unit_quantity {
            w.quantity_element_if("ram:BasisQuantity", basis, unit, ALL)?;
        }
        for charge in &line.price_allowance_charges {
            write_price_allowance_charge(w, charge)?;
        }
        w.end_element("ram:GrossPriceProductTradePrice")?;
    }
    w.start_element("ram:NetPriceProductTradePrice")?;
    w.decimal_element_if("ram:ChargeAmount", line.net_unit_price.unwrap_or_default(), 4, None, ALL)?;
    if let Some(basis) = line.unit_quantity {
        w.quantity_element_if("ram:BasisQuantity", basis, unit, ALL)?;
    }
    w.end_element("ram:NetPriceProductTradePrice")?;
    w.end_element("ram:SpecifiedLineTradeAgreement")?;

    // --- SpecifiedLineTradeDelivery ---
    w.start_element("ram:SpecifiedLineTradeDelivery")?;
    w.quantity_element_if("ram:BilledQuantity", line.billed_quantity, unit, ALL)?;
    if let Some(qty) = line.charge_free_quantity {
        w.quantity_element_if("ram:ChargeFreeQuantity", qty, unit, EXTENDED)?;
    }
    if let Some(qty) = line.package_quantity {
        w.quantity_element_if("ram:PackageQuantity", qty, unit, EXTENDED)?;
    }
    write_party(w, "ram:ShipToTradeParty", line.ship_to.as_ref(), PartyRole::ShipTo, EXTENDED)?;
    if let Some(date) = line.actual_delivery_date {
        w.start_element_if("ram:ActualDeliverySupplyChainEvent", EXTENDED)?;
        write_date(w, "ram:OccurrenceDateTime", Some(date), ALL)?;
        w.end_element("ram:ActualDeliverySupplyChainEvent")?;
    }
    write_reference(
        w,
        "ram:DeliveryNoteReferencedDocument",
        line.delivery_note_referenced_document.as_ref(),
        EXTENDED,
    )?;
    w.end_element("ram:SpecifiedLineTradeDelivery")?;

    // --- SpecifiedLineTradeSettlement ---
    w.start_element("ram:SpecifiedLineTradeSettlement")?;
    w.start_element("ram:ApplicableTradeTax")?;
    w.optional_element("ram:TypeCode", Some(line.tax_type.format()), ALL)?;
    w.optional_element("ram:ExemptionReason", line.tax_exemption_reason.as_deref(), EXTENDED)?;
    w.optional_element("ram:CategoryCode", Some(line.tax_category_code.format()), ALL)?;
    w.decimal_element_if("ram:RateApplicablePercent", line.tax_percent, 2, None, ALL)?;
    w.end_element("ram:ApplicableTradeTax")?;
    if let Some(period) = &line.billing_period {
        w.start_element_if("ram:BillingSpecifiedPeriod", EN16931)?;
        write_date(w, "ram:StartDateTime", period.start, ALL)?;
        write_date(w, "ram:EndDateTime", period.end, ALL)?;
        w.end_element("ram:BillingSpecifiedPeriod")?;
    }
    for charge in &line.allowance_charges {
        write_allowance_charge(w, "ram:SpecifiedTradeAllowanceCharge", charge, WITH_LINES)?;
    }
    w.start_element("ram:SpecifiedTradeSettlementLineMonetarySummation")?;
    w.decimal_element_if("ram:LineTotalAmount", line_total(line)?, 2, None, ALL)?;
    w.end_element("ram:SpecifiedTradeSettlementLineMonetarySummation")?;
    for account in &line.receivable_accounting_accounts {
        write_accounting_account(w, account, EN16931)?;
    }
    w.end_element("ram:SpecifiedLineTradeSettlement")?;

    w.end_element("ram:IncludedSupplyChainTradeLineItem")?;
    Ok(())
}

/// Price-level allowance. Only Extended carries price charges and reasons.
fn write_price_allowance_charge<W: Write>(
    w: &mut XmlOut<W>,
    charge: &TradeAllowanceCharge,
) -> Result<(), ZugferdError> {
    let allowed = if charge.charge_indicator { EXTENDED } else { WITH_LINES };
    w.start_element_if("ram:AppliedTradeAllowanceCharge", allowed)?;
    w.start_element("ram:ChargeIndicator")?;
    w.text_element("udt:Indicator", if charge.charge_indicator { "true" } else { "false" })?;
    w.end_element("ram:ChargeIndicator")?;
    w.optional_decimal_element("ram:CalculationPercent", charge.charge_percentage, 2, None, EXTENDED)?;
    w.optional_decimal_element("ram:BasisAmount", charge.basis_amount, 4, None, EXTENDED)?;
    w.decimal_element_if("ram:ActualAmount", charge.actual_amount, 4, None, ALL)?;
    w.optional_element("ram:ReasonCode", charge.reason_code.map(|c| c.format()), EXTENDED)?;
    w.optional_element("ram:Reason", charge.reason.as_deref(), EXTENDED)?;
    w.end_element("ram:AppliedTradeAllowanceCharge")?;
    Ok(())
}
