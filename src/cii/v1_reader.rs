use roxmltree::{Document, Node};
use rust_decimal::prelude::ToPrimitive;

use super::NAMESPACES_V1;
use super::common::*;
use crate::core::*;
use crate::io::InvoiceReader;
use crate::xml::XmlQuery;

/// Reader for ZUGFeRD 1.0 `CrossIndustryDocument` invoices.
#[derive(Debug, Clone, Copy, Default)]
pub struct CiiVersion1Reader;

const Q: XmlQuery = XmlQuery::new(NAMESPACES_V1);

impl InvoiceReader for CiiVersion1Reader {
    fn identifiers(&self) -> Vec<&'static str> {
        Profile::identifiers(ZugferdVersion::Version1).collect()
    }

    fn parse(&self, doc: &Document<'_>) -> Result<InvoiceDescriptor, ZugferdError> {
        let root = doc.root_element();
        if !Q.is(root, "rsm:CrossIndustryDocument") {
            return Err(ZugferdError::MissingNode("rsm:CrossIndustryDocument".into()));
        }
        let tx = Q
            .node(root, "rsm:SpecifiedSupplyChainTradeTransaction")
            .ok_or_else(|| ZugferdError::MissingNode("rsm:SpecifiedSupplyChainTradeTransaction".into()))?;

        let mut desc = InvoiceDescriptor {
            is_test: Q.boolean(root, "rsm:SpecifiedExchangedDocumentContext/ram:TestIndicator/udt:Indicator"),
            profile: Profile::from_identifier(
                &Q.string(
                    root,
                    "rsm:SpecifiedExchangedDocumentContext/ram:GuidelineSpecifiedDocumentContextParameter/ram:ID",
                ),
                ZugferdVersion::Version1,
            ),
            ..InvoiceDescriptor::default()
        };

        if let Some(header) = Q.node(root, "rsm:HeaderExchangedDocument") {
            desc.invoice_no = Q.string(header, "ram:ID");
            desc.name = Q.text(header, "ram:Name");
            desc.invoice_type = Q.code(header, "ram:TypeCode").unwrap_or_default();
            desc.invoice_date = Q.date(header, "ram:IssueDateTime/udt:DateTimeString")?;
            desc.notes = parse_notes(&Q, header, "ram:IncludedNote");
        }

        // --- Agreement ---
        if let Some(agreement) = Q.node(tx, "ram:ApplicableSupplyChainTradeAgreement") {
            desc.buyer_reference = Q.text(agreement, "ram:BuyerReference");
            desc.seller = parse_party(&Q, agreement, "ram:SellerTradeParty");
            desc.buyer = parse_party(&Q, agreement, "ram:BuyerTradeParty");
            desc.buyer_order_referenced_document =
                parse_referenced_document(&Q, agreement, "ram:BuyerOrderReferencedDocument", &V1_REFERENCE)?;
            desc.contract_referenced_document =
                parse_referenced_document(&Q, agreement, "ram:ContractReferencedDocument", &V1_REFERENCE)?;
            desc.additional_referenced_documents =
                parse_referenced_documents(&Q, agreement, "ram:AdditionalReferencedDocument", &V1_REFERENCE)?;
        }

        // --- Delivery ---
        if let Some(delivery) = Q.node(tx, "ram:ApplicableSupplyChainTradeDelivery") {
            desc.ship_to = parse_party(&Q, delivery, "ram:ShipToTradeParty");
            desc.actual_delivery_date = Q.date(
                delivery,
                "ram:ActualDeliverySupplyChainEvent/ram:OccurrenceDateTime/udt:DateTimeString",
            )?;
            desc.delivery_note_referenced_document =
                parse_referenced_document(&Q, delivery, "ram:DeliveryNoteReferencedDocument", &V1_REFERENCE)?;
        }

        // --- Settlement ---
        if let Some(settlement) = Q.node(tx, "ram:ApplicableSupplyChainTradeSettlement") {
            read_settlement(settlement, &mut desc)?;
        }

        for line in Q.nodes(tx, "ram:IncludedSupplyChainTradeLineItem") {
            desc.trade_line_items.push(read_line(line)?);
        }

        tracing::debug!(
            invoice_no = %desc.invoice_no,
            profile = %desc.profile,
            lines = desc.trade_line_items.len(),
            "ZUGFeRD 1.0 document read"
        );
        Ok(desc)
    }
}

fn read_settlement(settlement: Node<'_, '_>, desc: &mut InvoiceDescriptor) -> Result<(), ZugferdError> {
    desc.payment_reference = Q.text(settlement, "ram:PaymentReference");
    desc.currency = Q.code(settlement, "ram:InvoiceCurrencyCode").unwrap_or_default();
    desc.invoicee = parse_party(&Q, settlement, "ram:InvoiceeTradeParty");
    desc.payee = parse_party(&Q, settlement, "ram:PayeeTradeParty");

    let means = Q.nodes(settlement, "ram:SpecifiedTradeSettlementPaymentMeans");
    if let Some(first) = means.first() {
        let information: Vec<String> = Q
            .nodes(*first, "ram:Information")
            .into_iter()
            .filter_map(|n| n.text().map(str::trim).map(str::to_owned))
            .filter(|t| !t.is_empty())
            .collect();
        desc.payment_means = Some(PaymentMeans {
            type_code: Q.code(*first, "ram:TypeCode").unwrap_or_default(),
            information: (!information.is_empty()).then(|| information.join("\n")),
            sepa_creditor_identifier: Q.text(*first, "ram:ID"),
            sepa_mandate_reference: Q.attribute(*first, "ram:ID", "schemeAgencyID"),
            financial_card: None,
        });
    }
    let nodes_of = |step: &str| -> Vec<_> { means.iter().flat_map(|m| Q.nodes(*m, step)).collect() };
    desc.creditor_bank_accounts = pair_bank_accounts(
        &Q,
        &nodes_of("ram:PayeePartyCreditorFinancialAccount"),
        &nodes_of("ram:PayeeSpecifiedCreditorFinancialInstitution"),
    );
    desc.debitor_bank_accounts = pair_bank_accounts(
        &Q,
        &nodes_of("ram:PayerPartyDebtorFinancialAccount"),
        &nodes_of("ram:PayerSpecifiedDebtorFinancialInstitution"),
    );

    desc.taxes = Q
        .nodes(settlement, "ram:ApplicableTradeTax")
        .into_iter()
        .map(|t| Tax {
            type_code: Q.code(t, "ram:TypeCode").unwrap_or_default(),
            category_code: Q.code(t, "ram:CategoryCode").unwrap_or_default(),
            percent: Q.decimal_or_zero(t, "ram:ApplicablePercent"),
            basis_amount: Q.decimal_or_zero(t, "ram:BasisAmount"),
            tax_amount: Q.decimal_or_zero(t, "ram:CalculatedAmount"),
            exemption_reason: Q.text(t, "ram:ExemptionReason"),
            ..Tax::default()
        })
        .collect();
    desc.billing_period = parse_billing_period(&Q, settlement, "ram:BillingSpecifiedPeriod")?;
    desc.trade_allowance_charges = Q
        .nodes(settlement, "ram:SpecifiedTradeAllowanceCharge")
        .into_iter()
        .map(|n| parse_allowance_charge(&Q, n, Some(desc.currency), "ram:ApplicablePercent"))
        .collect();
    desc.service_charges = Q
        .nodes(settlement, "ram:SpecifiedLogisticsServiceCharge")
        .into_iter()
        .map(|n| ServiceCharge {
            description: Q.string(n, "ram:Description"),
            amount: Q.decimal_or_zero(n, "ram:AppliedAmount"),
            tax: Q.node(n, "ram:AppliedTradeTax").map(|t| Tax {
                type_code: Q.code(t, "ram:TypeCode").unwrap_or_default(),
                category_code: Q.code(t, "ram:CategoryCode").unwrap_or_default(),
                percent: Q.decimal_or_zero(t, "ram:ApplicablePercent"),
                ..Tax::default()
            }),
        })
        .collect();

    for node in Q.nodes(settlement, "ram:SpecifiedTradePaymentTerms") {
        let mut terms = PaymentTerms {
            description: Q.text(node, "ram:Description"),
            due_date: Q.date(node, "ram:DueDateDateTime/udt:DateTimeString")?,
            ..PaymentTerms::default()
        };
        if let Some(discount) = Q.node(node, "ram:ApplicableTradePaymentDiscountTerms") {
            terms.terms_type = Some(PaymentTermsType::Discount);
            terms.due_days = Q.decimal(discount, "ram:BasisPeriodMeasure").and_then(|d| d.trunc().to_u32());
            terms.basis_amount = Q.decimal(discount, "ram:BasisAmount");
            terms.percentage = Q.decimal(discount, "ram:CalculationPercent");
            terms.actual_amount = Q.decimal(discount, "ram:ActualDiscountAmount");
        }
        desc.payment_terms.push(terms);
    }

    if let Some(sum) = Q.node(settlement, "ram:SpecifiedTradeSettlementMonetarySummation") {
        desc.totals = MonetarySummation {
            line_total_amount: Q.decimal(sum, "ram:LineTotalAmount"),
            charge_total_amount: Q.decimal(sum, "ram:ChargeTotalAmount"),
            allowance_total_amount: Q.decimal(sum, "ram:AllowanceTotalAmount"),
            tax_basis_amount: Q.decimal(sum, "ram:TaxBasisTotalAmount"),
            tax_total_amount: Q.decimal(sum, "ram:TaxTotalAmount"),
            grand_total_amount: Q.decimal(sum, "ram:GrandTotalAmount"),
            total_prepaid_amount: Q.decimal(sum, "ram:TotalPrepaidAmount"),
            due_payable_amount: Q.decimal(sum, "ram:DuePayableAmount"),
            ..MonetarySummation::default()
        };
    }
    desc.receivable_accounting_accounts =
        parse_accounting_accounts(&Q, settlement, "ram:ReceivableSpecifiedTradeAccountingAccount");
    Ok(())
}

fn read_line(node: Node<'_, '_>) -> Result<TradeLineItem, ZugferdError> {
    let mut line = TradeLineItem {
        line_id: Q.string(node, "ram:AssociatedDocumentLineDocument/ram:LineID"),
        notes: parse_notes(&Q, node, "ram:AssociatedDocumentLineDocument/ram:IncludedNote"),
        ..TradeLineItem::default()
    };

    if let Some(agreement) = Q.node(node, "ram:SpecifiedSupplyChainTradeAgreement") {
        line.buyer_order_referenced_document =
            parse_referenced_document(&Q, agreement, "ram:BuyerOrderReferencedDocument", &V1_REFERENCE)?;
        line.contract_referenced_document =
            parse_referenced_document(&Q, agreement, "ram:ContractReferencedDocument", &V1_REFERENCE)?;
        line.additional_referenced_documents =
            parse_referenced_documents(&Q, agreement, "ram:AdditionalReferencedDocument", &V1_REFERENCE)?;
        line.gross_unit_price = Q.decimal(agreement, "ram:GrossPriceProductTradePrice/ram:ChargeAmount");
        line.net_unit_price = Q.decimal(agreement, "ram:NetPriceProductTradePrice/ram:ChargeAmount");
        line.unit_quantity = Q
            .decimal(agreement, "ram:NetPriceProductTradePrice/ram:BasisQuantity")
            .or_else(|| Q.decimal(agreement, "ram:GrossPriceProductTradePrice/ram:BasisQuantity"));
        line.price_allowance_charges = Q
            .nodes(agreement, "ram:GrossPriceProductTradePrice/ram:AppliedTradeAllowanceCharge")
            .into_iter()
            .map(|n| parse_allowance_charge(&Q, n, None, "ram:ApplicablePercent"))
            .collect();
    }

    if let Some(delivery) = Q.node(node, "ram:SpecifiedSupplyChainTradeDelivery") {
        line.billed_quantity = Q.decimal_or_zero(delivery, "ram:BilledQuantity");
        line.unit_code = Q.code_attribute(delivery, "ram:BilledQuantity", "unitCode");
        line.delivery_note_referenced_document =
            parse_referenced_document(&Q, delivery, "ram:DeliveryNoteReferencedDocument", &V1_REFERENCE)?;
    }

    if let Some(settlement) = Q.node(node, "ram:SpecifiedSupplyChainTradeSettlement") {
        if let Some(tax) = Q.node(settlement, "ram:ApplicableTradeTax") {
            line.tax_type = Q.code(tax, "ram:TypeCode").unwrap_or_default();
            line.tax_category_code = Q.code(tax, "ram:CategoryCode").unwrap_or_default();
            line.tax_percent = Q.decimal_or_zero(tax, "ram:ApplicablePercent");
            line.tax_exemption_reason = Q.text(tax, "ram:ExemptionReason");
        }
        line.billing_period = parse_billing_period(&Q, settlement, "ram:BillingSpecifiedPeriod")?;
        line.line_total_amount = Q.decimal(
            settlement,
            "ram:SpecifiedTradeSettlementMonetarySummation/ram:LineTotalAmount",
        );
    }

    if let Some(product) = Q.node(node, "ram:SpecifiedTradeProduct") {
        line.global_id = Q.schemed_id(product, "ram:GlobalID");
        line.seller_assigned_id = Q.text(product, "ram:SellerAssignedID");
        line.buyer_assigned_id = Q.text(product, "ram:BuyerAssignedID");
        line.name = Q.string(product, "ram:Name");
        line.description = Q.text(product, "ram:Description");
        line.product_characteristics = Q
            .nodes(product, "ram:ApplicableProductCharacteristic")
            .into_iter()
            .map(|c| ProductCharacteristic {
                type_code: Q.text(c, "ram:TypeCode"),
                description: Q.string(c, "ram:Description"),
                value: Q.string(c, "ram:Value"),
            })
            .collect();
        line.origin_country = Q.code(product, "ram:OriginTradeCountry/ram:ID");
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::CurrencyCode;
    use rust_decimal_macros::dec;

    const MINIMAL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rsm:CrossIndustryDocument xmlns:rsm="urn:ferd:CrossIndustryDocument:invoice:1p0"
    xmlns:ram="urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:12"
    xmlns:udt="urn:un:unece:uncefact:data:standard:UnqualifiedDataType:15">
  <rsm:SpecifiedExchangedDocumentContext>
    <ram:GuidelineSpecifiedDocumentContextParameter>
      <ram:ID>urn:ferd:CrossIndustryDocument:invoice:1p0:comfort</ram:ID>
    </ram:GuidelineSpecifiedDocumentContextParameter>
  </rsm:SpecifiedExchangedDocumentContext>
  <rsm:HeaderExchangedDocument>
    <ram:ID>471102</ram:ID>
    <ram:TypeCode>380</ram:TypeCode>
    <ram:IssueDateTime><udt:DateTimeString format="102">20130305</udt:DateTimeString></ram:IssueDateTime>
  </rsm:HeaderExchangedDocument>
  <rsm:SpecifiedSupplyChainTradeTransaction>
    <ram:ApplicableSupplyChainTradeAgreement>
      <ram:BuyerOrderReferencedDocument>
        <ram:IssueDateTime>2013-03-01T00:00:00</ram:IssueDateTime>
        <ram:ID>AB-312</ram:ID>
      </ram:BuyerOrderReferencedDocument>
    </ram:ApplicableSupplyChainTradeAgreement>
    <ram:ApplicableSupplyChainTradeSettlement>
      <ram:InvoiceCurrencyCode>EUR</ram:InvoiceCurrencyCode>
      <ram:SpecifiedTradeSettlementPaymentMeans>
        <ram:TypeCode>59</ram:TypeCode>
        <ram:ID schemeAgencyID="REF-0815">DE98ZZZ09999999999</ram:ID>
      </ram:SpecifiedTradeSettlementPaymentMeans>
      <ram:ApplicableTradeTax>
        <ram:CalculatedAmount currencyID="EUR">19.25</ram:CalculatedAmount>
        <ram:TypeCode>VAT</ram:TypeCode>
        <ram:BasisAmount currencyID="EUR">275.00</ram:BasisAmount>
        <ram:CategoryCode>S</ram:CategoryCode>
        <ram:ApplicablePercent>7.00</ram:ApplicablePercent>
      </ram:ApplicableTradeTax>
    </ram:ApplicableSupplyChainTradeSettlement>
    <ram:IncludedSupplyChainTradeLineItem>
      <ram:AssociatedDocumentLineDocument><ram:LineID>1</ram:LineID></ram:AssociatedDocumentLineDocument>
      <ram:SpecifiedSupplyChainTradeDelivery>
        <ram:BilledQuantity unitCode="C62">20.0000</ram:BilledQuantity>
      </ram:SpecifiedSupplyChainTradeDelivery>
      <ram:SpecifiedTradeProduct><ram:Name>Trennblätter A4</ram:Name></ram:SpecifiedTradeProduct>
    </ram:IncludedSupplyChainTradeLineItem>
  </rsm:SpecifiedSupplyChainTradeTransaction>
</rsm:CrossIndustryDocument>"#;

    #[test]
    fn reads_minimal_document() {
        let desc = CiiVersion1Reader.parse_str(MINIMAL).unwrap();
        assert_eq!(desc.profile, Profile::COMFORT);
        assert_eq!(desc.invoice_no, "471102");
        assert_eq!(desc.currency, CurrencyCode::Eur);
        let order = desc.buyer_order_referenced_document.unwrap();
        assert_eq!(order.id, "AB-312");
        assert_eq!(order.issue_date, chrono::NaiveDate::from_ymd_opt(2013, 3, 1));
        assert_eq!(desc.taxes[0].percent, dec!(7.00));

        let means = desc.payment_means.unwrap();
        assert_eq!(means.sepa_creditor_identifier.as_deref(), Some("DE98ZZZ09999999999"));
        assert_eq!(means.sepa_mandate_reference.as_deref(), Some("REF-0815"));

        assert_eq!(desc.trade_line_items.len(), 1);
        assert_eq!(desc.trade_line_items[0].name, "Trennblätter A4");
        assert_eq!(desc.trade_line_items[0].billed_quantity, dec!(20));
        assert!(desc.seller.is_none());
    }

    #[test]
    fn wrong_root_is_missing_node() {
        let xml = r#"<rsm:CrossIndustryInvoice xmlns:rsm="urn:ferd:CrossIndustryDocument:invoice:1p0"/>"#;
        assert!(matches!(
            CiiVersion1Reader.parse_str(xml),
            Err(ZugferdError::MissingNode(_))
        ));
    }
}
