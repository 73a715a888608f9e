use roxmltree::{Document, Node};
use rust_decimal::prelude::ToPrimitive;

use super::NAMESPACES;
use super::common::*;
use crate::codes::{CodeList, CurrencyCode};
use crate::core::*;
use crate::io::InvoiceReader;
use crate::xml::XmlQuery;

/// Reader for ZUGFeRD 2.1–2.3, Factur-X and XRechnung CII documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct CiiVersion23Reader;

const Q: XmlQuery = XmlQuery::new(NAMESPACES);

impl InvoiceReader for CiiVersion23Reader {
    fn identifiers(&self) -> Vec<&'static str> {
        Profile::identifiers(ZugferdVersion::Version23).collect()
    }

    fn parse(&self, doc: &Document<'_>) -> Result<InvoiceDescriptor, ZugferdError> {
        let root = doc.root_element();
        if !Q.is(root, "rsm:CrossIndustryInvoice") {
            return Err(ZugferdError::MissingNode("rsm:CrossIndustryInvoice".into()));
        }
        let tx = Q
            .node(root, "rsm:SupplyChainTradeTransaction")
            .ok_or_else(|| ZugferdError::MissingNode("rsm:SupplyChainTradeTransaction".into()))?;

        let mut desc = InvoiceDescriptor::default();
        read_header(root, &mut desc)?;
        read_agreement(tx, &mut desc)?;
        read_delivery(tx, &mut desc)?;
        read_settlement(tx, &mut desc)?;

        for line in Q.nodes(tx, "ram:IncludedSupplyChainTradeLineItem") {
            desc.trade_line_items.push(read_line(line)?);
        }

        tracing::debug!(
            invoice_no = %desc.invoice_no,
            profile = %desc.profile,
            lines = desc.trade_line_items.len(),
            "CII 2.x document read"
        );
        Ok(desc)
    }
}

fn read_header(root: Node<'_, '_>, desc: &mut InvoiceDescriptor) -> Result<(), ZugferdError> {
    let context = Q.node(root, "rsm:ExchangedDocumentContext");
    if let Some(ctx) = context {
        desc.is_test = Q.boolean(ctx, "ram:TestIndicator/udt:Indicator");
        desc.business_process = Q.text(ctx, "ram:BusinessProcessSpecifiedDocumentContextParameter/ram:ID");
        desc.profile = Profile::from_identifier(
            &Q.string(ctx, "ram:GuidelineSpecifiedDocumentContextParameter/ram:ID"),
            ZugferdVersion::Version23,
        );
    }

    if let Some(header) = Q.node(root, "rsm:ExchangedDocument") {
        desc.invoice_no = Q.string(header, "ram:ID");
        desc.name = Q.text(header, "ram:Name");
        desc.invoice_type = Q.code(header, "ram:TypeCode").unwrap_or_default();
        desc.invoice_date = Q.date(header, "ram:IssueDateTime/udt:DateTimeString")?;
        desc.notes = parse_notes(&Q, header, "ram:IncludedNote");
    }
    Ok(())
}

fn read_agreement(tx: Node<'_, '_>, desc: &mut InvoiceDescriptor) -> Result<(), ZugferdError> {
    let Some(agreement) = Q.node(tx, "ram:ApplicableHeaderTradeAgreement") else {
        return Ok(());
    };
    desc.buyer_reference = Q.text(agreement, "ram:BuyerReference");
    desc.seller = parse_party(&Q, agreement, "ram:SellerTradeParty");
    desc.buyer = parse_party(&Q, agreement, "ram:BuyerTradeParty");
    desc.seller_tax_representative = parse_party(&Q, agreement, "ram:SellerTaxRepresentativeTradeParty");

    desc.seller_order_referenced_document =
        parse_referenced_document(&Q, agreement, "ram:SellerOrderReferencedDocument", &V2_REFERENCE)?;
    desc.buyer_order_referenced_document =
        parse_referenced_document(&Q, agreement, "ram:BuyerOrderReferencedDocument", &V2_REFERENCE)?;
    desc.contract_referenced_document =
        parse_referenced_document(&Q, agreement, "ram:ContractReferencedDocument", &V2_REFERENCE)?;
    desc.additional_referenced_documents =
        parse_referenced_documents(&Q, agreement, "ram:AdditionalReferencedDocument", &V2_REFERENCE)?;

    desc.specified_procuring_project = Q
        .node(agreement, "ram:SpecifiedProcuringProject")
        .map(|p| ProcuringProject {
            id: Q.string(p, "ram:ID"),
            name: Q.string(p, "ram:Name"),
        });
    Ok(())
}

fn read_delivery(tx: Node<'_, '_>, desc: &mut InvoiceDescriptor) -> Result<(), ZugferdError> {
    let Some(delivery) = Q.node(tx, "ram:ApplicableHeaderTradeDelivery") else {
        return Ok(());
    };
    desc.ship_to = parse_party(&Q, delivery, "ram:ShipToTradeParty");
    desc.ultimate_ship_to = parse_party(&Q, delivery, "ram:UltimateShipToTradeParty");
    desc.ship_from = parse_party(&Q, delivery, "ram:ShipFromTradeParty");
    desc.actual_delivery_date = Q.date(
        delivery,
        "ram:ActualDeliverySupplyChainEvent/ram:OccurrenceDateTime/udt:DateTimeString",
    )?;
    desc.despatch_advice_referenced_document =
        parse_referenced_document(&Q, delivery, "ram:DespatchAdviceReferencedDocument", &V2_REFERENCE)?;
    desc.delivery_note_referenced_document = delivery_note(delivery, "ram:DeliveryNoteReferencedDocument")?;
    Ok(())
}

/// Delivery note reference. The date is looked up under
/// `ram:IssueDateTime` first, then under `ram:FormattedIssueDateTime`.
fn delivery_note(from: Node<'_, '_>, path: &str) -> Result<Option<ReferencedDocument>, ZugferdError> {
    let Some(mut doc) = parse_referenced_document(&Q, from, path, &DELIVERY_NOTE_REFERENCE)? else {
        return Ok(None);
    };
    if doc.issue_date.is_none() {
        if let Some(node) = Q.node(from, path) {
            doc.issue_date = Q.date(node, V2_REFERENCE.date)?;
        }
    }
    Ok(Some(doc))
}

const DELIVERY_NOTE_REFERENCE: ReferenceLayout = ReferenceLayout {
    id: V2_REFERENCE.id,
    date: "ram:IssueDateTime/udt:DateTimeString",
};

fn read_settlement(tx: Node<'_, '_>, desc: &mut InvoiceDescriptor) -> Result<(), ZugferdError> {
    let Some(settlement) = Q.node(tx, "ram:ApplicableHeaderTradeSettlement") else {
        return Ok(());
    };
    desc.payment_reference = Q.text(settlement, "ram:PaymentReference");
    desc.currency = Q.code(settlement, "ram:InvoiceCurrencyCode").unwrap_or_default();
    desc.tax_currency = Q.code(settlement, "ram:TaxCurrencyCode");
    desc.invoicer = parse_party(&Q, settlement, "ram:InvoicerTradeParty");
    desc.invoicee = parse_party(&Q, settlement, "ram:InvoiceeTradeParty");
    desc.payee = parse_party(&Q, settlement, "ram:PayeeTradeParty");

    read_payment_means(settlement, desc);

    desc.taxes = Q
        .nodes(settlement, "ram:ApplicableTradeTax")
        .into_iter()
        .map(read_header_tax)
        .collect();
    desc.billing_period = parse_billing_period(&Q, settlement, "ram:BillingSpecifiedPeriod")?;
    desc.trade_allowance_charges = Q
        .nodes(settlement, "ram:SpecifiedTradeAllowanceCharge")
        .into_iter()
        .map(|n| parse_allowance_charge(&Q, n, Some(desc.currency), "ram:RateApplicablePercent"))
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
                percent: Q.decimal_or_zero(t, "ram:RateApplicablePercent"),
                ..Tax::default()
            }),
        })
        .collect();

    read_payment_terms(settlement, desc)?;
    read_summation(settlement, desc);

    desc.invoice_referenced_documents =
        parse_referenced_documents(&Q, settlement, "ram:InvoiceReferencedDocument", &V2_REFERENCE)?;
    desc.receivable_accounting_accounts =
        parse_accounting_accounts(&Q, settlement, "ram:ReceivableSpecifiedTradeAccountingAccount");
    Ok(())
}

fn read_payment_means(settlement: Node<'_, '_>, desc: &mut InvoiceDescriptor) {
    let means = Q.nodes(settlement, "ram:SpecifiedTradeSettlementPaymentMeans");
    let creditor_id = Q.text(settlement, "ram:CreditorReferenceID");

    if let Some(first) = means.first() {
        desc.payment_means = Some(PaymentMeans {
            type_code: Q.code(*first, "ram:TypeCode").unwrap_or_default(),
            information: Q.text(*first, "ram:Information"),
            sepa_creditor_identifier: creditor_id,
            sepa_mandate_reference: None,
            financial_card: Q
                .node(*first, "ram:ApplicableTradeSettlementFinancialCard")
                .map(|c| FinancialCard {
                    id: Q.string(c, "ram:ID"),
                    cardholder_name: Q.text(c, "ram:CardholderName"),
                }),
        });
    } else if creditor_id.is_some() {
        desc.payment_means = Some(PaymentMeans {
            sepa_creditor_identifier: creditor_id,
            ..PaymentMeans::default()
        });
    }

    let creditor: Vec<_> = means
        .iter()
        .flat_map(|m| Q.nodes(*m, "ram:PayeePartyCreditorFinancialAccount"))
        .collect();
    let creditor_institutions: Vec<_> = means
        .iter()
        .flat_map(|m| Q.nodes(*m, "ram:PayeeSpecifiedCreditorFinancialInstitution"))
        .collect();
    desc.creditor_bank_accounts = pair_bank_accounts(&Q, &creditor, &creditor_institutions);

    // 2.1+ has no debtor institution.
    let debitor: Vec<_> = means
        .iter()
        .flat_map(|m| Q.nodes(*m, "ram:PayerPartyDebtorFinancialAccount"))
        .collect();
    desc.debitor_bank_accounts = pair_bank_accounts(&Q, &debitor, &[]);
}

fn read_header_tax(node: Node<'_, '_>) -> Tax {
    Tax {
        type_code: Q.code(node, "ram:TypeCode").unwrap_or_default(),
        category_code: Q.code(node, "ram:CategoryCode").unwrap_or_default(),
        percent: Q.decimal_or_zero(node, "ram:RateApplicablePercent"),
        basis_amount: Q.decimal_or_zero(node, "ram:BasisAmount"),
        tax_amount: Q.decimal_or_zero(node, "ram:CalculatedAmount"),
        exemption_reason: Q.text(node, "ram:ExemptionReason"),
        exemption_reason_code: Q.code(node, "ram:ExemptionReasonCode"),
        allowance_charge_basis_amount: Q.decimal(node, "ram:AllowanceChargeBasisAmount"),
        line_total_basis_amount: Q.decimal(node, "ram:LineTotalBasisAmount"),
    }
}

fn read_payment_terms(settlement: Node<'_, '_>, desc: &mut InvoiceDescriptor) -> Result<(), ZugferdError> {
    for node in Q.nodes(settlement, "ram:SpecifiedTradePaymentTerms") {
        if let Some(mandate) = Q.text(node, "ram:DirectDebitMandateID") {
            desc.payment_means
                .get_or_insert_with(PaymentMeans::default)
                .sepa_mandate_reference = Some(mandate);
        }

        let mut terms = PaymentTerms {
            description: Q.text(node, "ram:Description"),
            due_date: Q.date(node, "ram:DueDateDateTime/udt:DateTimeString")?,
            ..PaymentTerms::default()
        };
        if let Some(discount) = Q.node(node, "ram:ApplicableTradePaymentDiscountTerms") {
            terms.terms_type = Some(PaymentTermsType::Discount);
            terms.due_days = Q.decimal(discount, "ram:BasisPeriodMeasure").and_then(|d| d.trunc().to_u32());
            terms.percentage = Q.decimal(discount, "ram:CalculationPercent");
            terms.basis_amount = Q.decimal(discount, "ram:BasisAmount");
            terms.actual_amount = Q.decimal(discount, "ram:ActualDiscountAmount");
        } else if let Some(penalty) = Q.node(node, "ram:ApplicableTradePaymentPenaltyTerms") {
            terms.terms_type = Some(PaymentTermsType::Penalty);
            terms.due_days = Q.decimal(penalty, "ram:BasisPeriodMeasure").and_then(|d| d.trunc().to_u32());
            terms.percentage = Q.decimal(penalty, "ram:CalculationPercent");
            terms.basis_amount = Q.decimal(penalty, "ram:BasisAmount");
            terms.actual_amount = Q.decimal(penalty, "ram:ActualPenaltyAmount");
        }
        desc.payment_terms.push(terms);
    }
    Ok(())
}

fn read_summation(settlement: Node<'_, '_>, desc: &mut InvoiceDescriptor) {
    let Some(sum) = Q.node(settlement, "ram:SpecifiedTradeSettlementHeaderMonetarySummation") else {
        return;
    };
    let totals = &mut desc.totals;
    totals.line_total_amount = Q.decimal(sum, "ram:LineTotalAmount");
    totals.charge_total_amount = Q.decimal(sum, "ram:ChargeTotalAmount");
    totals.allowance_total_amount = Q.decimal(sum, "ram:AllowanceTotalAmount");
    totals.tax_basis_amount = Q.decimal(sum, "ram:TaxBasisTotalAmount");
    totals.rounding_amount = Q.decimal(sum, "ram:RoundingAmount");
    totals.grand_total_amount = Q.decimal(sum, "ram:GrandTotalAmount");
    totals.total_prepaid_amount = Q.decimal(sum, "ram:TotalPrepaidAmount");
    totals.due_payable_amount = Q.decimal(sum, "ram:DuePayableAmount");

    // BT-110 and BT-111 share an element name; the currencyID tells them apart.
    let tax_currency = desc.tax_currency.filter(|c| *c != desc.currency);
    for node in Q.nodes(sum, "ram:TaxTotalAmount") {
        let amount = Q.decimal(node, ".");
        let currency = node.attribute("currencyID").map(CurrencyCode::parse);
        if tax_currency.is_some() && currency == tax_currency {
            totals.tax_total_amount_in_tax_currency = amount;
        } else if totals.tax_total_amount.is_none() {
            totals.tax_total_amount = amount;
        }
    }
}

fn read_line(node: Node<'_, '_>) -> Result<TradeLineItem, ZugferdError> {
    let mut line = TradeLineItem {
        line_id: Q.string(node, "ram:AssociatedDocumentLineDocument/ram:LineID"),
        parent_line_id: Q.text(node, "ram:AssociatedDocumentLineDocument/ram:ParentLineID"),
        notes: parse_notes(&Q, node, "ram:AssociatedDocumentLineDocument/ram:IncludedNote"),
        ..TradeLineItem::default()
    };

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
        line.product_classifications = Q
            .nodes(product, "ram:DesignatedProductClassification")
            .into_iter()
            .map(|c| ProductClassification {
                list_id: Q.code_attribute(c, "ram:ClassCode", "listID"),
                list_version_id: Q.attribute(c, "ram:ClassCode", "listVersionID"),
                class_code: Q.text(c, "ram:ClassCode"),
                class_name: Q.text(c, "ram:ClassName"),
            })
            .collect();
        line.origin_country = Q.code(product, "ram:OriginTradeCountry/ram:ID");
    }

    if let Some(agreement) = Q.node(node, "ram:SpecifiedLineTradeAgreement") {
        line.buyer_order_referenced_document =
            parse_referenced_document(&Q, agreement, "ram:BuyerOrderReferencedDocument", &V2_REFERENCE)?;
        line.contract_referenced_document =
            parse_referenced_document(&Q, agreement, "ram:ContractReferencedDocument", &V2_REFERENCE)?;
        line.additional_referenced_documents =
            parse_referenced_documents(&Q, agreement, "ram:AdditionalReferencedDocument", &V2_REFERENCE)?;

        let gross = "ram:GrossPriceProductTradePrice";
        let net = "ram:NetPriceProductTradePrice";
        line.gross_unit_price = Q.decimal(agreement, &format!("{gross}/ram:ChargeAmount"));
        line.net_unit_price = Q.decimal(agreement, &format!("{net}/ram:ChargeAmount"));
        line.unit_quantity = Q
            .decimal(agreement, &format!("{net}/ram:BasisQuantity"))
            .or_else(|| Q.decimal(agreement, &format!("{gross}/ram:BasisQuantity")));
        if let Some(g) = Q.node(agreement, gross) {
            line.price_allowance_charges = Q
                .nodes(g, "ram:AppliedTradeAllowanceCharge")
                .into_iter()
                .map(|n| parse_allowance_charge(&Q, n, None, "ram:RateApplicablePercent"))
                .collect();
        }
    }

    if let Some(delivery) = Q.node(node, "ram:SpecifiedLineTradeDelivery") {
        line.billed_quantity = Q.decimal_or_zero(delivery, "ram:BilledQuantity");
        line.unit_code = Q.code_attribute(delivery, "ram:BilledQuantity", "unitCode");
        line.charge_free_quantity = Q.decimal(delivery, "ram:ChargeFreeQuantity");
        line.package_quantity = Q.decimal(delivery, "ram:PackageQuantity");
        line.ship_to = parse_party(&Q, delivery, "ram:ShipToTradeParty");
        line.actual_delivery_date = Q.date(
            delivery,
            "ram:ActualDeliverySupplyChainEvent/ram:OccurrenceDateTime/udt:DateTimeString",
        )?;
        line.delivery_note_referenced_document = delivery_note(delivery, "ram:DeliveryNoteReferencedDocument")?;
    }

    if let Some(settlement) = Q.node(node, "ram:SpecifiedLineTradeSettlement") {
        if let Some(tax) = Q.node(settlement, "ram:ApplicableTradeTax") {
            line.tax_type = Q.code(tax, "ram:TypeCode").unwrap_or_default();
            line.tax_category_code = Q.code(tax, "ram:CategoryCode").unwrap_or_default();
            line.tax_percent = Q.decimal_or_zero(tax, "ram:RateApplicablePercent");
            line.tax_exemption_reason = Q.text(tax, "ram:ExemptionReason");
        }
        line.billing_period = parse_billing_period(&Q, settlement, "ram:BillingSpecifiedPeriod")?;
        line.allowance_charges = Q
            .nodes(settlement, "ram:SpecifiedTradeAllowanceCharge")
            .into_iter()
            .map(|n| parse_allowance_charge(&Q, n, None, "ram:RateApplicablePercent"))
            .collect();
        line.line_total_amount = Q.decimal(
            settlement,
            "ram:SpecifiedTradeSettlementLineMonetarySummation/ram:LineTotalAmount",
        );
        line.receivable_accounting_accounts =
            parse_accounting_accounts(&Q, settlement, "ram:ReceivableSpecifiedTradeAccountingAccount");
    }
    Ok(line)
}
