#![cfg(feature = "ubl")]

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use zugferd::codes::{
    CountryCode, CurrencyCode, InvoiceType, PaymentMeansType, QuantityCode, TaxCategoryCode, TaxRegistrationScheme,
};
use zugferd::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn invoice(invoice_type: InvoiceType) -> InvoiceDescriptor {
    let mut desc = InvoiceBuilder::new("RE-2024-100", date(2024, 5, 2), CurrencyCode::Eur)
        .profile(Profile::XRECHNUNG)
        .invoice_type(invoice_type)
        .business_process("urn:fdc:peppol.eu:2017:poacc:billing:01:1.0")
        .buyer_reference("991-01484-64")
        .note("Leistungszeitraum April 2024")
        .seller(
            PartyBuilder::new("Muster Software GmbH")
                .address("Hauptstraße 1", "10115", "Berlin", CountryCode::De)
                .vat_id("DE123456789")
                .contact(Some("Erika Muster"), Some("+49 30 1234"), Some("erika@muster.de"))
                .build(),
        )
        .buyer(
            PartyBuilder::new("Stadtverwaltung Beispielstadt")
                .address("Rathausplatz 1", "50667", "Köln", CountryCode::De)
                .build(),
        )
        .order("PO-77", None)
        .add_line(
            LineItemBuilder::new("1", "Wartung", dec!(8), dec!(95))
                .unit(QuantityCode::Hour)
                .tax(TaxCategoryCode::StandardRate, dec!(19))
                .build(),
        )
        .add_tax(dec!(760), dec!(19), TaxCategoryCode::StandardRate)
        .payment_means(PaymentMeansType::SepaCreditTransfer, None)
        .add_creditor_account("DE02120300000000202051", Some("BYLADEM1001"))
        .payment_terms("Zahlbar binnen 14 Tagen", Some(date(2024, 5, 16)))
        .build();
    desc.totals = MonetarySummation {
        line_total_amount: Some(dec!(760.00)),
        tax_basis_amount: Some(dec!(760.00)),
        tax_total_amount: Some(dec!(144.40)),
        grand_total_amount: Some(dec!(904.40)),
        due_payable_amount: Some(dec!(904.40)),
        ..MonetarySummation::default()
    };
    desc
}

#[test]
fn cii_to_ubl_to_model() {
    let original = invoice(InvoiceType::Invoice);
    let cii = original.to_xml(ZugferdVersion::Version23, ZugferdFormat::Cii).unwrap();
    let from_cii = InvoiceDescriptor::load_str(&cii).unwrap();

    let ubl = from_cii.to_xml(ZugferdVersion::Version23, ZugferdFormat::Ubl).unwrap();
    assert!(ubl.contains("<ubl:Invoice"));
    assert!(ubl.contains("<cbc:DueDate>2024-05-16</cbc:DueDate>"));

    let mut cursor = std::io::Cursor::new(ubl.into_bytes());
    assert_eq!(detect(&mut cursor).unwrap(), DocumentKind::Ubl);
    let back = InvoiceDescriptor::load(&mut cursor).unwrap();

    assert_eq!(back.profile, Profile::XRECHNUNG);
    assert_eq!(back.invoice_no, "RE-2024-100");
    assert_eq!(back.invoice_date, Some(date(2024, 5, 2)));
    assert_eq!(back.invoice_type, InvoiceType::Invoice);
    assert_eq!(back.business_process, original.business_process);
    assert_eq!(back.buyer_reference.as_deref(), Some("991-01484-64"));
    assert_eq!(back.notes[0].content, "Leistungszeitraum April 2024");

    let seller = back.seller.as_ref().unwrap();
    assert_eq!(seller.name, "Muster Software GmbH");
    assert_eq!(seller.city.as_deref(), Some("Berlin"));
    assert_eq!(seller.country, Some(CountryCode::De));
    assert_eq!(seller.tax_registration(TaxRegistrationScheme::VatId), Some("DE123456789"));
    assert_eq!(back.buyer.as_ref().map(|b| b.name.as_str()), Some("Stadtverwaltung Beispielstadt"));
    assert_eq!(back.buyer_order_referenced_document.as_ref().map(|o| o.id.as_str()), Some("PO-77"));

    let line = &back.trade_line_items[0];
    assert_eq!(line.name, "Wartung");
    assert_eq!(line.billed_quantity, dec!(8));
    assert_eq!(line.unit_code, Some(QuantityCode::Hour));
    assert_eq!(line.net_unit_price, Some(dec!(95)));
    assert_eq!(line.line_total_amount, Some(dec!(760)));

    assert_eq!(back.taxes.len(), 1);
    assert_eq!(back.taxes[0].tax_amount, dec!(144.40));
    assert_eq!(back.taxes[0].category_code, TaxCategoryCode::StandardRate);
    assert_eq!(back.creditor_bank_accounts[0].iban.as_deref(), Some("DE02120300000000202051"));
    assert_eq!(back.creditor_bank_accounts[0].bic.as_deref(), Some("BYLADEM1001"));
    assert_eq!(back.payment_terms[0].due_date, Some(date(2024, 5, 16)));
    assert_eq!(back.totals.due_payable_amount, Some(dec!(904.40)));
    assert_eq!(back.totals.tax_total_amount, Some(dec!(144.40)));
}

#[test]
fn credit_note_selects_root_and_line_names() {
    let xml = invoice(InvoiceType::CreditNote)
        .to_xml(ZugferdVersion::Version23, ZugferdFormat::Ubl)
        .unwrap();

    assert!(xml.contains("<ubl:CreditNote"));
    assert!(xml.contains("urn:oasis:names:specification:ubl:schema:xsd:CreditNote-2"));
    assert!(xml.contains("<cbc:CreditNoteTypeCode>381</cbc:CreditNoteTypeCode>"));
    assert!(xml.contains("<cac:CreditNoteLine>"));
    assert!(xml.contains(r#"<cbc:CreditedQuantity unitCode="HUR">8.0000</cbc:CreditedQuantity>"#));
    assert!(!xml.contains("InvoiceLine"));
    assert!(!xml.contains("<cbc:DueDate>"));
    assert!(xml.contains("<cbc:PaymentDueDate>2024-05-16</cbc:PaymentDueDate>"));

    let back = InvoiceDescriptor::load_str(&xml).unwrap();
    assert_eq!(back.invoice_type, InvoiceType::CreditNote);
    assert_eq!(back.trade_line_items.len(), 1);
    assert_eq!(back.trade_line_items[0].billed_quantity, dec!(8));
    assert_eq!(back.payment_terms[0].due_date, Some(date(2024, 5, 16)));
    assert_eq!(back.payment_terms[0].description.as_deref(), Some("Zahlbar binnen 14 Tagen"));
}

#[test]
fn roles_without_ubl_counterpart_are_dropped() {
    let mut desc = invoice(InvoiceType::Invoice);
    desc.invoicer = Some(PartyBuilder::new("Rechnungssteller KG").build());
    desc.invoicee = Some(PartyBuilder::new("Rechnungsempfänger e.V.").build());
    desc.ship_from = Some(PartyBuilder::new("Lager Nord").build());
    desc.ultimate_ship_to = Some(PartyBuilder::new("Endkunde").build());
    desc.payee = Some(PartyBuilder::new("Factoring AG").build());

    let xml = desc.to_xml(ZugferdVersion::Version23, ZugferdFormat::Ubl).unwrap();
    assert!(!xml.contains("Rechnungssteller KG"));
    assert!(!xml.contains("Rechnungsempfänger e.V."));
    assert!(!xml.contains("Lager Nord"));
    assert!(!xml.contains("Endkunde"));
    assert!(xml.contains("Factoring AG"));

    let back = InvoiceDescriptor::load_str(&xml).unwrap();
    assert!(back.invoicer.is_none());
    assert!(back.invoicee.is_none());
    assert!(back.ship_from.is_none());
    assert_eq!(back.payee.map(|p| p.name), Some("Factoring AG".to_string()));
}

#[test]
fn ubl_writer_needs_an_en16931_profile() {
    let mut desc = invoice(InvoiceType::Invoice);
    desc.profile = Profile::BASIC;
    let err = desc.to_xml(ZugferdVersion::Version23, ZugferdFormat::Ubl).unwrap_err();
    assert!(matches!(err, ZugferdError::UnsupportedProfile { .. }));

    let err = invoice(InvoiceType::Invoice)
        .to_xml(ZugferdVersion::Version20, ZugferdFormat::Ubl)
        .unwrap_err();
    assert!(matches!(
        err,
        ZugferdError::UnsupportedFormat {
            format: ZugferdFormat::Ubl,
            ..
        }
    ));
}

#[test]
fn attachment_round_trips_through_ubl() {
    let payload = b"%PDF-1.7 fake report".to_vec();
    let mut desc = invoice(InvoiceType::Invoice);
    desc.add_attachment("Anlage-1", Some("Leistungsnachweis"), "invoice.pdf", payload.clone());

    let xml = desc.to_xml(ZugferdVersion::Version23, ZugferdFormat::Ubl).unwrap();
    assert!(xml.contains(r#"mimeCode="application/pdf""#));

    let back = InvoiceDescriptor::load_str(&xml).unwrap();
    let doc = &back.additional_referenced_documents[0];
    assert_eq!(doc.id, "Anlage-1");
    assert_eq!(doc.filename.as_deref(), Some("invoice.pdf"));
    assert_eq!(doc.attachment.as_deref(), Some(payload.as_slice()));
}

#[test]
fn tax_total_overflow_is_an_error() {
    let mut desc = invoice(InvoiceType::Invoice);
    desc.totals.tax_total_amount = None;
    desc.taxes[0].tax_amount = rust_decimal::Decimal::MAX;
    desc.taxes.push(desc.taxes[0].clone());

    let err = desc.to_xml(ZugferdVersion::Version23, ZugferdFormat::Ubl).unwrap_err();
    assert!(matches!(err, ZugferdError::Overflow(_)));
}
