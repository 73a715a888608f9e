use std::io::{Cursor, Seek, SeekFrom, Write};

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use zugferd::codes::{
    CodeList, CountryCode, CurrencyCode, DocumentTypeCode, PaymentMeansType, QuantityCode, SubjectCode,
    TaxCategoryCode, TaxRegistrationScheme,
};
use zugferd::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seller() -> Party {
    PartyBuilder::new("Lieferant GmbH")
        .address("Lieferantenstraße 20", "80333", "München", CountryCode::De)
        .vat_id("DE123456789")
        .tax_number("201/113/40209")
        .contact(Some("Hans Muster"), Some("+49 89 12345"), Some("hans@lieferant.de"))
        .build()
}

fn buyer() -> Party {
    PartyBuilder::new("Kunden AG Mitte")
        .id("GE2020211")
        .address("Kundenstraße 15", "69876", "Frankfurt", CountryCode::De)
        .build()
}

fn invoice(profile: Profile) -> InvoiceDescriptor {
    let mut desc = InvoiceBuilder::new("471102", date(2024, 3, 5), CurrencyCode::Eur)
        .profile(profile)
        .note_with_subject("Es bestehen Rabatt- oder Bonusvereinbarungen.", SubjectCode::GeneralInformation)
        .buyer_reference("04011000-12345-34")
        .seller(seller())
        .buyer(buyer())
        .order("ORDER-84637", Some(date(2024, 2, 20)))
        .actual_delivery_date(date(2024, 3, 1))
        .add_line(
            LineItemBuilder::new("1", "Trennblätter A4", dec!(20), dec!(9.90))
                .unit(QuantityCode::Piece)
                .seller_assigned_id("TB100A4")
                .tax(TaxCategoryCode::StandardRate, dec!(19))
                .build(),
        )
        .add_line(
            LineItemBuilder::new("2", "Joghurt Banane", dec!(50), dec!(5.50))
                .unit(QuantityCode::Piece)
                .tax(TaxCategoryCode::StandardRate, dec!(7))
                .build(),
        )
        .add_tax(dec!(198.00), dec!(19), TaxCategoryCode::StandardRate)
        .add_tax(dec!(275.00), dec!(7), TaxCategoryCode::StandardRate)
        .payment_means(PaymentMeansType::SepaCreditTransfer, Some("Überweisung"))
        .add_creditor_account("DE02120300000000202051", Some("BYLADEM1001"))
        .payment_terms("Zahlbar innerhalb 30 Tagen netto", Some(date(2024, 4, 4)))
        .build();
    desc.totals = MonetarySummation {
        line_total_amount: Some(dec!(473.00)),
        charge_total_amount: Some(dec!(0.00)),
        allowance_total_amount: Some(dec!(0.00)),
        tax_basis_amount: Some(dec!(473.00)),
        tax_total_amount: Some(dec!(56.87)),
        grand_total_amount: Some(dec!(529.87)),
        total_prepaid_amount: Some(dec!(0.00)),
        due_payable_amount: Some(dec!(529.87)),
        ..MonetarySummation::default()
    };
    desc
}

fn round_trip(desc: &InvoiceDescriptor, version: ZugferdVersion) -> InvoiceDescriptor {
    let xml = desc.to_xml(version, ZugferdFormat::Cii).unwrap();
    InvoiceDescriptor::load_str(&xml).unwrap()
}

// --- Round trips ---

#[test]
fn comfort_round_trip_version23() {
    let original = invoice(Profile::COMFORT);
    let back = round_trip(&original, ZugferdVersion::Version23);

    assert_eq!(back.profile, Profile::COMFORT);
    assert_eq!(back.invoice_no, "471102");
    assert_eq!(back.invoice_date, Some(date(2024, 3, 5)));
    assert_eq!(back.currency, CurrencyCode::Eur);
    assert_eq!(back.buyer_reference.as_deref(), Some("04011000-12345-34"));
    assert_eq!(back.notes, original.notes);

    let seller = back.seller.as_ref().unwrap();
    assert_eq!(seller.name, "Lieferant GmbH");
    assert_eq!(seller.city.as_deref(), Some("München"));
    assert_eq!(seller.tax_registration(TaxRegistrationScheme::VatId), Some("DE123456789"));
    assert_eq!(seller.tax_registration(TaxRegistrationScheme::FiscalNumber), Some("201/113/40209"));
    assert_eq!(
        seller.contact.as_ref().and_then(|c| c.email.as_deref()),
        Some("hans@lieferant.de")
    );
    assert_eq!(back.buyer.as_ref().and_then(|b| b.id.as_ref()).map(|id| id.value.as_str()), Some("GE2020211"));

    let order = back.buyer_order_referenced_document.as_ref().unwrap();
    assert_eq!(order.id, "ORDER-84637");
    assert_eq!(order.issue_date, Some(date(2024, 2, 20)));
    assert_eq!(back.actual_delivery_date, Some(date(2024, 3, 1)));

    assert_eq!(back.trade_line_items.len(), 2);
    let line = &back.trade_line_items[0];
    assert_eq!(line.name, "Trennblätter A4");
    assert_eq!(line.billed_quantity, dec!(20));
    assert_eq!(line.unit_code, Some(QuantityCode::Piece));
    assert_eq!(line.net_unit_price, Some(dec!(9.90)));
    assert_eq!(line.line_total_amount, Some(dec!(198.00)));
    assert_eq!(line.seller_assigned_id.as_deref(), Some("TB100A4"));
    assert_eq!(line.tax_percent, dec!(19));

    assert_eq!(back.taxes.len(), 2);
    assert_eq!(back.taxes[0].tax_amount, dec!(37.62));
    assert_eq!(back.taxes[1].tax_amount, dec!(19.25));

    let means = back.payment_means.as_ref().unwrap();
    assert_eq!(means.type_code, PaymentMeansType::SepaCreditTransfer);
    assert_eq!(means.information.as_deref(), Some("Überweisung"));
    assert_eq!(back.creditor_bank_accounts.len(), 1);
    assert_eq!(back.creditor_bank_accounts[0].bic.as_deref(), Some("BYLADEM1001"));
    assert_eq!(back.payment_terms[0].due_date, Some(date(2024, 4, 4)));

    assert_eq!(back.totals, original.totals);
}

#[test]
fn extended_round_trip_version20() {
    let mut original = invoice(Profile::EXTENDED);
    original.name = Some("Rechnung".into());
    let back = round_trip(&original, ZugferdVersion::Version20);

    assert_eq!(back.profile, Profile::EXTENDED);
    assert_eq!(back.name.as_deref(), Some("Rechnung"));
    assert_eq!(back.trade_line_items.len(), 2);
    assert_eq!(back.taxes[0].percent, dec!(19));
    assert_eq!(back.totals.due_payable_amount, Some(dec!(529.87)));
}

#[test]
fn basic_round_trip_version1() {
    let original = invoice(Profile::BASIC);
    let back = round_trip(&original, ZugferdVersion::Version1);

    assert_eq!(back.profile, Profile::BASIC);
    assert_eq!(back.invoice_no, "471102");
    assert_eq!(back.invoice_date, Some(date(2024, 3, 5)));
    assert_eq!(back.trade_line_items.len(), 2);
    assert_eq!(back.trade_line_items[1].billed_quantity, dec!(50));
    assert_eq!(back.totals.grand_total_amount, Some(dec!(529.87)));
    assert_eq!(
        back.creditor_bank_accounts[0].iban.as_deref(),
        Some("DE02120300000000202051")
    );
}

// --- Profile gating ---

#[test]
fn minimum_omits_optional_content() {
    let xml = invoice(Profile::MINIMUM)
        .to_xml(ZugferdVersion::Version23, ZugferdFormat::Cii)
        .unwrap();

    assert!(xml.contains("urn:factur-x.eu:1p0:minimum"));
    assert!(!xml.contains("IncludedSupplyChainTradeLineItem"));
    assert!(!xml.contains("IncludedNote"));
    assert!(!xml.contains("SpecifiedTradeSettlementPaymentMeans"));
    assert!(!xml.contains("ActualDeliverySupplyChainEvent"));
    assert!(xml.contains("<ram:GrandTotalAmount>529.87</ram:GrandTotalAmount>"));
}

#[test]
fn extended_emits_optional_content() {
    let xml = invoice(Profile::EXTENDED)
        .to_xml(ZugferdVersion::Version23, ZugferdFormat::Cii)
        .unwrap();

    assert!(xml.contains("IncludedSupplyChainTradeLineItem"));
    assert!(xml.contains("IncludedNote"));
    assert!(xml.contains("SpecifiedTradeSettlementPaymentMeans"));
    assert!(xml.contains("ActualDeliverySupplyChainEvent"));
    assert!(xml.contains("<ram:BICID>BYLADEM1001</ram:BICID>"));
}

#[test]
fn amounts_are_fixed_point() {
    let mut desc = invoice(Profile::COMFORT);
    desc.totals.tax_basis_amount = Some(dec!(1234.5));
    let xml = desc.to_xml(ZugferdVersion::Version23, ZugferdFormat::Cii).unwrap();
    assert!(xml.contains("<ram:TaxBasisTotalAmount>1234.50</ram:TaxBasisTotalAmount>"));
    assert!(xml.contains("<ram:ChargeAmount>9.9000</ram:ChargeAmount>"));
    assert_eq!(zugferd::xml::format_decimal(dec!(1234.5), 2), "1234.50");
}

// --- Attachments ---

#[test]
fn attachment_round_trips_byte_identical() {
    let payload: Vec<u8> = (0u8..=255).cycle().take(1000).collect();
    let mut desc = invoice(Profile::COMFORT);
    desc.add_attachment("Anhang-1", Some("Stundenzettel"), "invoice.pdf", payload.clone());

    let xml = desc.to_xml(ZugferdVersion::Version23, ZugferdFormat::Cii).unwrap();
    assert!(xml.contains(r#"mimeCode="application/pdf""#));
    assert!(xml.contains(r#"filename="invoice.pdf""#));

    let back = InvoiceDescriptor::load_str(&xml).unwrap();
    let doc = &back.additional_referenced_documents[0];
    assert_eq!(doc.id, "Anhang-1");
    assert_eq!(doc.type_code, Some(DocumentTypeCode::InvoiceDataSheet));
    assert_eq!(doc.filename.as_deref(), Some("invoice.pdf"));
    assert_eq!(doc.attachment.as_deref(), Some(payload.as_slice()));
}

#[test]
fn attachment_without_filename_fails_before_writing() {
    let mut desc = invoice(Profile::COMFORT);
    desc.add_attachment("Anhang-1", None, "  ", vec![1, 2, 3]);

    let mut cursor = Cursor::new(Vec::new());
    let err = desc
        .save(&mut cursor, ZugferdVersion::Version23, ZugferdFormat::Cii)
        .unwrap_err();
    assert!(matches!(err, ZugferdError::MissingFilename(ref id) if id == "Anhang-1"));
    assert!(cursor.get_ref().is_empty());
}

// --- Errors ---

#[test]
fn writers_reject_unsupported_profiles() {
    let mut cursor = Cursor::new(Vec::new());
    let err = invoice(Profile::XRECHNUNG)
        .save(&mut cursor, ZugferdVersion::Version1, ZugferdFormat::Cii)
        .unwrap_err();
    assert!(matches!(
        err,
        ZugferdError::UnsupportedProfile {
            version: ZugferdVersion::Version1,
            ..
        }
    ));

    let err = invoice(Profile::UNKNOWN)
        .save(&mut cursor, ZugferdVersion::Version23, ZugferdFormat::Cii)
        .unwrap_err();
    assert!(matches!(err, ZugferdError::UnsupportedProfile { .. }));
}

#[test]
fn ubl_rejects_cii_only_versions() {
    let err = invoice(Profile::COMFORT)
        .to_xml(ZugferdVersion::Version1, ZugferdFormat::Ubl)
        .unwrap_err();
    assert!(matches!(err, ZugferdError::UnsupportedFormat { .. }));
}

#[test]
fn save_restores_the_cursor() {
    let mut cursor = Cursor::new(Vec::new());
    cursor.write_all(b"PREFIX").unwrap();
    let start = cursor.stream_position().unwrap();

    invoice(Profile::BASIC)
        .save(&mut cursor, ZugferdVersion::Version23, ZugferdFormat::Cii)
        .unwrap();
    assert_eq!(cursor.stream_position().unwrap(), start);
    assert!(cursor.get_ref().len() as u64 > start);

    let back = InvoiceDescriptor::load(&mut cursor).unwrap();
    assert_eq!(back.invoice_no, "471102");

    cursor.seek(SeekFrom::Start(0)).unwrap();
    assert!(cursor.get_ref().starts_with(b"PREFIX"));
}

#[test]
fn malformed_xml_is_an_error() {
    let err = CiiVersion23Reader
        .parse_str("<rsm:CrossIndustryInvoice><unclosed>")
        .unwrap_err();
    assert!(matches!(err, ZugferdError::Xml(_)));
}

#[test]
fn missing_transaction_is_fatal() {
    let xml = r#"<rsm:CrossIndustryInvoice xmlns:rsm="urn:un:unece:uncefact:data:standard:CrossIndustryInvoice:100">
        <rsm:ExchangedDocument/>
    </rsm:CrossIndustryInvoice>"#;
    let err = CiiVersion23Reader.parse_str(xml).unwrap_err();
    assert!(matches!(err, ZugferdError::MissingNode(ref n) if n == "rsm:SupplyChainTradeTransaction"));
}

// --- Reader details ---

const RSM: &str = "urn:un:unece:uncefact:data:standard:CrossIndustryInvoice:100";
const RAM: &str = "urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:100";
const UDT: &str = "urn:un:unece:uncefact:data:standard:UnqualifiedDataType:100";

fn cii(guideline: &str, header: &str, settlement: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rsm:CrossIndustryInvoice xmlns:rsm="{RSM}" xmlns:ram="{RAM}" xmlns:udt="{UDT}">
  <rsm:ExchangedDocumentContext>
    <ram:GuidelineSpecifiedDocumentContextParameter><ram:ID>{guideline}</ram:ID></ram:GuidelineSpecifiedDocumentContextParameter>
  </rsm:ExchangedDocumentContext>
  <rsm:ExchangedDocument>
    <ram:ID>R-1</ram:ID>
    <ram:TypeCode>380</ram:TypeCode>
    {header}
  </rsm:ExchangedDocument>
  <rsm:SupplyChainTradeTransaction>
    <ram:IncludedSupplyChainTradeLineItem>
      <ram:AssociatedDocumentLineDocument><ram:LineID>1</ram:LineID></ram:AssociatedDocumentLineDocument>
      <ram:SpecifiedTradeProduct><ram:Name>Artikel</ram:Name></ram:SpecifiedTradeProduct>
    </ram:IncludedSupplyChainTradeLineItem>
    <ram:ApplicableHeaderTradeSettlement>
      <ram:InvoiceCurrencyCode>EUR</ram:InvoiceCurrencyCode>
      {settlement}
    </ram:ApplicableHeaderTradeSettlement>
  </rsm:SupplyChainTradeTransaction>
</rsm:CrossIndustryInvoice>"#
    )
}

#[test]
fn minimal_document_reads_with_defaults() {
    let xml = cii("urn:cen.eu:en16931:2017", "", "");
    let desc = InvoiceDescriptor::load_str(&xml).unwrap();

    assert_eq!(desc.profile, Profile::COMFORT);
    assert_eq!(desc.invoice_no, "R-1");
    assert_eq!(desc.invoice_date, None);
    assert!(desc.seller.is_none());
    assert!(desc.payment_means.is_none());
    assert!(desc.taxes.is_empty());
    assert_eq!(desc.trade_line_items.len(), 1);
    let line = &desc.trade_line_items[0];
    assert_eq!(line.name, "Artikel");
    assert_eq!(line.billed_quantity, dec!(0));
    assert_eq!(line.unit_code, None);
    assert_eq!(line.net_unit_price, None);
}

#[test]
fn date_format_codes() {
    let header = |value: &str, code: &str| {
        format!(r#"<ram:IssueDateTime><udt:DateTimeString format="{code}">{value}</udt:DateTimeString></ram:IssueDateTime>"#)
    };

    let month = InvoiceDescriptor::load_str(&cii("urn:cen.eu:en16931:2017", &header("202403", "610"), "")).unwrap();
    assert_eq!(month.invoice_date, Some(date(2024, 3, 1)));

    let week = InvoiceDescriptor::load_str(&cii("urn:cen.eu:en16931:2017", &header("202410", "616"), "")).unwrap();
    assert_eq!(week.invoice_date, Some(date(2024, 3, 4)));

    let err = InvoiceDescriptor::load_str(&cii("urn:cen.eu:en16931:2017", &header("20240305", "203"), ""))
        .unwrap_err();
    assert!(matches!(err, ZugferdError::UnsupportedDateFormat(ref c) if c == "203"));
}

#[test]
fn unknown_codes_degrade_to_unknown() {
    let xml = cii("urn:cen.eu:en16931:2017", "", "").replace(">EUR<", ">ZZZ-UNKNOWN<");
    let desc = InvoiceDescriptor::load_str(&xml).unwrap();
    assert_eq!(desc.currency, CurrencyCode::Unknown);
    assert_eq!(desc.currency.format(), "");
    assert_eq!(CurrencyCode::parse("ZZZ-UNKNOWN"), CurrencyCode::Unknown);
}

#[test]
fn bank_accounts_pair_by_position() {
    let settlement = r#"
      <ram:SpecifiedTradeSettlementPaymentMeans>
        <ram:TypeCode>58</ram:TypeCode>
        <ram:PayeePartyCreditorFinancialAccount><ram:IBANID>DE02120300000000202051</ram:IBANID></ram:PayeePartyCreditorFinancialAccount>
        <ram:PayeeSpecifiedCreditorFinancialInstitution><ram:BICID>BYLADEM1001</ram:BICID></ram:PayeeSpecifiedCreditorFinancialInstitution>
      </ram:SpecifiedTradeSettlementPaymentMeans>
      <ram:SpecifiedTradeSettlementPaymentMeans>
        <ram:TypeCode>58</ram:TypeCode>
        <ram:PayeePartyCreditorFinancialAccount><ram:IBANID>DE02500105170137075030</ram:IBANID></ram:PayeePartyCreditorFinancialAccount>
      </ram:SpecifiedTradeSettlementPaymentMeans>
      <ram:SpecifiedTradeSettlementPaymentMeans>
        <ram:TypeCode>58</ram:TypeCode>
        <ram:PayeePartyCreditorFinancialAccount><ram:IBANID>DE89370400440532013000</ram:IBANID></ram:PayeePartyCreditorFinancialAccount>
      </ram:SpecifiedTradeSettlementPaymentMeans>"#;
    let desc = InvoiceDescriptor::load_str(&cii("urn:cen.eu:en16931:2017", "", settlement)).unwrap();

    assert_eq!(desc.creditor_bank_accounts.len(), 3);
    assert_eq!(desc.creditor_bank_accounts[0].bic.as_deref(), Some("BYLADEM1001"));
    assert_eq!(desc.creditor_bank_accounts[1].bic, None);
    assert_eq!(
        desc.creditor_bank_accounts[2].iban.as_deref(),
        Some("DE89370400440532013000")
    );
}

#[test]
fn bank_accounts_survive_round_trips() {
    let cases = [
        (Profile::BASIC, ZugferdVersion::Version1),
        (Profile::EXTENDED, ZugferdVersion::Version20),
        (Profile::COMFORT, ZugferdVersion::Version23),
    ];
    for (profile, version) in cases {
        let mut desc = invoice(profile);
        desc.creditor_bank_accounts = vec![
            BankAccount {
                iban: Some("DE02500105170137075030".into()),
                ..BankAccount::default()
            },
            BankAccount {
                iban: Some("DE02120300000000202051".into()),
                bic: Some("BYLADEM1001".into()),
                ..BankAccount::default()
            },
        ];
        desc.add_debitor_account("DE89370400440532013000", None);

        let back = round_trip(&desc, version);
        let creditors: Vec<_> = back
            .creditor_bank_accounts
            .iter()
            .map(|a| (a.iban.as_deref(), a.bic.as_deref()))
            .collect();
        assert_eq!(
            creditors,
            vec![
                (Some("DE02500105170137075030"), None),
                (Some("DE02120300000000202051"), Some("BYLADEM1001")),
            ],
            "{version:?}"
        );
        assert_eq!(back.debitor_bank_accounts.len(), 1, "{version:?}");
        assert_eq!(
            back.debitor_bank_accounts[0].iban.as_deref(),
            Some("DE89370400440532013000"),
            "{version:?}"
        );
    }
}

const QDT: &str = "urn:un:unece:uncefact:data:standard:QualifiedDataType:100";

fn with_delivery_note(dates: &str) -> String {
    let delivery = format!(
        r#"<ram:ApplicableHeaderTradeDelivery>
      <ram:DeliveryNoteReferencedDocument>
        <ram:IssuerAssignedID>LS-1</ram:IssuerAssignedID>
        {dates}
      </ram:DeliveryNoteReferencedDocument>
    </ram:ApplicableHeaderTradeDelivery>
    <ram:ApplicableHeaderTradeSettlement>"#
    );
    cii("urn:cen.eu:en16931:2017", "", "")
        .replace(" xmlns:udt=", &format!(" xmlns:qdt=\"{QDT}\" xmlns:udt="))
        .replace("<ram:ApplicableHeaderTradeSettlement>", &delivery)
}

#[test]
fn delivery_note_date_prefers_issue_date_time() {
    let both = with_delivery_note(
        r#"<ram:IssueDateTime><udt:DateTimeString format="102">20240301</udt:DateTimeString></ram:IssueDateTime>
        <ram:FormattedIssueDateTime><qdt:DateTimeString format="999">whenever</qdt:DateTimeString></ram:FormattedIssueDateTime>"#,
    );
    let desc = InvoiceDescriptor::load_str(&both).unwrap();
    let note = desc.delivery_note_referenced_document.unwrap();
    assert_eq!(note.id, "LS-1");
    assert_eq!(note.issue_date, Some(date(2024, 3, 1)));

    let formatted_only = with_delivery_note(
        r#"<ram:FormattedIssueDateTime><qdt:DateTimeString format="102">20240302</qdt:DateTimeString></ram:FormattedIssueDateTime>"#,
    );
    let desc = InvoiceDescriptor::load_str(&formatted_only).unwrap();
    assert_eq!(
        desc.delivery_note_referenced_document.and_then(|n| n.issue_date),
        Some(date(2024, 3, 2))
    );
}

#[test]
fn oversized_line_amounts_fail_instead_of_panicking() {
    let huge = dec!(10000000000000000);
    let xml = cii("urn:cen.eu:en16931:2017", "", "").replace(
        "<ram:SpecifiedTradeProduct><ram:Name>Artikel</ram:Name></ram:SpecifiedTradeProduct>",
        &format!(
            r#"<ram:SpecifiedTradeProduct><ram:Name>Artikel</ram:Name></ram:SpecifiedTradeProduct>
      <ram:SpecifiedLineTradeAgreement>
        <ram:NetPriceProductTradePrice><ram:ChargeAmount>{huge}</ram:ChargeAmount></ram:NetPriceProductTradePrice>
      </ram:SpecifiedLineTradeAgreement>
      <ram:SpecifiedLineTradeDelivery><ram:BilledQuantity unitCode="C62">{huge}</ram:BilledQuantity></ram:SpecifiedLineTradeDelivery>"#
        ),
    );
    let desc = InvoiceDescriptor::load_str(&xml).unwrap();
    assert_eq!(desc.trade_line_items[0].billed_quantity, huge);
    assert_eq!(desc.trade_line_items[0].line_total_amount, None);

    let mut out = Cursor::new(Vec::new());
    let err = desc
        .save(&mut out, ZugferdVersion::Version23, ZugferdFormat::Cii)
        .unwrap_err();
    assert!(matches!(err, ZugferdError::Overflow(_)));
}
