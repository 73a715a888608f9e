//! Property-based tests for codes, number formatting and round trips.
//!
//! Run with: `cargo test --test proptest_tests`

use std::io::Cursor;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use zugferd::codes::{CodeList, CountryCode, CurrencyCode, QuantityCode, TaxCategoryCode};
use zugferd::xml::format::{format_decimal, parse_decimal};
use zugferd::*;

fn check_code_list<C: CodeList + std::fmt::Debug>(token: &str) {
    let value = C::parse(token);
    if value.is_unknown() {
        assert_eq!(value.format(), "");
    } else {
        assert_eq!(value.format(), token.trim());
        assert_eq!(C::parse(value.format()), value);
    }
}

fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000, 0u32..=4).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

fn text() -> impl Strategy<Value = String> {
    "[A-Za-z0-9äöüß][A-Za-z0-9äöüß .,/&<>-]{0,30}[A-Za-z0-9]"
}

proptest! {
    #[test]
    fn code_parsing_is_total(token in "\\PC{0,8}") {
        check_code_list::<CurrencyCode>(&token);
        check_code_list::<CountryCode>(&token);
        check_code_list::<QuantityCode>(&token);
        check_code_list::<TaxCategoryCode>(&token);
    }

    #[test]
    fn defined_codes_round_trip(index in 0usize..1000) {
        let currencies = CurrencyCode::defined();
        let currency = currencies[index % currencies.len()];
        prop_assert_eq!(CurrencyCode::parse(currency.format()), currency);

        let units = QuantityCode::defined();
        let unit = units[index % units.len()];
        prop_assert_eq!(QuantityCode::parse(unit.format()), unit);
    }

    #[test]
    fn formatted_amounts_parse_back_rounded(value in amount(), places in 0u32..=4) {
        let text = format_decimal(value, places);
        prop_assert!(!text.contains(','));
        match text.split_once('.') {
            Some((_, frac)) => prop_assert_eq!(frac.len() as u32, places),
            None => prop_assert_eq!(places, 0),
        }
        let rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
        prop_assert_eq!(parse_decimal(&text), Some(rounded));
    }

    #[test]
    fn detection_never_moves_the_cursor(prefix in "[a-z ]{0,16}", body in "\\PC{0,64}") {
        let data = format!("{prefix}{body}").into_bytes();
        let start = prefix.len() as u64;
        let mut cursor = Cursor::new(data);
        cursor.set_position(start);
        let first = detect(&mut cursor).ok();
        prop_assert_eq!(cursor.position(), start);
        prop_assert_eq!(detect(&mut cursor).ok(), first);
    }

    #[test]
    fn cii_round_trip_keeps_line_values(
        invoice_no in text(),
        name in text(),
        quantity in amount(),
        price in amount(),
    ) {
        let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let desc = InvoiceBuilder::new(invoice_no.clone(), date, CurrencyCode::Eur)
            .profile(Profile::COMFORT)
            .seller(PartyBuilder::new(name.clone()).build())
            .add_line(
                LineItemBuilder::new("1", name.clone(), quantity, price)
                    .tax(TaxCategoryCode::StandardRate, Decimal::new(19, 0))
                    .build(),
            )
            .build();

        let xml = desc.to_xml(ZugferdVersion::Version23, ZugferdFormat::Cii).unwrap();
        let back = InvoiceDescriptor::load_str(&xml).unwrap();

        prop_assert_eq!(back.invoice_no, invoice_no);
        prop_assert_eq!(back.seller.map(|s| s.name), Some(name.clone()));
        let line = &back.trade_line_items[0];
        prop_assert_eq!(&line.name, &name);
        prop_assert_eq!(line.billed_quantity, quantity);
        prop_assert_eq!(line.net_unit_price, Some(price));
    }
}
