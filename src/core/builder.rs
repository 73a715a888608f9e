use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::profile::Profile;
use super::types::*;
use crate::codes::*;

/// Builder for invoice descriptors.
///
/// No validation happens here: readers and writers accept whatever the
/// descriptor holds, and totals are taken as given.
///
/// ```
/// use zugferd::*;
/// use zugferd::codes::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let invoice = InvoiceBuilder::new("RE-2024-001", NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), CurrencyCode::Eur)
///     .profile(Profile::COMFORT)
///     .seller(PartyBuilder::new("ACME GmbH")
///         .address("Friedrichstraße 123", "10115", "Berlin", CountryCode::De)
///         .vat_id("DE123456789")
///         .build())
///     .buyer(PartyBuilder::new("Kunde AG").build())
///     .add_line(LineItemBuilder::new("1", "Beratung", dec!(10), dec!(150.00))
///         .unit(QuantityCode::Hour)
///         .tax(TaxCategoryCode::StandardRate, dec!(19))
///         .build())
///     .build();
///
/// assert_eq!(invoice.trade_line_items.len(), 1);
/// assert_eq!(invoice.trade_line_items[0].line_total_amount, Some(dec!(1500.00)));
/// ```
pub struct InvoiceBuilder {
    descriptor: InvoiceDescriptor,
}

impl InvoiceBuilder {
    pub fn new(invoice_no: impl Into<String>, invoice_date: NaiveDate, currency: CurrencyCode) -> Self {
        Self {
            descriptor: InvoiceDescriptor {
                invoice_no: invoice_no.into(),
                invoice_date: Some(invoice_date),
                invoice_type: InvoiceType::Invoice,
                currency,
                profile: Profile::BASIC,
                ..InvoiceDescriptor::default()
            },
        }
    }

    pub fn profile(mut self, profile: Profile) -> Self {
        self.descriptor.profile = profile;
        self
    }

    pub fn invoice_type(mut self, invoice_type: InvoiceType) -> Self {
        self.descriptor.invoice_type = invoice_type;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.descriptor.name = Some(name.into());
        self
    }

    pub fn test(mut self, is_test: bool) -> Self {
        self.descriptor.is_test = is_test;
        self
    }

    pub fn business_process(mut self, id: impl Into<String>) -> Self {
        self.descriptor.business_process = Some(id.into());
        self
    }

    pub fn tax_currency(mut self, currency: CurrencyCode) -> Self {
        self.descriptor.tax_currency = Some(currency);
        self
    }

    pub fn note(mut self, content: impl Into<String>) -> Self {
        self.descriptor.notes.push(Note::new(content));
        self
    }

    pub fn note_with_subject(mut self, content: impl Into<String>, subject: SubjectCode) -> Self {
        self.descriptor.notes.push(Note::with_subject(content, subject));
        self
    }

    pub fn buyer_reference(mut self, reference: impl Into<String>) -> Self {
        self.descriptor.buyer_reference = Some(reference.into());
        self
    }

    pub fn payment_reference(mut self, reference: impl Into<String>) -> Self {
        self.descriptor.payment_reference = Some(reference.into());
        self
    }

    pub fn seller(mut self, party: Party) -> Self {
        self.descriptor.seller = Some(party);
        self
    }

    pub fn buyer(mut self, party: Party) -> Self {
        self.descriptor.buyer = Some(party);
        self
    }

    pub fn ship_to(mut self, party: Party) -> Self {
        self.descriptor.ship_to = Some(party);
        self
    }

    pub fn payee(mut self, party: Party) -> Self {
        self.descriptor.payee = Some(party);
        self
    }

    pub fn order(mut self, order_no: impl Into<String>, order_date: Option<NaiveDate>) -> Self {
        self.descriptor.buyer_order_referenced_document =
            Some(ReferencedDocument::new(order_no, order_date));
        self
    }

    pub fn contract(mut self, contract_no: impl Into<String>) -> Self {
        self.descriptor.contract_referenced_document = Some(ReferencedDocument::new(contract_no, None));
        self
    }

    pub fn delivery_note(mut self, id: impl Into<String>, date: Option<NaiveDate>) -> Self {
        self.descriptor.delivery_note_referenced_document = Some(ReferencedDocument::new(id, date));
        self
    }

    pub fn actual_delivery_date(mut self, date: NaiveDate) -> Self {
        self.descriptor.actual_delivery_date = Some(date);
        self
    }

    pub fn billing_period(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.descriptor.billing_period = Some(BillingPeriod {
            start: Some(start),
            end: Some(end),
        });
        self
    }

    pub fn add_line(mut self, line: TradeLineItem) -> Self {
        self.descriptor.trade_line_items.push(line);
        self
    }

    pub fn add_tax(mut self, basis_amount: Decimal, percent: Decimal, category: TaxCategoryCode) -> Self {
        self.descriptor.add_tax(basis_amount, percent, category);
        self
    }

    pub fn add_allowance_charge(mut self, allowance_charge: TradeAllowanceCharge) -> Self {
        self.descriptor.trade_allowance_charges.push(allowance_charge);
        self
    }

    pub fn payment_means(mut self, type_code: PaymentMeansType, information: Option<&str>) -> Self {
        self.descriptor.payment_means = Some(PaymentMeans {
            type_code,
            information: information.map(str::to_owned),
            ..PaymentMeans::default()
        });
        self
    }

    pub fn add_creditor_account(mut self, iban: impl Into<String>, bic: Option<&str>) -> Self {
        self.descriptor.creditor_bank_accounts.push(BankAccount {
            iban: Some(iban.into()),
            bic: bic.map(str::to_owned),
            ..BankAccount::default()
        });
        self
    }

    pub fn payment_terms(mut self, description: impl Into<String>, due_date: Option<NaiveDate>) -> Self {
        self.descriptor.payment_terms.push(PaymentTerms {
            description: Some(description.into()),
            due_date,
            ..PaymentTerms::default()
        });
        self
    }

    pub fn totals(mut self, totals: MonetarySummation) -> Self {
        self.descriptor.totals = totals;
        self
    }

    pub fn build(self) -> InvoiceDescriptor {
        self.descriptor
    }
}

impl InvoiceDescriptor {
    /// Add a VAT breakdown entry; the tax amount is `basis * percent / 100`
    /// rounded to two places.
    pub fn add_tax(&mut self, basis_amount: Decimal, percent: Decimal, category: TaxCategoryCode) -> &mut Tax {
        let tax_amount = (basis_amount * percent / Decimal::ONE_HUNDRED).round_dp(2);
        self.taxes.push(Tax {
            basis_amount,
            tax_amount,
            ..Tax::new(category, percent)
        });
        let last = self.taxes.len() - 1;
        &mut self.taxes[last]
    }

    pub fn add_note(&mut self, content: impl Into<String>, subject: Option<SubjectCode>) {
        self.notes.push(Note {
            content: content.into(),
            subject_code: subject,
            content_code: None,
        });
    }

    /// Attach a supporting document with an embedded file.
    pub fn add_attachment(
        &mut self,
        id: impl Into<String>,
        name: Option<&str>,
        filename: impl Into<String>,
        binary: Vec<u8>,
    ) {
        self.additional_referenced_documents.push(ReferencedDocument {
            id: id.into(),
            type_code: Some(DocumentTypeCode::InvoiceDataSheet),
            name: name.map(str::to_owned),
            attachment: Some(binary),
            filename: Some(filename.into()),
            ..ReferencedDocument::default()
        });
    }

    pub fn add_allowance(&mut self, amount: Decimal, reason: &str, tax: Tax) {
        self.trade_allowance_charges.push(TradeAllowanceCharge {
            charge_indicator: false,
            currency: Some(self.currency),
            actual_amount: amount,
            reason: Some(reason.to_owned()),
            tax: Some(tax),
            ..TradeAllowanceCharge::default()
        });
    }

    pub fn add_charge(&mut self, amount: Decimal, reason: &str, tax: Tax) {
        self.trade_allowance_charges.push(TradeAllowanceCharge {
            charge_indicator: true,
            currency: Some(self.currency),
            actual_amount: amount,
            reason: Some(reason.to_owned()),
            tax: Some(tax),
            ..TradeAllowanceCharge::default()
        });
    }

    pub fn add_debitor_account(&mut self, iban: impl Into<String>, mandate_reference: Option<&str>) {
        self.debitor_bank_accounts.push(BankAccount {
            iban: Some(iban.into()),
            ..BankAccount::default()
        });
        if let Some(mandate) = mandate_reference {
            self.payment_means
                .get_or_insert_with(PaymentMeans::default)
                .sepa_mandate_reference = Some(mandate.to_owned());
        }
    }
}

/// Builder for [`Party`].
pub struct PartyBuilder {
    party: Party,
}

impl PartyBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            party: Party {
                name: name.into(),
                ..Party::default()
            },
        }
    }

    pub fn address(
        mut self,
        street: impl Into<String>,
        postcode: impl Into<String>,
        city: impl Into<String>,
        country: CountryCode,
    ) -> Self {
        self.party.street = Some(street.into());
        self.party.postcode = Some(postcode.into());
        self.party.city = Some(city.into());
        self.party.country = Some(country);
        self
    }

    pub fn address_line2(mut self, line: impl Into<String>) -> Self {
        self.party.address_line2 = Some(line.into());
        self
    }

    pub fn address_line3(mut self, line: impl Into<String>) -> Self {
        self.party.address_line3 = Some(line.into());
        self
    }

    pub fn subdivision(mut self, subdivision: impl Into<String>) -> Self {
        self.party.subdivision = Some(subdivision.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.party.id = Some(GlobalId::unqualified(id));
        self
    }

    pub fn global_id(mut self, scheme: GlobalIdScheme, id: impl Into<String>) -> Self {
        self.party.global_id = Some(GlobalId::new(scheme, id));
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.party.description = Some(description.into());
        self
    }

    pub fn vat_id(mut self, vat_id: impl Into<String>) -> Self {
        self.party
            .tax_registrations
            .push(TaxRegistration::new(TaxRegistrationScheme::VatId, vat_id));
        self
    }

    pub fn tax_number(mut self, tax_number: impl Into<String>) -> Self {
        self.party
            .tax_registrations
            .push(TaxRegistration::new(TaxRegistrationScheme::FiscalNumber, tax_number));
        self
    }

    pub fn electronic_address(mut self, scheme: ElectronicAddressScheme, value: impl Into<String>) -> Self {
        self.party.electronic_address = Some(ElectronicAddress::new(scheme, value));
        self
    }

    pub fn legal_organization(mut self, id: Option<GlobalId>, trading_name: Option<&str>) -> Self {
        self.party.legal_organization = Some(LegalOrganization {
            id,
            trading_business_name: trading_name.map(str::to_owned),
        });
        self
    }

    pub fn contact(mut self, name: Option<&str>, phone: Option<&str>, email: Option<&str>) -> Self {
        self.party.contact = Some(Contact {
            name: name.map(str::to_owned),
            phone: phone.map(str::to_owned),
            email: email.map(str::to_owned),
            ..Contact::default()
        });
        self
    }

    pub fn build(self) -> Party {
        self.party
    }
}

/// Builder for [`TradeLineItem`].
///
/// The line total defaults to `quantity * net price` (rounded to two
/// places) unless set explicitly.
pub struct LineItemBuilder {
    line: TradeLineItem,
    explicit_total: bool,
}

impl LineItemBuilder {
    pub fn new(line_id: impl Into<String>, name: impl Into<String>, quantity: Decimal, net_unit_price: Decimal) -> Self {
        Self {
            line: TradeLineItem {
                line_id: line_id.into(),
                name: name.into(),
                billed_quantity: quantity,
                net_unit_price: Some(net_unit_price),
                unit_code: Some(QuantityCode::One),
                tax_type: TaxType::ValueAddedTax,
                ..TradeLineItem::default()
            },
            explicit_total: false,
        }
    }

    pub fn unit(mut self, unit: QuantityCode) -> Self {
        self.line.unit_code = Some(unit);
        self
    }

    pub fn unit_quantity(mut self, quantity: Decimal) -> Self {
        self.line.unit_quantity = Some(quantity);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.line.description = Some(description.into());
        self
    }

    pub fn note(mut self, content: impl Into<String>) -> Self {
        self.line.notes.push(Note::new(content));
        self
    }

    pub fn seller_assigned_id(mut self, id: impl Into<String>) -> Self {
        self.line.seller_assigned_id = Some(id.into());
        self
    }

    pub fn buyer_assigned_id(mut self, id: impl Into<String>) -> Self {
        self.line.buyer_assigned_id = Some(id.into());
        self
    }

    pub fn global_id(mut self, scheme: GlobalIdScheme, id: impl Into<String>) -> Self {
        self.line.global_id = Some(GlobalId::new(scheme, id));
        self
    }

    pub fn gross_unit_price(mut self, price: Decimal) -> Self {
        self.line.gross_unit_price = Some(price);
        self
    }

    pub fn tax(mut self, category: TaxCategoryCode, percent: Decimal) -> Self {
        self.line.tax_category_code = category;
        self.line.tax_percent = percent;
        self
    }

    pub fn line_total(mut self, amount: Decimal) -> Self {
        self.line.line_total_amount = Some(amount);
        self.explicit_total = true;
        self
    }

    pub fn add_allowance_charge(mut self, allowance_charge: TradeAllowanceCharge) -> Self {
        self.line.allowance_charges.push(allowance_charge);
        self
    }

    pub fn characteristic(mut self, description: impl Into<String>, value: impl Into<String>) -> Self {
        self.line.product_characteristics.push(ProductCharacteristic {
            type_code: None,
            description: description.into(),
            value: value.into(),
        });
        self
    }

    pub fn origin_country(mut self, country: CountryCode) -> Self {
        self.line.origin_country = Some(country);
        self
    }

    pub fn buyer_order_line(mut self, order_no: impl Into<String>, line_id: impl Into<String>) -> Self {
        self.line.buyer_order_referenced_document = Some(ReferencedDocument {
            id: order_no.into(),
            line_id: Some(line_id.into()),
            ..ReferencedDocument::default()
        });
        self
    }

    pub fn build(mut self) -> TradeLineItem {
        if !self.explicit_total {
            if let Some(price) = self.line.net_unit_price {
                let basis = self.line.unit_quantity.filter(|q| !q.is_zero()).unwrap_or(Decimal::ONE);
                self.line.line_total_amount = self
                    .line
                    .billed_quantity
                    .checked_mul(price)
                    .and_then(|amount| amount.checked_div(basis))
                    .map(|total| total.round_dp(2));
            }
        }
        self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn builder_defaults() {
        let invoice = InvoiceBuilder::new("RE-1", date(2024, 6, 15), CurrencyCode::Eur).build();
        assert_eq!(invoice.invoice_type, InvoiceType::Invoice);
        assert_eq!(invoice.profile, Profile::BASIC);
        assert_eq!(invoice.invoice_date, Some(date(2024, 6, 15)));
        assert!(invoice.trade_line_items.is_empty());
    }

    #[test]
    fn line_total_respects_basis_quantity() {
        let line = LineItemBuilder::new("1", "Schrauben", dec!(250), dec!(4.20))
            .unit_quantity(dec!(100))
            .build();
        assert_eq!(line.line_total_amount, Some(dec!(10.50)));

        let line = LineItemBuilder::new("2", "Pauschale", dec!(1), dec!(99))
            .line_total(dec!(80))
            .build();
        assert_eq!(line.line_total_amount, Some(dec!(80)));
    }

    #[test]
    fn add_tax_computes_amount() {
        let mut invoice = InvoiceBuilder::new("RE-1", date(2024, 6, 15), CurrencyCode::Eur).build();
        let tax = invoice.add_tax(dec!(100.05), dec!(19), TaxCategoryCode::StandardRate);
        assert_eq!(tax.tax_amount, dec!(19.01));
        assert_eq!(tax.type_code, TaxType::ValueAddedTax);
    }

    #[test]
    fn debitor_account_sets_mandate() {
        let mut invoice = InvoiceBuilder::new("RE-1", date(2024, 6, 15), CurrencyCode::Eur)
            .payment_means(PaymentMeansType::SepaDirectDebit, None)
            .build();
        invoice.add_debitor_account("DE02120300000000202051", Some("MANDATE-7"));
        assert_eq!(invoice.debitor_bank_accounts.len(), 1);
        let means = invoice.payment_means.unwrap();
        assert_eq!(means.type_code, PaymentMeansType::SepaDirectDebit);
        assert_eq!(means.sepa_mandate_reference.as_deref(), Some("MANDATE-7"));
    }

    #[test]
    fn party_builder_collects_registrations() {
        let party = PartyBuilder::new("ACME GmbH")
            .vat_id("DE123456789")
            .tax_number("201/113/40209")
            .build();
        assert_eq!(party.tax_registration(TaxRegistrationScheme::VatId), Some("DE123456789"));
        assert_eq!(
            party.tax_registration(TaxRegistrationScheme::FiscalNumber),
            Some("201/113/40209")
        );
    }
}
