//! Code lists used by the invoice model.
//!
//! Every list is a plain enum with an `Unknown` sentinel and a static token
//! table. [`CodeList::parse`] never fails: tokens missing from the table map
//! to `Unknown`. [`CodeList::format`] is its exact inverse for every defined
//! value and returns `""` for `Unknown`.
//!
//! The tables carry the codes seen in German and French e-invoicing
//! practice, not the full UN/ECE or ISO registries.
//!
//! ```
//! use zugferd::codes::{CodeList, CurrencyCode};
//!
//! assert_eq!(CurrencyCode::parse("EUR"), CurrencyCode::Eur);
//! assert_eq!(CurrencyCode::Eur.format(), "EUR");
//! assert_eq!(CurrencyCode::parse("ZZZ-UNKNOWN"), CurrencyCode::Unknown);
//! ```

/// Bidirectional mapping between a coded token and a typed value.
pub trait CodeList: Copy + Eq + 'static {
    /// Name of the list, used in log output.
    const NAME: &'static str;
    /// Sentinel for tokens the table does not contain.
    const UNKNOWN: Self;

    /// Map a token to its value. Surrounding whitespace is ignored.
    fn parse(token: &str) -> Self;

    /// Token written for a value. `""` for the `Unknown` sentinel.
    fn format(self) -> &'static str;

    /// All values except the sentinel, in table order.
    fn defined() -> &'static [Self];

    fn is_unknown(self) -> bool {
        self == Self::UNKNOWN
    }
}

macro_rules! code_list {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $token:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Default,
            serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            /// Token not contained in the code list.
            #[default]
            Unknown,
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            const TABLE: &'static [($name, &'static str)] = &[ $( ($name::$variant, $token), )+ ];
            const DEFINED: &'static [$name] = &[ $( $name::$variant, )+ ];
        }

        impl $crate::codes::CodeList for $name {
            const NAME: &'static str = stringify!($name);
            const UNKNOWN: Self = $name::Unknown;

            fn parse(token: &str) -> Self {
                let token = token.trim();
                Self::TABLE
                    .iter()
                    .find(|(_, t)| *t == token)
                    .map_or($name::Unknown, |(v, _)| *v)
            }

            fn format(self) -> &'static str {
                Self::TABLE
                    .iter()
                    .find(|(v, _)| *v == self)
                    .map_or("", |(_, t)| *t)
            }

            fn defined() -> &'static [Self] {
                Self::DEFINED
            }
        }
    };
}

mod countries;
mod currencies;
mod document;
mod identifiers;
mod payment;
mod reason_codes;
mod tax;
mod units;

pub use countries::CountryCode;
pub use currencies::CurrencyCode;
pub use document::{
    AccountingAccountType, ContentCode, DocumentTypeCode, InvoiceType, ProductClassificationCode,
    ReferenceTypeCode, SubjectCode,
};
pub use identifiers::{ElectronicAddressScheme, GlobalIdScheme, TaxRegistrationScheme};
pub use payment::PaymentMeansType;
pub use reason_codes::{AllowanceReasonCode, ChargeReasonCode};
pub use tax::{TaxCategoryCode, TaxExemptionReasonCode, TaxType};
pub use units::QuantityCode;

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_round_trip<C: CodeList + std::fmt::Debug>() {
        for value in C::defined() {
            let token = value.format();
            assert!(!token.is_empty(), "{}::{value:?} has no token", C::NAME);
            assert_eq!(C::parse(token), *value, "{} token {token}", C::NAME);
        }
    }

    fn assert_tokens_unique<C: CodeList>() {
        let mut tokens: Vec<_> = C::defined().iter().map(|v| v.format()).collect();
        let before = tokens.len();
        tokens.sort_unstable();
        tokens.dedup();
        assert_eq!(tokens.len(), before, "{} has duplicate tokens", C::NAME);
    }

    macro_rules! check_lists {
        ($($list:ty),+ $(,)?) => {
            $(
                assert_round_trip::<$list>();
                assert_tokens_unique::<$list>();
                assert_eq!(<$list>::parse("ZZZ-UNKNOWN"), <$list>::Unknown);
                assert_eq!(<$list>::Unknown.format(), <$list>::Unknown.format());
            )+
        };
    }

    #[test]
    fn every_list_round_trips() {
        check_lists!(
            CountryCode,
            CurrencyCode,
            InvoiceType,
            DocumentTypeCode,
            ReferenceTypeCode,
            SubjectCode,
            ContentCode,
            ProductClassificationCode,
            AccountingAccountType,
            GlobalIdScheme,
            ElectronicAddressScheme,
            TaxRegistrationScheme,
            PaymentMeansType,
            AllowanceReasonCode,
            ChargeReasonCode,
            TaxType,
            TaxCategoryCode,
            TaxExemptionReasonCode,
            QuantityCode,
        );
    }

    #[test]
    fn parse_trims_whitespace() {
        assert_eq!(CurrencyCode::parse("  EUR\n"), CurrencyCode::Eur);
    }

    #[test]
    fn unknown_formats_empty() {
        assert_eq!(CurrencyCode::Unknown.format(), "");
        assert!(CurrencyCode::Unknown.is_unknown());
        assert!(!CurrencyCode::Eur.is_unknown());
    }
}
