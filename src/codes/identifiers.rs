//! Identifier schemes for scheme-qualified ids.

code_list! {
    /// ISO/IEC 6523 international code designator (ICD).
    pub enum GlobalIdScheme {
        /// SIRENE (France)
        Sirene = "0002",
        /// SIRET (France)
        Siret = "0009",
        /// DUNS number
        Duns = "0060",
        /// GS1 Global Location Number
        Gln = "0088",
        /// Odette
        Odette = "0096",
        /// GS1 Global Trade Item Number
        Gtin = "0160",
        /// Leitweg-ID (German public sector routing)
        LeitwegId = "0204",
        /// Belgian enterprise number
        BelgianEnterpriseNumber = "0208",
        /// Legal Entity Identifier
        Lei = "0199",
        /// German VAT number
        GermanVatNumber = "9930",
        /// Swiss UID
        SwissUid = "0183",
    }
}

code_list! {
    /// Electronic address scheme (CEF EAS).
    pub enum ElectronicAddressScheme {
        Email = "EM",
        Siret = "0009",
        Duns = "0060",
        Gln = "0088",
        LeitwegId = "0204",
        BelgianEnterpriseNumber = "0208",
        Lei = "0199",
        SwissUid = "0183",
        GermanVatNumber = "9930",
        FrenchVatNumber = "9957",
        AustrianVatNumber = "9914",
    }
}

code_list! {
    /// Tax registration scheme of a party.
    pub enum TaxRegistrationScheme {
        /// VAT identification number
        VatId = "VA",
        /// Fiscal (tax office) number
        FiscalNumber = "FC",
    }
}
