code_list! {
    /// UNTDID 5153 duty/tax/fee type. Invoices in scope use `VAT`.
    pub enum TaxType {
        ValueAddedTax = "VAT",
        GoodsAndServicesTax = "GST",
        Excise = "EXC",
        Environmental = "ENV",
        Other = "OTH",
    }
}

code_list! {
    /// UNTDID 5305 tax category.
    pub enum TaxCategoryCode {
        /// Mixed tax rate
        MixedTaxRate = "A",
        /// Lower rate
        LowerRate = "AA",
        /// Exempt for resale
        ExemptForResale = "AB",
        /// VAT reverse charge
        ReverseCharge = "AE",
        /// Transferred (VAT), not used in EN 16931
        Transferred = "B",
        /// Duty paid by supplier
        DutyPaidBySupplier = "C",
        /// Exempt from tax
        Exempt = "E",
        /// Free export item, VAT not charged
        FreeExport = "G",
        /// Higher rate
        HigherRate = "H",
        /// Intra-community supply
        IntraCommunitySupply = "K",
        /// Canary Islands general indirect tax
        CanaryIslands = "L",
        /// Ceuta and Melilla tax
        CeutaMelilla = "M",
        /// Services outside scope of tax
        NotSubjectToVat = "O",
        /// Standard rate
        StandardRate = "S",
        /// Zero rated goods
        ZeroRated = "Z",
    }
}

code_list! {
    /// VATEX exemption reason code (CEF code list).
    pub enum TaxExemptionReasonCode {
        Article79C = "VATEX-EU-79-C",
        Article132 = "VATEX-EU-132",
        Article143 = "VATEX-EU-143",
        Article148 = "VATEX-EU-148",
        Article151 = "VATEX-EU-151",
        Article309 = "VATEX-EU-309",
        ReverseCharge = "VATEX-EU-AE",
        SecondHandGoods = "VATEX-EU-D",
        TravelAgents = "VATEX-EU-F",
        ExportOutsideEu = "VATEX-EU-G",
        WorksOfArt = "VATEX-EU-I",
        IntraCommunitySupply = "VATEX-EU-IC",
        CollectorsItems = "VATEX-EU-J",
        NotSubjectToVat = "VATEX-EU-O",
        FrenchFranchise = "VATEX-FR-FRANCHISE",
        FrenchCnwvat = "VATEX-FR-CNWVAT",
    }
}
