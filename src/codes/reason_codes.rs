//! UNTDID 5189 / 7161 reason codes.
//!
//! UNTDID 5189 defines allowance reason codes, UNTDID 7161 defines
//! charge reason codes. Both apply to document-level and line-level
//! allowances and charges.

code_list! {
    /// UNTDID 5189 allowance reason code.
    pub enum AllowanceReasonCode {
        BonusForWorksAheadOfSchedule = "41",
        OtherBonus = "42",
        ManufacturersConsumerDiscount = "60",
        DueToMilitaryStatus = "62",
        DueToWorkAccident = "63",
        SpecialAgreement = "64",
        ProductionErrorDiscount = "65",
        NewOutletDiscount = "66",
        SampleDiscount = "67",
        EndOfRangeDiscount = "68",
        IncotermDiscount = "70",
        PointOfSalesThresholdAllowance = "71",
        MaterialSurchargeDeduction = "88",
        Discount = "95",
        SpecialRebate = "100",
        FixedLongTerm = "102",
        Temporary = "103",
        Standard = "104",
        YearlyTurnover = "105",
    }
}

code_list! {
    /// UNTDID 7161 charge reason code.
    pub enum ChargeReasonCode {
        Advertising = "AA",
        Telecommunication = "AAA",
        TechnicalModification = "AAC",
        JobOrderProduction = "AAD",
        Outlays = "AAE",
        OffPremises = "AAF",
        AdditionalProcessing = "AAH",
        Attesting = "AAI",
        Acceptance = "AAS",
        RushDelivery = "AAT",
        Miscellaneous = "ABK",
        AdditionalPackaging = "ABL",
        Dunnage = "ABN",
        Containerisation = "ABR",
        CarrierCount = "ADR",
        PickUp = "ADT",
        EnvironmentalProtectionService = "AEW",
        Freight = "FC",
        Financing = "FI",
        FlatRate = "FL",
        Labelling = "LA",
        Packing = "PC",
        Testing = "TS",
    }
}
