code_list! {
    /// UNTDID 1001 document name code of the invoice itself.
    pub enum InvoiceType {
        RequestForPayment = "71",
        DebitNoteRelatedToGoodsOrServices = "80",
        CreditNoteRelatedToGoodsOrServices = "81",
        MeteredServicesInvoice = "82",
        DebitNoteRelatedToFinancialAdjustments = "84",
        SelfBilledCreditNote = "261",
        CreditNoteRelatedToFinancialAdjustments = "262",
        PartialInvoice = "326",
        Invoice = "380",
        CreditNote = "381",
        CommissionNote = "382",
        DebitNote = "383",
        Correction = "384",
        PrepaymentInvoice = "386",
        SelfBilledInvoice = "389",
        FactoredInvoice = "393",
        ForwardersInvoice = "623",
        InvoiceInformation = "751",
        PartialConstructionInvoice = "875",
        PartialFinalConstructionInvoice = "876",
        FinalConstructionInvoice = "877",
    }
}

impl InvoiceType {
    /// Document types that UBL carries in a `CreditNote` root.
    pub fn is_credit_note(self) -> bool {
        matches!(
            self,
            InvoiceType::CreditNote
                | InvoiceType::CreditNoteRelatedToGoodsOrServices
                | InvoiceType::CreditNoteRelatedToFinancialAdjustments
                | InvoiceType::SelfBilledCreditNote
        )
    }
}

code_list! {
    /// UNTDID 1001 type of an additional referenced document.
    pub enum DocumentTypeCode {
        PriceSalesCatalogueResponse = "50",
        InvoiceDataSheet = "130",
        ReferenceDocument = "916",
    }
}

code_list! {
    /// UNTDID 1153 reference qualifier.
    pub enum ReferenceTypeCode {
        /// Order acknowledgement number
        OrderAcknowledgement = "AAA",
        /// Proforma invoice number
        ProformaInvoice = "AAB",
        /// Delivery note number
        DeliveryNote = "AAJ",
        /// Despatch advice number
        DespatchAdvice = "AAK",
        /// Buyer's catalogue number
        BuyerCatalogue = "AAL",
        /// Contract number
        Contract = "CT",
        /// Buyer's item number
        BuyerItem = "AFB",
        /// Customer reference number
        CustomerReference = "CR",
        /// Invoice number
        Invoice = "IV",
        /// Order number (buyer)
        BuyerOrder = "ON",
        /// Project number
        Project = "AEP",
        /// Order number (supplier)
        SupplierOrder = "VN",
        /// Price list number
        PriceList = "PL",
        /// Mutually defined reference number
        MutuallyDefined = "ZZZ",
    }
}

code_list! {
    /// UNTDID 4451 text subject qualifier for notes.
    pub enum SubjectCode {
        GeneralInformation = "AAI",
        AdditionalConditions = "AAB",
        PaymentInformation = "PMT",
        SupplierRemarks = "SUR",
        LegalInformation = "ABL",
        DangerousGoods = "AAK",
        Regulatory = "REG",
        TaxDeclaration = "TXD",
        CustomsDeclaration = "CUS",
        PriceConditions = "AAC",
        PricingInformation = "PRF",
        Penalties = "PMD",
        Discount = "ACB",
    }
}

code_list! {
    /// ZUGFeRD 1.0 note content codes.
    pub enum ContentCode {
        /// Reservation of title (Eigentumsvorbehalt)
        OwnershipRetained = "EEV",
        /// Web address
        WebAddress = "WEB",
        /// Delivery condition (Lieferbedingung)
        DeliveryCondition = "VEV",
        /// Standard text 1
        StandardText1 = "ST1",
        /// Standard text 2
        StandardText2 = "ST2",
        /// Standard text 3
        StandardText3 = "ST3",
    }
}

code_list! {
    /// UNTDID 7143 item classification list.
    pub enum ProductClassificationCode {
        ProductVersionNumber = "AA",
        AssemblyNumber = "AB",
        HarmonizedSystem = "HS",
        CommonProcurementVocabulary = "CV",
        Gtin = "SRV",
        UnspscCode = "TST",
        MutuallyDefined = "ZZZ",
        CommodityCode = "CG",
        NationalProductCode = "GN",
    }
}

code_list! {
    /// Accounting account type (ZUGFeRD Extended).
    pub enum AccountingAccountType {
        Financial = "1",
        Subsidiary = "2",
        Budget = "3",
        CostAccounting = "4",
        Receivable = "5",
        Payable = "6",
        JobCostAccounting = "7",
    }
}
