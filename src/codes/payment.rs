code_list! {
    /// UNTDID 4461 payment means.
    pub enum PaymentMeansType {
        NotDefined = "1",
        AutomatedClearingHouseDebit = "3",
        InCash = "10",
        Cheque = "20",
        CreditTransfer = "30",
        DebitTransfer = "31",
        PaymentToBankAccount = "42",
        BankCard = "48",
        DirectDebit = "49",
        StandingAgreement = "57",
        SepaCreditTransfer = "58",
        SepaDirectDebit = "59",
        OnlinePaymentService = "68",
        ClearingBetweenPartners = "97",
        MutuallyDefined = "ZZZ",
    }
}
