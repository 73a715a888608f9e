//! UN/ECE Recommendation 20 / 21 unit codes.
//!
//! The full Rec 20 list has ~2000 codes; this covers the subset most
//! relevant to European e-invoicing.

code_list! {
    /// Unit of measure for billed and basis quantities.
    pub enum QuantityCode {
        Piece = "H87",
        One = "C62",
        Each = "EA",
        Hour = "HUR",
        Minute = "MIN",
        Second = "SEC",
        Day = "DAY",
        Week = "WEE",
        Month = "MON",
        Year = "ANN",
        Kilogram = "KGM",
        Gram = "GRM",
        Milligram = "MGM",
        Tonne = "TNE",
        Litre = "LTR",
        Millilitre = "MLT",
        Hectolitre = "HLT",
        Metre = "MTR",
        Centimetre = "CMT",
        Millimetre = "MMT",
        Kilometre = "KMT",
        SquareMetre = "MTK",
        CubicMetre = "MTQ",
        KilowattHour = "KWH",
        MegawattHour = "MWH",
        Kilowatt = "KWT",
        Set = "SET",
        Pair = "PR",
        Dozen = "DZN",
        Percent = "P1",
        LumpSum = "LS",
        NumberOfArticles = "NAR",
        Box = "XBX",
        Bag = "XBG",
        Carton = "XCT",
        Package = "XPK",
        Pallet = "XPX",
        Roll = "XRO",
        Sheet = "XST",
        Bundle = "XBD",
    }
}
