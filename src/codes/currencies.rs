//! ISO 4217 currency codes.
//!
//! Covers the currencies relevant to European e-invoicing (EN 16931).

code_list! {
    /// ISO 4217 alphabetic currency code.
    pub enum CurrencyCode {
        Aed = "AED", // UAE Dirham
        Amd = "AMD", // Armenian Dram
        Aud = "AUD", // Australian Dollar
        Bgn = "BGN", // Bulgarian Lev
        Brl = "BRL", // Brazilian Real
        Cad = "CAD", // Canadian Dollar
        Chf = "CHF", // Swiss Franc
        Cny = "CNY", // Chinese Yuan
        Czk = "CZK", // Czech Koruna
        Dkk = "DKK", // Danish Krone
        Egp = "EGP", // Egyptian Pound
        Eur = "EUR", // Euro
        Gbp = "GBP", // Pound Sterling
        Gel = "GEL", // Georgian Lari
        Hkd = "HKD", // Hong Kong Dollar
        Hrk = "HRK", // Croatian Kuna
        Huf = "HUF", // Hungarian Forint
        Idr = "IDR", // Indonesian Rupiah
        Ils = "ILS", // Israeli Shekel
        Inr = "INR", // Indian Rupee
        Isk = "ISK", // Icelandic Krona
        Jpy = "JPY", // Japanese Yen
        Kes = "KES", // Kenyan Shilling
        Krw = "KRW", // South Korean Won
        Kzt = "KZT", // Kazakhstani Tenge
        Mxn = "MXN", // Mexican Peso
        Myr = "MYR", // Malaysian Ringgit
        Ngn = "NGN", // Nigerian Naira
        Nok = "NOK", // Norwegian Krone
        Nzd = "NZD", // New Zealand Dollar
        Php = "PHP", // Philippine Peso
        Pln = "PLN", // Polish Zloty
        Ron = "RON", // Romanian Leu
        Rub = "RUB", // Russian Ruble
        Sar = "SAR", // Saudi Riyal
        Sek = "SEK", // Swedish Krona
        Sgd = "SGD", // Singapore Dollar
        Thb = "THB", // Thai Baht
        Try = "TRY", // Turkish Lira
        Twd = "TWD", // New Taiwan Dollar
        Uah = "UAH", // Ukrainian Hryvnia
        Usd = "USD", // US Dollar
        Vnd = "VND", // Vietnamese Dong
        Zar = "ZAR", // South African Rand
    }
}
