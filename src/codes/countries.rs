//! ISO 3166-1 alpha-2 country codes.
//!
//! European trading partners plus the major non-European economies.

code_list! {
    /// ISO 3166-1 alpha-2 country code.
    pub enum CountryCode {
        /// Andorra
        Ad = "AD",
        /// United Arab Emirates
        Ae = "AE",
        /// Austria
        At = "AT",
        /// Australia
        Au = "AU",
        /// Belgium
        Be = "BE",
        /// Bulgaria
        Bg = "BG",
        /// Brazil
        Br = "BR",
        /// Canada
        Ca = "CA",
        /// Switzerland
        Ch = "CH",
        /// China
        Cn = "CN",
        /// Cyprus
        Cy = "CY",
        /// Czechia
        Cz = "CZ",
        /// Germany
        De = "DE",
        /// Denmark
        Dk = "DK",
        /// Estonia
        Ee = "EE",
        /// Spain
        Es = "ES",
        /// Finland
        Fi = "FI",
        /// France
        Fr = "FR",
        /// United Kingdom
        Gb = "GB",
        /// Greece
        Gr = "GR",
        /// Hong Kong
        Hk = "HK",
        /// Croatia
        Hr = "HR",
        /// Hungary
        Hu = "HU",
        /// Ireland
        Ie = "IE",
        /// Israel
        Il = "IL",
        /// India
        In = "IN",
        /// Iceland
        Is = "IS",
        /// Italy
        It = "IT",
        /// Japan
        Jp = "JP",
        /// Korea, Republic of
        Kr = "KR",
        /// Liechtenstein
        Li = "LI",
        /// Lithuania
        Lt = "LT",
        /// Luxembourg
        Lu = "LU",
        /// Latvia
        Lv = "LV",
        /// Monaco
        Mc = "MC",
        /// Malta
        Mt = "MT",
        /// Mexico
        Mx = "MX",
        /// Netherlands
        Nl = "NL",
        /// Norway
        No = "NO",
        /// New Zealand
        Nz = "NZ",
        /// Poland
        Pl = "PL",
        /// Portugal
        Pt = "PT",
        /// Romania
        Ro = "RO",
        /// Serbia
        Rs = "RS",
        /// Sweden
        Se = "SE",
        /// Singapore
        Sg = "SG",
        /// Slovenia
        Si = "SI",
        /// Slovakia
        Sk = "SK",
        /// San Marino
        Sm = "SM",
        /// Turkey
        Tr = "TR",
        /// Ukraine
        Ua = "UA",
        /// United States
        Us = "US",
        /// Holy See
        Va = "VA",
        /// South Africa
        Za = "ZA",
    }
}
