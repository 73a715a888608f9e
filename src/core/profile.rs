use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// ZUGFeRD / Factur-X / XRechnung conformance profile.
///
/// A bit-flag value: a document carries exactly one flag, while writers
/// gate elements on a *set* of flags combined with `|`. Profiles do not
/// nest implicitly; every allowed set is spelled out where it is used.
///
/// ```
/// use zugferd::Profile;
///
/// let allowed = Profile::COMFORT | Profile::EXTENDED;
/// assert!(Profile::EXTENDED.includes(allowed));
/// assert!(!Profile::BASIC.includes(allowed));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Profile(u16);

impl Profile {
    pub const UNKNOWN: Profile = Profile(0);
    pub const MINIMUM: Profile = Profile(1);
    pub const BASIC_WL: Profile = Profile(1 << 1);
    pub const BASIC: Profile = Profile(1 << 2);
    /// EN 16931.
    pub const COMFORT: Profile = Profile(1 << 3);
    pub const EXTENDED: Profile = Profile(1 << 4);
    /// XRechnung 1.x.
    pub const XRECHNUNG1: Profile = Profile(1 << 5);
    /// XRechnung 2.x / 3.x.
    pub const XRECHNUNG: Profile = Profile(1 << 6);

    const NAMES: [(Profile, &'static str); 7] = [
        (Profile::MINIMUM, "Minimum"),
        (Profile::BASIC_WL, "BasicWL"),
        (Profile::BASIC, "Basic"),
        (Profile::COMFORT, "Comfort"),
        (Profile::EXTENDED, "Extended"),
        (Profile::XRECHNUNG1, "XRechnung1"),
        (Profile::XRECHNUNG, "XRechnung"),
    ];

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn union(self, other: Profile) -> Profile {
        Profile(self.0 | other.0)
    }

    /// `true` when every flag of `other` is set in `self`.
    pub const fn contains(self, other: Profile) -> bool {
        self.0 & other.0 == other.0
    }

    /// `true` when `self` shares at least one flag with `allowed`.
    pub const fn includes(self, allowed: Profile) -> bool {
        self.0 & allowed.0 != 0
    }

    pub const fn is_unknown(self) -> bool {
        self.0 == 0
    }

    /// The guideline / customization identifier written for this profile.
    ///
    /// Returns `None` when the version has no identifier for the profile.
    pub fn identifier(self, version: ZugferdVersion) -> Option<&'static str> {
        identifier_table(version)
            .iter()
            .find(|(p, _)| *p == self)
            .map(|(_, id)| *id)
    }

    /// Map a guideline identifier read from a document back to its profile.
    ///
    /// Comparison ignores surrounding whitespace and ASCII case. Legacy
    /// aliases (e.g. `urn:ferd:invoice:1.0:basic`) are accepted.
    pub fn from_identifier(id: &str, version: ZugferdVersion) -> Profile {
        let id = id.trim();
        identifier_table(version)
            .iter()
            .find(|(_, known)| known.eq_ignore_ascii_case(id))
            .map(|(p, _)| *p)
            .unwrap_or(Profile::UNKNOWN)
    }

    /// Every identifier (primary and alias) accepted for a version.
    pub fn identifiers(version: ZugferdVersion) -> impl Iterator<Item = &'static str> {
        identifier_table(version).iter().map(|(_, id)| *id)
    }
}

impl BitOr for Profile {
    type Output = Profile;

    fn bitor(self, rhs: Profile) -> Profile {
        self.union(rhs)
    }
}

impl BitOrAssign for Profile {
    fn bitor_assign(&mut self, rhs: Profile) {
        *self = self.union(rhs);
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            return f.write_str("Unknown");
        }
        let mut first = true;
        for (flag, name) in Profile::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Schema generation of the CII family.
///
/// `Version23` covers ZUGFeRD 2.1, 2.2 and 2.3 (= Factur-X 1.0), which share
/// one schema. UBL documents are read and written as `Version23`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZugferdVersion {
    Version1,
    Version20,
    Version23,
}

/// XML syntax family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ZugferdFormat {
    /// UN/CEFACT Cross Industry Invoice (or ZUGFeRD 1.0 CrossIndustryDocument).
    #[default]
    Cii,
    /// OASIS UBL 2.1 Invoice / CreditNote.
    Ubl,
}

// The first entry for a profile is the one written; later entries are read-side aliases.

static VERSION1_IDS: &[(Profile, &str)] = &[
    (Profile::BASIC, "urn:ferd:CrossIndustryDocument:invoice:1p0:basic"),
    (Profile::COMFORT, "urn:ferd:CrossIndustryDocument:invoice:1p0:comfort"),
    (Profile::EXTENDED, "urn:ferd:CrossIndustryDocument:invoice:1p0:extended"),
    (Profile::BASIC, "urn:ferd:invoice:1.0:basic"),
    (Profile::COMFORT, "urn:ferd:invoice:1.0:comfort"),
    (Profile::EXTENDED, "urn:ferd:invoice:1.0:extended"),
    (Profile::BASIC, "urn:ferd:invoice:rc:basic"),
    (Profile::COMFORT, "urn:ferd:invoice:rc:comfort"),
    (Profile::EXTENDED, "urn:ferd:invoice:rc:extended"),
];

static VERSION20_IDS: &[(Profile, &str)] = &[
    (Profile::MINIMUM, "urn:zugferd.de:2p0:minimum"),
    (Profile::BASIC_WL, "urn:zugferd.de:2p0:basicwl"),
    (Profile::BASIC, "urn:cen.eu:en16931:2017#compliant#urn:zugferd.de:2p0:basic"),
    (Profile::COMFORT, "urn:cen.eu:en16931:2017"),
    (
        Profile::EXTENDED,
        "urn:cen.eu:en16931:2017#conformant#urn:zugferd.de:2p0:extended",
    ),
    (
        Profile::XRECHNUNG1,
        "urn:cen.eu:en16931:2017#compliant#urn:xoev-de:kosit:standard:xrechnung_1.2",
    ),
];

static VERSION23_IDS: &[(Profile, &str)] = &[
    (Profile::MINIMUM, "urn:factur-x.eu:1p0:minimum"),
    (Profile::BASIC_WL, "urn:factur-x.eu:1p0:basicwl"),
    (Profile::BASIC, "urn:cen.eu:en16931:2017#compliant#urn:factur-x.eu:1p0:basic"),
    (Profile::COMFORT, "urn:cen.eu:en16931:2017"),
    (
        Profile::EXTENDED,
        "urn:cen.eu:en16931:2017#conformant#urn:factur-x.eu:1p0:extended",
    ),
    (
        Profile::XRECHNUNG1,
        "urn:cen.eu:en16931:2017#compliant#urn:xoev-de:kosit:standard:xrechnung_1.2",
    ),
    (
        Profile::XRECHNUNG,
        "urn:cen.eu:en16931:2017#compliant#urn:xeinkauf.de:kosit:xrechnung_3.0",
    ),
    (
        Profile::XRECHNUNG,
        "urn:cen.eu:en16931:2017#compliant#urn:xoev-de:kosit:standard:xrechnung_2.0",
    ),
    (
        Profile::XRECHNUNG,
        "urn:cen.eu:en16931:2017#compliant#urn:xoev-de:kosit:standard:xrechnung_2.1",
    ),
    (
        Profile::XRECHNUNG,
        "urn:cen.eu:en16931:2017#compliant#urn:xoev-de:kosit:standard:xrechnung_2.2",
    ),
    (
        Profile::XRECHNUNG,
        "urn:cen.eu:en16931:2017#compliant#urn:xoev-de:kosit:standard:xrechnung_2.3",
    ),
    (
        Profile::EXTENDED,
        "urn:cen.eu:en16931:2017#conformant#urn:zugferd.de:2p1:extended",
    ),
    (Profile::BASIC, "urn:cen.eu:en16931:2017#compliant#urn:zugferd.de:2p1:basic"),
];

fn identifier_table(version: ZugferdVersion) -> &'static [(Profile, &'static str)] {
    match version {
        ZugferdVersion::Version1 => VERSION1_IDS,
        ZugferdVersion::Version20 => VERSION20_IDS,
        ZugferdVersion::Version23 => VERSION23_IDS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn includes_is_set_intersection() {
        let allowed = Profile::BASIC | Profile::COMFORT | Profile::EXTENDED;
        assert!(Profile::BASIC.includes(allowed));
        assert!(Profile::EXTENDED.includes(allowed));
        assert!(!Profile::MINIMUM.includes(allowed));
        assert!(!Profile::UNKNOWN.includes(allowed));
    }

    #[test]
    fn union_is_const() {
        const SET: Profile = Profile::MINIMUM.union(Profile::BASIC_WL);
        assert!(SET.contains(Profile::MINIMUM));
        assert!(SET.contains(Profile::BASIC_WL));
        assert!(!SET.contains(Profile::BASIC));
    }

    #[test]
    fn display_lists_flags() {
        assert_eq!(Profile::UNKNOWN.to_string(), "Unknown");
        assert_eq!(Profile::COMFORT.to_string(), "Comfort");
        assert_eq!(
            (Profile::BASIC | Profile::XRECHNUNG).to_string(),
            "Basic|XRechnung"
        );
    }

    #[test]
    fn primary_identifier_round_trips() {
        for version in [
            ZugferdVersion::Version1,
            ZugferdVersion::Version20,
            ZugferdVersion::Version23,
        ] {
            for (profile, _) in Profile::NAMES {
                if let Some(id) = profile.identifier(version) {
                    assert_eq!(Profile::from_identifier(id, version), profile, "{id}");
                }
            }
        }
    }

    #[test]
    fn en16931_is_comfort_in_both_cii_2_versions() {
        assert_eq!(
            Profile::from_identifier("urn:cen.eu:en16931:2017", ZugferdVersion::Version23),
            Profile::COMFORT
        );
        assert_eq!(
            Profile::from_identifier("urn:cen.eu:en16931:2017", ZugferdVersion::Version20),
            Profile::COMFORT
        );
    }

    #[test]
    fn legacy_and_xrechnung_aliases() {
        assert_eq!(
            Profile::from_identifier("urn:ferd:invoice:1.0:comfort", ZugferdVersion::Version1),
            Profile::COMFORT
        );
        assert_eq!(
            Profile::from_identifier(
                " urn:cen.eu:en16931:2017#compliant#urn:xoev-de:kosit:standard:xrechnung_2.2 ",
                ZugferdVersion::Version23
            ),
            Profile::XRECHNUNG
        );
        assert_eq!(
            Profile::XRECHNUNG.identifier(ZugferdVersion::Version23),
            Some("urn:cen.eu:en16931:2017#compliant#urn:xeinkauf.de:kosit:xrechnung_3.0")
        );
    }

    #[test]
    fn unknown_identifier_and_missing_profile() {
        assert_eq!(
            Profile::from_identifier("urn:example:nothing", ZugferdVersion::Version23),
            Profile::UNKNOWN
        );
        assert_eq!(Profile::MINIMUM.identifier(ZugferdVersion::Version1), None);
        assert_eq!(Profile::XRECHNUNG.identifier(ZugferdVersion::Version20), None);
    }
}
