//! # Address component labels
//!
//! The closed set of labels a token can receive, taken from the *United
//! States Thoroughfare, Landmark, and Postal Address Data Standard*
//! (<http://www.urisa.org/advocacy/united-states-thoroughfare-landmark-and-postal-address-data-standard>).
//!
//! Every token of an input address is assigned exactly one of these labels
//! by the decoder. [`NotAddress`](AddressLabel::NotAddress) is the fallback
//! for tokens that are not part of any address component.

use serde::{Deserialize, Serialize};

use crate::tokenizer::Token;

/// A component label for a single address token.
///
/// The discriminant order is the canonical label index used by the CRF
/// transition matrix and the Viterbi lattice, so it must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressLabel {
    /// Prefix before the address number, e.g. the "Mile" in "Mile 1234".
    AddressNumberPrefix,
    /// The civic number, e.g. **123** Main St.
    AddressNumber,
    /// Suffix directly after the number, e.g. the "½" in "123 ½ Main St".
    AddressNumberSuffix,
    /// Modifier before any street type/directional, e.g. **Old** State Rd.
    StreetNamePreModifier,
    /// Directional before the street name, e.g. 123 **N** Main St.
    StreetNamePreDirectional,
    /// Street type before the name, e.g. 500 **Avenue** B.
    StreetNamePreType,
    /// The street name proper, e.g. 123 **Main** St.
    StreetName,
    /// Street type after the name, e.g. 123 Main **St**.
    StreetNamePostType,
    /// Directional after the street type, e.g. 123 Main St **NW**.
    StreetNamePostDirectional,
    /// Subaddress type, e.g. the "Bldg" in "Bldg 3".
    SubaddressType,
    /// Subaddress identifier following a subaddress type.
    SubaddressIdentifier,
    /// A named building, e.g. "Sears Tower".
    BuildingName,
    /// Occupancy type, e.g. **Apt**, **Suite**, **#**.
    OccupancyType,
    /// Occupancy identifier, e.g. Apt **4B**.
    OccupancyIdentifier,
    /// The "corner of" phrasing in intersection addresses.
    CornerOf,
    /// A named landmark, e.g. "Wrigley Field".
    LandmarkName,
    /// City, town or other place name.
    PlaceName,
    /// State name or two-letter abbreviation.
    StateName,
    /// 5-digit or ZIP+4 postal code.
    ZipCode,
    /// USPS box type, e.g. **PO Box**, **Drawer**.
    USPSBoxType,
    /// USPS box identifier, e.g. PO Box **123**.
    USPSBoxID,
    /// USPS box group type, e.g. the "RR" in "RR 2 Box 152".
    USPSBoxGroupType,
    /// USPS box group identifier, e.g. the "2" in "RR 2 Box 152".
    USPSBoxGroupID,
    /// The "&" or "and" joining two streets of an intersection.
    IntersectionSeparator,
    /// Addressee, e.g. a person or business name ahead of the address.
    Recipient,
    /// Anything that is not part of an address.
    NotAddress,
}

impl AddressLabel {
    /// Number of labels in the vocabulary.
    pub const COUNT: usize = 26;

    /// Canonical index of this label (row/column in the transition matrix).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// All labels in canonical index order.
    pub fn all() -> [AddressLabel; Self::COUNT] {
        use AddressLabel::*;
        [
            AddressNumberPrefix,
            AddressNumber,
            AddressNumberSuffix,
            StreetNamePreModifier,
            StreetNamePreDirectional,
            StreetNamePreType,
            StreetName,
            StreetNamePostType,
            StreetNamePostDirectional,
            SubaddressType,
            SubaddressIdentifier,
            BuildingName,
            OccupancyType,
            OccupancyIdentifier,
            CornerOf,
            LandmarkName,
            PlaceName,
            StateName,
            ZipCode,
            USPSBoxType,
            USPSBoxID,
            USPSBoxGroupType,
            USPSBoxGroupID,
            IntersectionSeparator,
            Recipient,
            NotAddress,
        ]
    }

    /// Label name as used in model files and grouped output.
    pub fn name(&self) -> &'static str {
        use AddressLabel::*;
        match self {
            AddressNumberPrefix => "AddressNumberPrefix",
            AddressNumber => "AddressNumber",
            AddressNumberSuffix => "AddressNumberSuffix",
            StreetNamePreModifier => "StreetNamePreModifier",
            StreetNamePreDirectional => "StreetNamePreDirectional",
            StreetNamePreType => "StreetNamePreType",
            StreetName => "StreetName",
            StreetNamePostType => "StreetNamePostType",
            StreetNamePostDirectional => "StreetNamePostDirectional",
            SubaddressType => "SubaddressType",
            SubaddressIdentifier => "SubaddressIdentifier",
            BuildingName => "BuildingName",
            OccupancyType => "OccupancyType",
            OccupancyIdentifier => "OccupancyIdentifier",
            CornerOf => "CornerOf",
            LandmarkName => "LandmarkName",
            PlaceName => "PlaceName",
            StateName => "StateName",
            ZipCode => "ZipCode",
            USPSBoxType => "USPSBoxType",
            USPSBoxID => "USPSBoxID",
            USPSBoxGroupType => "USPSBoxGroupType",
            USPSBoxGroupID => "USPSBoxGroupID",
            IntersectionSeparator => "IntersectionSeparator",
            Recipient => "Recipient",
            NotAddress => "NotAddress",
        }
    }

    /// Parse a label from its name.
    pub fn from_name(s: &str) -> Option<Self> {
        AddressLabel::all().into_iter().find(|l| l.name() == s)
    }

    /// Whether this label is one of the street-name family. Used to key
    /// the second street of an intersection separately in grouped output.
    pub fn is_street_name_part(&self) -> bool {
        self.name().contains("StreetName")
    }
}

impl std::fmt::Display for AddressLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A token with the label the decoder assigned to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedToken {
    pub token: Token,
    pub label: AddressLabel,
    /// Softmax confidence of this assignment (0.0 to 1.0).
    pub confidence: f64,
}
