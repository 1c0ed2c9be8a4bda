//! # Parser model
//!
//! Bundles the CRF weights and the static lexicons into a single immutable,
//! versioned artifact. A model is loaded (or built) once, then shared
//! read-only by every parse call; nothing in the crate mutates it afterwards.
//!
//! ## Built-in weights
//!
//! [`ParserModel::pretrained`] carries hand-set weights encoding the strong
//! regularities of US addresses: street suffixes follow street names, state
//! names precede ZIP codes, unit designators introduce unit identifiers,
//! and so on. Weights learned by actual CRF training (conditional maximum
//! likelihood) would be dropped in via the same artifact format; deriving
//! them is outside this crate.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::crf::CrfModel;
use crate::error::ModelError;
use crate::labels::AddressLabel::*;
use crate::lexicon::Lexicons;

/// Artifact format version accepted by this build.
pub const MODEL_VERSION: u32 = 1;

/// An immutable address-tagging model: CRF weights plus lexicons.
///
/// The lexicons are fixed reference data and are not stored in the
/// artifact; they are rebuilt whenever a model is constructed or loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserModel {
    pub version: u32,
    pub crf: CrfModel,
    #[serde(skip, default)]
    lexicons: Lexicons,
}

impl ParserModel {
    /// Build a model from existing CRF weights.
    pub fn from_crf(crf: CrfModel) -> Self {
        Self {
            version: MODEL_VERSION,
            crf,
            lexicons: Lexicons::new(),
        }
    }

    /// The built-in heuristic model.
    pub fn pretrained() -> Self {
        debug!("building pretrained address model");
        Self::from_crf(build_pretrained_crf())
    }

    /// Load a model artifact (JSON) from disk.
    ///
    /// Fails with a [`ModelError`] on I/O problems, malformed JSON or a
    /// version mismatch. A failed load is fatal: the caller gets no
    /// partially initialized model.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model: ParserModel =
            serde_json::from_str(&raw).map_err(|source| ModelError::Format {
                path: path.to_path_buf(),
                source,
            })?;
        if model.version != MODEL_VERSION {
            return Err(ModelError::Version {
                found: model.version,
                expected: MODEL_VERSION,
            });
        }
        info!(path = %path.display(), version = model.version, "loaded address model");
        Ok(model)
    }

    /// Write the model artifact (JSON) to disk.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        let path = path.as_ref();
        let raw = serde_json::to_string(self).map_err(|source| ModelError::Format {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, raw).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn lexicons(&self) -> &Lexicons {
        &self.lexicons
    }
}

/// Hand-set CRF weights for US addresses.
///
/// Emission weights reward the label a feature most often indicates;
/// transition weights encode the canonical component order
/// (number → street → place → state → ZIP, plus the PO Box and
/// intersection chains).
fn build_pretrained_crf() -> CrfModel {
    let mut m = CrfModel::new();

    // ===================================================================
    // Emissions (feature -> label)
    // ===================================================================

    // Leading house number
    m.set_emission("address_start", AddressNumber, 1.5);
    m.set_emission("digits=all", AddressNumber, 2.0);

    // ZIP codes: the shape feature dominates, position helps
    m.set_emission("zip_shape", ZipCode, 5.0);
    m.set_emission("digits=all", ZipCode, 0.5);
    m.set_emission("address_end", ZipCode, 1.0);

    // Street types and directionals from the lexicons
    m.set_emission("street_suffix", StreetNamePostType, 4.0);
    m.set_emission("street_suffix", StreetNamePreType, 0.5);
    m.set_emission("directional", StreetNamePreDirectional, 2.5);
    m.set_emission("directional", StreetNamePostDirectional, 2.0);

    // Occupancy: "Apt", "Suite", "#", identifier follows
    m.set_emission("unit_type", OccupancyType, 4.0);
    m.set_emission("word=#", OccupancyType, 1.0);
    m.set_emission("digits=some", OccupancyIdentifier, 1.0);
    m.set_emission("digits=all", OccupancyIdentifier, 0.5);
    m.set_emission("all_caps", OccupancyIdentifier, 0.5);

    // USPS box phrasing
    m.set_emission("word=po", USPSBoxType, 5.0);
    m.set_emission("word=box", USPSBoxType, 5.0);
    m.set_emission("word=drawer", USPSBoxType, 4.0);
    m.set_emission("word=rr", USPSBoxGroupType, 4.0);
    m.set_emission("word=hc", USPSBoxGroupType, 4.0);
    m.set_emission("digits=all", USPSBoxID, 1.0);

    // Intersections and corners
    m.set_emission("word=&", IntersectionSeparator, 5.0);
    m.set_emission("word=and", IntersectionSeparator, 2.0);
    m.set_emission("word=corner", CornerOf, 3.0);

    // Number suffix ("123 ½ Main")
    m.set_emission("word=½", AddressNumberSuffix, 4.0);

    // Pre-modifier ("Old State Rd")
    m.set_emission("word=old", StreetNamePreModifier, 1.5);

    // States: lexicon membership plus the all-caps two-letter shape
    m.set_emission("state", StateName, 4.5);
    m.set_emission("all_caps", StateName, 0.8);

    // Capitalized words default toward names
    m.set_emission("capitalized", StreetName, 0.8);
    m.set_emission("capitalized", PlaceName, 0.8);
    m.set_emission("capitalized", Recipient, 0.3);
    m.set_emission("address_start", Recipient, 0.5);

    // Separator punctuation carries no address content
    m.set_emission("is_punct", NotAddress, 4.0);

    // ===================================================================
    // Transitions (prev -> next), the canonical component order
    // ===================================================================

    m.set_transition(AddressNumberPrefix, AddressNumber, 3.0);

    m.set_transition(AddressNumber, AddressNumberSuffix, 1.5);
    m.set_transition(AddressNumber, StreetNamePreModifier, 1.0);
    m.set_transition(AddressNumber, StreetNamePreDirectional, 2.2);
    m.set_transition(AddressNumber, StreetNamePreType, 1.5);
    m.set_transition(AddressNumber, StreetName, 2.0);

    m.set_transition(AddressNumberSuffix, StreetName, 2.0);
    m.set_transition(AddressNumberSuffix, StreetNamePreDirectional, 1.5);
    m.set_transition(StreetNamePreModifier, StreetName, 2.0);
    m.set_transition(StreetNamePreDirectional, StreetName, 3.0);
    m.set_transition(StreetNamePreType, StreetName, 2.0);

    m.set_transition(StreetName, StreetName, 1.5);
    m.set_transition(StreetName, StreetNamePostType, 3.0);

    m.set_transition(StreetNamePostType, StreetNamePostDirectional, 2.0);
    m.set_transition(StreetNamePostType, PlaceName, 1.0);
    m.set_transition(StreetNamePostType, OccupancyType, 1.5);
    m.set_transition(StreetNamePostType, IntersectionSeparator, 1.0);
    m.set_transition(StreetNamePostDirectional, PlaceName, 1.0);
    m.set_transition(StreetNamePostDirectional, OccupancyType, 1.0);

    m.set_transition(OccupancyType, OccupancyIdentifier, 3.5);
    m.set_transition(OccupancyIdentifier, PlaceName, 0.8);
    m.set_transition(SubaddressType, SubaddressIdentifier, 3.0);

    m.set_transition(PlaceName, PlaceName, 2.0);
    m.set_transition(PlaceName, StateName, 2.5);
    m.set_transition(StateName, ZipCode, 3.5);

    m.set_transition(USPSBoxType, USPSBoxType, 2.5);
    m.set_transition(USPSBoxType, USPSBoxID, 3.0);
    m.set_transition(USPSBoxID, PlaceName, 0.8);
    m.set_transition(USPSBoxGroupType, USPSBoxGroupID, 3.0);
    m.set_transition(USPSBoxGroupID, USPSBoxType, 2.5);

    m.set_transition(IntersectionSeparator, StreetName, 2.0);
    m.set_transition(IntersectionSeparator, StreetNamePreDirectional, 1.5);
    m.set_transition(CornerOf, CornerOf, 2.0);
    m.set_transition(CornerOf, StreetName, 2.0);

    m.set_transition(Recipient, Recipient, 1.5);
    m.set_transition(Recipient, AddressNumber, 1.0);

    // Separator tokens bridge into the next component
    m.set_transition(NotAddress, PlaceName, 0.5);
    m.set_transition(NotAddress, StateName, 0.6);
    m.set_transition(NotAddress, StreetName, 0.3);
    m.set_transition(NotAddress, OccupancyType, 0.3);

    m
}
