//! # Address parsing pipeline
//!
//! Orchestrates the full pipeline: tokenize → extract features → Viterbi
//! decode → assemble output. [`AddressParser`] is an explicit handle over an
//! immutable [`ParserModel`]; callers construct one (or use the crate-level
//! [`parse`]/[`tag`] convenience functions backed by a process-wide default)
//! and reuse it freely across threads.
//!
//! Two call shapes are exposed, mirroring the two things callers want:
//!
//! - [`AddressParser::parse`] — one `(token, label)` pair per token, in
//!   input order.
//! - [`AddressParser::tag`] — consecutive same-label runs grouped into an
//!   ordered component list plus an overall address classification.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ModelError, ParseError};
use crate::features::extract_features;
use crate::labels::{AddressLabel, TaggedToken};
use crate::model::ParserModel;
use crate::tokenizer::{tokenize, Token};
use crate::viterbi::{scores_to_probs, viterbi_decode};

/// Environment variable holding a model artifact path that overrides the
/// built-in weights for the process-wide default parser.
pub const MODEL_PATH_ENV: &str = "USADDR_MODEL_PATH";

/// Overall shape of a tagged address, derived from which labels occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressType {
    /// Has an address number and no intersection separator.
    StreetAddress,
    /// Two streets joined by a separator, no address number.
    Intersection,
    /// Contains a USPS box identifier.
    PoBox,
    /// None of the above patterns matched cleanly.
    Ambiguous,
}

impl std::fmt::Display for AddressType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AddressType::StreetAddress => "Street Address",
            AddressType::Intersection => "Intersection",
            AddressType::PoBox => "PO Box",
            AddressType::Ambiguous => "Ambiguous",
        };
        write!(f, "{s}")
    }
}

/// One grouped component of a tagged address.
///
/// `label` is the label name, with a `"Second "` prefix for street
/// components that follow an intersection separator (so both streets of
/// "Main St & 1st Ave" keep distinct keys).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponent {
    pub label: String,
    pub text: String,
}

/// Grouped output of [`AddressParser::tag`]: ordered components plus the
/// overall address classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedAddress {
    pub components: Vec<AddressComponent>,
    pub address_type: AddressType,
}

impl TaggedAddress {
    /// The text of the first component with the given label, if any.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.components
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.text.as_str())
    }
}

/// A handle over a loaded model, ready to parse addresses.
///
/// Construction is the only state transition: once built, the parser is
/// immutable, `Sync`, and every method is a pure function of its input.
pub struct AddressParser {
    model: ParserModel,
}

impl AddressParser {
    /// Parser over the built-in pretrained weights.
    pub fn new() -> Self {
        Self {
            model: ParserModel::pretrained(),
        }
    }

    /// Parser over an explicitly constructed model.
    pub fn with_model(model: ParserModel) -> Self {
        Self { model }
    }

    /// Parser over a model artifact loaded from disk.
    pub fn from_model_path(path: impl AsRef<std::path::Path>) -> Result<Self, ModelError> {
        Ok(Self {
            model: ParserModel::from_path(path)?,
        })
    }

    pub fn model(&self) -> &ParserModel {
        &self.model
    }

    /// Parse an address into one labeled token per input token.
    ///
    /// Empty or whitespace-only input yields an empty vector. Output length
    /// always equals the token count, and the call is deterministic.
    pub fn parse(&self, address: &str) -> Vec<TaggedToken> {
        let tokens = tokenize(address);
        if tokens.is_empty() {
            return vec![];
        }
        debug!(tokens = tokens.len(), "parsing address");

        let features = extract_features(&tokens, self.model.lexicons());
        let result = viterbi_decode(&self.model.crf, &features);

        tokens
            .into_iter()
            .zip(result.best_sequence.iter())
            .enumerate()
            .map(|(i, (token, label))| {
                let probs = scores_to_probs(&result.lattice[i]);
                let confidence = probs.get(label.index()).copied().unwrap_or(0.5);
                TaggedToken {
                    token,
                    label: *label,
                    confidence,
                }
            })
            .collect()
    }

    /// Just the label sequence, aligned with the token sequence.
    pub fn tag_labels(&self, address: &str) -> Vec<AddressLabel> {
        self.parse(address).into_iter().map(|t| t.label).collect()
    }

    /// Parse several addresses in parallel.
    pub fn parse_batch<S: AsRef<str> + Sync>(&self, addresses: &[S]) -> Vec<Vec<TaggedToken>> {
        addresses
            .par_iter()
            .map(|a| self.parse(a.as_ref()))
            .collect()
    }

    /// Group a parse into ordered (label, text) components and classify the
    /// address.
    ///
    /// Separator punctuation tokens (commas, periods, parentheses) are
    /// dropped before grouping; `&` and `#` are kept since they carry
    /// meaning. Each label is expected to form at most one consecutive run;
    /// a label recurring in a disjoint run fails with
    /// [`ParseError::RepeatedLabel`]. Street-family labels after an
    /// intersection separator are re-keyed with a `"Second "` prefix.
    pub fn tag(&self, address: &str) -> Result<TaggedAddress, ParseError> {
        self.tag_with_mapping(address, &HashMap::new())
    }

    /// Like [`tag`](Self::tag), with label names remapped before grouping.
    ///
    /// Labels absent from `mapping` keep their own names. Adjacent tokens
    /// whose labels map to the same name merge into a single component, so a
    /// mapping can e.g. collapse `StreetName` and `StreetNamePostType` into
    /// one `"Street"` value.
    pub fn tag_with_mapping(
        &self,
        address: &str,
        mapping: &HashMap<String, String>,
    ) -> Result<TaggedAddress, ParseError> {
        let tagged = self.parse(address);
        if tagged.is_empty() {
            return Err(ParseError::InvalidInput);
        }

        let mut components: Vec<(String, Vec<String>)> = Vec::new();
        let mut last_key: Option<String> = None;
        let mut saw_intersection = false;
        let mut saw_address_number = false;
        let mut saw_box_id = false;

        for tt in &tagged {
            if is_separator_token(&tt.token) {
                continue;
            }

            if tt.label == AddressLabel::IntersectionSeparator {
                saw_intersection = true;
            }
            saw_address_number |= tt.label == AddressLabel::AddressNumber;
            saw_box_id |= tt.label == AddressLabel::USPSBoxID;

            let name = tt.label.name();
            let mut key = mapping
                .get(name)
                .map(String::as_str)
                .unwrap_or(name)
                .to_string();
            if saw_intersection
                && tt.label.is_street_name_part()
                && tt.label != AddressLabel::IntersectionSeparator
            {
                key = format!("Second {key}");
            }

            if last_key.as_deref() == Some(key.as_str()) {
                if let Some((_, parts)) = components.last_mut() {
                    parts.push(tt.token.text.clone());
                }
            } else if components.iter().any(|(k, _)| *k == key) {
                return Err(ParseError::RepeatedLabel {
                    label: key,
                    parse: tagged
                        .iter()
                        .map(|t| (t.token.text.clone(), t.label.name().to_string()))
                        .collect(),
                });
            } else {
                components.push((key.clone(), vec![tt.token.text.clone()]));
            }
            last_key = Some(key);
        }

        let address_type = if saw_address_number && !saw_intersection {
            AddressType::StreetAddress
        } else if saw_intersection && !saw_address_number {
            AddressType::Intersection
        } else if saw_box_id {
            AddressType::PoBox
        } else {
            AddressType::Ambiguous
        };

        let components = components
            .into_iter()
            .map(|(label, parts)| AddressComponent {
                label,
                text: parts.join(" ").trim_matches([' ', ',', ';']).to_string(),
            })
            .collect();

        Ok(TaggedAddress {
            components,
            address_type,
        })
    }
}

impl Default for AddressParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Punctuation tokens that only separate components. `&` and `#` are not
/// separators: one marks an intersection, the other an occupancy.
fn is_separator_token(token: &Token) -> bool {
    token.text != "&"
        && token.text != "#"
        && token.text.chars().all(|c| !c.is_alphanumeric())
}

static DEFAULT_PARSER: OnceLock<Result<AddressParser, Arc<ModelError>>> = OnceLock::new();

/// The process-wide default parser, initialized exactly once.
///
/// Honors [`MODEL_PATH_ENV`]; if that load fails, the [`ModelError`] is
/// recorded and every subsequent call reports
/// [`ParseError::ModelNotLoaded`] rather than silently falling back to the
/// built-in weights.
fn default_parser() -> Result<&'static AddressParser, ParseError> {
    let slot = DEFAULT_PARSER.get_or_init(|| match std::env::var_os(MODEL_PATH_ENV) {
        Some(path) => AddressParser::from_model_path(&path).map_err(Arc::new),
        None => Ok(AddressParser::new()),
    });
    slot.as_ref()
        .map_err(|source| ParseError::ModelNotLoaded(source.clone()))
}

/// Parse with the process-wide default parser. See [`AddressParser::parse`].
pub fn parse(address: &str) -> Result<Vec<TaggedToken>, ParseError> {
    Ok(default_parser()?.parse(address))
}

/// Tag with the process-wide default parser. See [`AddressParser::tag`].
pub fn tag(address: &str) -> Result<TaggedAddress, ParseError> {
    default_parser()?.tag(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crf::CrfModel;
    use crate::tokenizer::tokenize;

    fn component_labels(tagged: &TaggedAddress) -> Vec<&str> {
        tagged.components.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn every_token_gets_exactly_one_label() {
        let parser = AddressParser::new();
        for input in [
            "123 Main St, Springfield, IL 62704",
            "PO Box 123",
            "X",
            "456 E Main St Apt 4B Denver CO 80203",
        ] {
            let tokens = tokenize(input);
            let tagged = parser.parse(input);
            assert_eq!(tagged.len(), tokens.len());
        }
    }

    #[test]
    fn parse_is_deterministic() {
        let parser = AddressParser::new();
        let input = "123 Main St, Springfield, IL 62704";
        let a: Vec<_> = parser.tag_labels(input);
        let b: Vec<_> = parser.tag_labels(input);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_input_policies() {
        let parser = AddressParser::new();
        // parse is lenient
        assert!(parser.parse("").is_empty());
        assert!(parser.parse("   ").is_empty());
        // tag is strict
        assert!(matches!(parser.tag(""), Err(ParseError::InvalidInput)));
    }

    #[test]
    fn street_address_scenario() {
        let parser = AddressParser::new();
        let tagged = parser.tag("123 Main St, Springfield, IL 62704").unwrap();

        assert_eq!(
            component_labels(&tagged),
            vec![
                "AddressNumber",
                "StreetName",
                "StreetNamePostType",
                "PlaceName",
                "StateName",
                "ZipCode",
            ]
        );
        assert_eq!(tagged.get("AddressNumber"), Some("123"));
        assert_eq!(tagged.get("StreetName"), Some("Main"));
        assert_eq!(tagged.get("StreetNamePostType"), Some("St"));
        assert_eq!(tagged.get("PlaceName"), Some("Springfield"));
        assert_eq!(tagged.get("StateName"), Some("IL"));
        assert_eq!(tagged.get("ZipCode"), Some("62704"));
        assert_eq!(tagged.address_type, AddressType::StreetAddress);
    }

    #[test]
    fn directional_and_occupancy() {
        let parser = AddressParser::new();
        let tagged = parser.tag("456 E Main St Apt 4B Denver CO 80203").unwrap();

        assert_eq!(tagged.get("AddressNumber"), Some("456"));
        assert_eq!(tagged.get("StreetNamePreDirectional"), Some("E"));
        assert_eq!(tagged.get("StreetName"), Some("Main"));
        assert_eq!(tagged.get("StreetNamePostType"), Some("St"));
        assert_eq!(tagged.get("OccupancyType"), Some("Apt"));
        assert_eq!(tagged.get("OccupancyIdentifier"), Some("4B"));
        assert_eq!(tagged.get("StateName"), Some("CO"));
        assert_eq!(tagged.get("ZipCode"), Some("80203"));
    }

    #[test]
    fn po_box() {
        let parser = AddressParser::new();
        let tagged = parser.tag("PO Box 152, Springfield, IL 62704").unwrap();

        assert_eq!(tagged.get("USPSBoxType"), Some("PO Box"));
        assert_eq!(tagged.get("USPSBoxID"), Some("152"));
        assert_eq!(tagged.get("ZipCode"), Some("62704"));
        assert_eq!(tagged.address_type, AddressType::PoBox);
    }

    #[test]
    fn intersection_keys_second_street() {
        let parser = AddressParser::new();
        let tagged = parser.tag("Main St & Church Ave").unwrap();

        assert_eq!(tagged.get("StreetName"), Some("Main"));
        assert_eq!(tagged.get("StreetNamePostType"), Some("St"));
        assert_eq!(tagged.get("IntersectionSeparator"), Some("&"));
        assert_eq!(tagged.get("Second StreetName"), Some("Church"));
        assert_eq!(tagged.get("Second StreetNamePostType"), Some("Ave"));
        assert_eq!(tagged.address_type, AddressType::Intersection);
    }

    #[test]
    fn tag_mapping_remaps_before_grouping() {
        let parser = AddressParser::new();
        let mapping = HashMap::from([
            ("StreetName".to_string(), "Street".to_string()),
            ("StreetNamePostType".to_string(), "Street".to_string()),
        ]);
        let tagged = parser
            .tag_with_mapping("123 Main St, Springfield, IL 62704", &mapping)
            .unwrap();

        // adjacent labels remapped to the same name merge into one component
        assert_eq!(tagged.get("Street"), Some("Main St"));
        assert!(tagged.get("StreetName").is_none());
        assert!(tagged.get("StreetNamePostType").is_none());
        // unmapped labels keep their own names
        assert_eq!(tagged.get("PlaceName"), Some("Springfield"));
    }

    #[test]
    fn repeated_label_is_an_error() {
        // a hand-built model that forces PlaceName, StreetName, PlaceName
        let mut crf = CrfModel::new();
        crf.set_emission("word=alpha", AddressLabel::PlaceName, 5.0);
        crf.set_emission("word=beta", AddressLabel::StreetName, 5.0);
        let parser = AddressParser::with_model(ParserModel::from_crf(crf));

        let err = parser.tag("Alpha Beta Alpha").unwrap_err();
        match err {
            ParseError::RepeatedLabel { label, parse } => {
                assert_eq!(label, "PlaceName");
                assert_eq!(parse.len(), 3);
            }
            other => panic!("expected RepeatedLabel, got {other:?}"),
        }
    }

    #[test]
    fn grouping_drops_separator_punctuation() {
        let parser = AddressParser::new();
        let tagged = parser.tag("123 Main St, Springfield, IL 62704").unwrap();
        for component in &tagged.components {
            assert!(!component.text.contains(','));
            assert!(!component.text.is_empty());
        }
    }

    #[test]
    fn batch_matches_sequential() {
        let parser = AddressParser::new();
        let inputs = vec![
            "123 Main St, Springfield, IL 62704".to_string(),
            "PO Box 152".to_string(),
            "".to_string(),
        ];
        let batch = parser.parse_batch(&inputs);
        for (input, out) in inputs.iter().zip(&batch) {
            let seq = parser.parse(input);
            assert_eq!(out.len(), seq.len());
            for (a, b) in out.iter().zip(&seq) {
                assert_eq!(a.label, b.label);
                assert_eq!(a.token, b.token);
            }
        }
    }

    #[test]
    fn confidences_are_probabilities() {
        let parser = AddressParser::new();
        for tt in parser.parse("123 Main St, Springfield, IL 62704") {
            assert!(tt.confidence > 0.0 && tt.confidence <= 1.0);
        }
    }

    #[test]
    fn default_parser_convenience() {
        let tagged = parse("123 Main St, Springfield, IL 62704").unwrap();
        assert_eq!(tagged.len(), 8);
        let grouped = tag("123 Main St, Springfield, IL 62704").unwrap();
        assert_eq!(grouped.address_type, AddressType::StreetAddress);
    }
}
