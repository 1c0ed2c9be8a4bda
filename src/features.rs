//! # Feature extraction
//!
//! Converts each token, in the context of its neighbors, into a sparse
//! vector of named features consumed by the CRF. Features cover:
//!
//! - **Shape**: digit class, length bucket, casing, vowels, trailing zeros,
//!   ZIP shape.
//! - **Lexicon membership**: street suffix, directional, unit designator,
//!   state name (see [`crate::lexicon`]).
//! - **Position**: sequence start/end, normalized offset.
//! - **Context**: the same shape and lexicon features of the tokens at
//!   offsets -2..+2, re-emitted under `prev2:`/`prev:`/`next:`/`next2:`
//!   prefixes so they never collide with the token's own features.
//!
//! Extraction is pure and never fails: a token matching no lexicon simply
//! activates fewer features.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::lexicon::Lexicons;
use crate::tokenizer::Token;

/// Sparse feature vector for one token.
///
/// A sparse `HashMap<String, f64>` is used because the feature space is
/// unbounded (`word=main`, `word=springfield`, ...) while each token only
/// activates a handful of entries. Most features are binary (1.0), but f64
/// values admit continuous features such as `relative_position`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Active features, e.g. `{"street_suffix": 1.0, "word=st": 1.0}`.
    pub features: HashMap<String, f64>,
    /// Index of the token this vector describes.
    pub token_index: usize,
}

impl FeatureVector {
    pub fn new(token_index: usize) -> Self {
        Self {
            features: HashMap::new(),
            token_index,
        }
    }

    /// Insert a feature, binary (1.0) or continuous.
    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.features.insert(key.into(), value);
    }

    /// Dot product against a named weight map.
    pub fn dot(&self, weights: &HashMap<String, f64>) -> f64 {
        self.features
            .iter()
            .map(|(k, v)| v * weights.get(k).unwrap_or(&0.0))
            .sum()
    }
}

fn zip_shape_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{5}(-\d{4})?$").unwrap())
}

/// Strip non-word punctuation from both ends of a token, keeping interior
/// periods ("P.O." stays intact until the dots are removed for lookups).
/// The special address glyphs `&`, `#` and `½` are preserved as-is.
pub fn clean_token(raw: &str) -> String {
    if matches!(raw, "&" | "#" | "½") {
        return raw.to_string();
    }
    raw.trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim_end_matches(|c: char| !c.is_alphanumeric() && c != '.')
        .to_string()
}

/// Lowercased, dot-free form used for lexicon lookups and `word=` identity.
pub fn abbrev_form(clean: &str) -> String {
    clean.to_lowercase().replace('.', "")
}

/// Generate feature vectors for a whole token sequence.
///
/// The output is aligned with the input: entry `i` describes token `i`.
pub fn extract_features(tokens: &[Token], lexicons: &Lexicons) -> Vec<FeatureVector> {
    tokens
        .iter()
        .enumerate()
        .map(|(i, _)| extract_for_token(tokens, i, lexicons))
        .collect()
}

/// Extract features for the token at `i` within its context window.
pub fn extract_for_token(tokens: &[Token], i: usize, lexicons: &Lexicons) -> FeatureVector {
    let mut fv = FeatureVector::new(i);

    fv.insert("bias", 1.0);
    token_features(&mut fv, &tokens[i].text, "", lexicons);

    // Position in the sequence
    if i == 0 {
        fv.insert("address_start", 1.0);
    }
    if i == tokens.len() - 1 {
        fv.insert("address_end", 1.0);
    }
    fv.insert("relative_position", i as f64 / tokens.len() as f64);

    // Context window -2..+2, each offset under its own prefix
    let window: [(isize, &str); 4] = [(-2, "prev2:"), (-1, "prev:"), (1, "next:"), (2, "next2:")];
    for (offset, prefix) in window {
        let j = i as isize + offset;
        if j < 0 || j as usize >= tokens.len() {
            continue;
        }
        let j = j as usize;
        token_features(&mut fv, &tokens[j].text, prefix, lexicons);
        if j == 0 {
            fv.insert(format!("{prefix}address_start"), 1.0);
        }
        if j == tokens.len() - 1 {
            fv.insert(format!("{prefix}address_end"), 1.0);
        }
    }

    fv
}

/// Shape and lexicon features of a single token, emitted under `prefix`.
fn token_features(fv: &mut FeatureVector, raw: &str, prefix: &str, lexicons: &Lexicons) {
    let clean = clean_token(raw);
    let abbrev = abbrev_form(&clean);
    let is_digit = !abbrev.is_empty() && abbrev.chars().all(|c| c.is_ascii_digit());

    // Identity (digit strings are left to the shape features, as the
    // endless stream of house numbers would otherwise swamp the weights)
    if !is_digit && !abbrev.is_empty() {
        fv.insert(format!("{prefix}word={abbrev}"), 1.0);
    }

    // Digit class
    let digit_class = if is_digit {
        "all"
    } else if abbrev.chars().any(|c| c.is_ascii_digit()) {
        "some"
    } else {
        "no"
    };
    fv.insert(format!("{prefix}digits={digit_class}"), 1.0);

    // Length bucket, separate namespaces for digit and word tokens
    let bucket = if is_digit { 'd' } else { 'w' };
    fv.insert(format!("{prefix}length={bucket}:{}", abbrev.chars().count()), 1.0);

    // Trailing-period abbreviation ("St.", "N.")
    if clean.ends_with('.') {
        fv.insert(format!("{prefix}abbrev"), 1.0);
    }

    // Vowels past the first character distinguish words from abbreviations
    if abbrev.chars().skip(1).any(|c| "aeiou".contains(c)) {
        fv.insert(format!("{prefix}has_vowels"), 1.0);
    }

    // Run of trailing zeros on digit tokens ("00" for "7400")
    if is_digit && abbrev.ends_with('0') {
        let zeros: String = abbrev
            .chars()
            .rev()
            .take_while(|c| *c == '0')
            .collect();
        fv.insert(format!("{prefix}trailing_zeros={zeros}"), 1.0);
    }

    // Casing shape of the raw token
    let first_upper = raw.chars().next().map(|c| c.is_uppercase()).unwrap_or(false);
    let all_upper = raw.chars().all(|c| c.is_uppercase() || !c.is_alphabetic());
    let upper_in_middle = raw.chars().skip(1).any(|c| c.is_uppercase());
    if first_upper {
        fv.insert(format!("{prefix}capitalized"), 1.0);
    }
    if all_upper && raw.chars().any(|c| c.is_alphabetic()) {
        fv.insert(format!("{prefix}all_caps"), 1.0);
    }
    if first_upper && upper_in_middle {
        fv.insert(format!("{prefix}mixed_case"), 1.0);
    }
    if raw.chars().count() == 1 && !raw.chars().next().unwrap().is_alphanumeric() {
        fv.insert(format!("{prefix}is_punct"), 1.0);
    }

    // ZIP shape (12345 or 12345-6789) on the cleaned form
    if zip_shape_regex().is_match(clean.trim_end_matches('.')) {
        fv.insert(format!("{prefix}zip_shape"), 1.0);
    }

    // Lexicon membership on the abbreviated form
    if lexicons.is_street_suffix(&abbrev) {
        fv.insert(format!("{prefix}street_suffix"), 1.0);
    }
    if lexicons.is_directional(&abbrev) {
        fv.insert(format!("{prefix}directional"), 1.0);
    }
    if lexicons.is_unit_type(&abbrev) || raw == "#" {
        fv.insert(format!("{prefix}unit_type"), 1.0);
    }
    if lexicons.is_state(&abbrev) {
        fv.insert(format!("{prefix}state"), 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn features_for(input: &str) -> Vec<FeatureVector> {
        let tokens = tokenize(input);
        extract_features(&tokens, &Lexicons::new())
    }

    #[test]
    fn output_is_aligned_with_input() {
        let tokens = tokenize("123 Main St, Springfield, IL 62704");
        let fvs = extract_features(&tokens, &Lexicons::new());
        assert_eq!(fvs.len(), tokens.len());
        for (i, fv) in fvs.iter().enumerate() {
            assert_eq!(fv.token_index, i);
        }
    }

    #[test]
    fn digit_classes() {
        let fvs = features_for("123 4B Main");
        assert!(fvs[0].features.contains_key("digits=all"));
        assert!(fvs[1].features.contains_key("digits=some"));
        assert!(fvs[2].features.contains_key("digits=no"));
    }

    #[test]
    fn digit_tokens_have_no_word_identity() {
        let fvs = features_for("123 Main");
        assert!(!fvs[0].features.keys().any(|k| k.starts_with("word=")));
        assert!(fvs[1].features.contains_key("word=main"));
    }

    #[test]
    fn lexicon_features() {
        let fvs = features_for("123 N Main St Apt 4 IL");
        assert!(fvs[1].features.contains_key("directional"));
        assert!(fvs[3].features.contains_key("street_suffix"));
        assert!(fvs[4].features.contains_key("unit_type"));
        assert!(fvs[6].features.contains_key("state"));
        // unknown words simply lack the lexicon keys
        assert!(!fvs[2].features.contains_key("street_suffix"));
    }

    #[test]
    fn zip_shape() {
        let fvs = features_for("62704 62704-1234 1234");
        assert!(fvs[0].features.contains_key("zip_shape"));
        assert!(fvs[1].features.contains_key("zip_shape"));
        assert!(!fvs[2].features.contains_key("zip_shape"));
    }

    #[test]
    fn abbreviation_period() {
        let fvs = features_for("Main St.");
        assert!(fvs[1].features.contains_key("abbrev"));
        assert!(fvs[1].features.contains_key("word=st"));
    }

    #[test]
    fn context_window_prefixes() {
        let fvs = features_for("123 Main St");
        let main = &fvs[1].features;
        assert!(main.contains_key("prev:digits=all"));
        assert!(main.contains_key("prev:address_start"));
        assert!(main.contains_key("next:street_suffix"));
        assert!(main.contains_key("next:address_end"));
        let first = &fvs[0].features;
        assert!(first.contains_key("address_start"));
        assert!(first.contains_key("next2:street_suffix"));
    }

    #[test]
    fn positional_features() {
        let fvs = features_for("123 Main St");
        assert!(fvs[0].features.contains_key("address_start"));
        assert!(fvs[2].features.contains_key("address_end"));
        let rel = fvs[1].features.get("relative_position").copied().unwrap();
        assert!((rel - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn trailing_zeros() {
        let fvs = features_for("7400");
        assert!(fvs[0].features.contains_key("trailing_zeros=00"));
    }

    #[test]
    fn standalone_punctuation_is_punct_only() {
        // the tokenizer splits punctuation off, so a comma is its own token
        // and carries exactly the punctuation shape feature
        let fvs = features_for("Springfield ,");
        assert!(fvs[1].features.contains_key("is_punct"));
        assert!(!fvs[1].features.keys().any(|k| k.contains("punct=")));
    }

    #[test]
    fn never_fails_on_odd_tokens() {
        // punctuation-only, unicode and single-char tokens all extract fine
        for input in [",", "½", "#", "ü", "--"] {
            let fvs = features_for(input);
            for fv in fvs {
                assert!(fv.features.contains_key("bias"));
            }
        }
    }
}
