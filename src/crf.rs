//! # Linear-chain CRF scoring
//!
//! Holds the weights of a linear-chain conditional random field over the
//! address label set and scores label assignments:
//!
//! ```text
//! score(y, x) = Σ_i [emission_score(y_i, x, i) + transition_score(y_{i-1}, y_i)]
//! ```
//!
//! Emission weights are keyed by `feature_name|label_name` in a sparse map;
//! transitions live in a dense |L|×|L| matrix indexed by
//! [`AddressLabel::index`]. Decoding over these scores is the job of
//! [`crate::viterbi`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::features::FeatureVector;
use crate::labels::AddressLabel;

/// CRF weights: sparse emissions and a dense transition matrix.
///
/// Instances are immutable once loaded into a parser; the setters exist for
/// model construction and for hand-built test models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrfModel {
    /// Emission weights: `"feature|Label"` → weight.
    pub emission_weights: HashMap<String, f64>,
    /// Transition weights indexed `[prev][next]` by label index.
    pub transition_weights: Vec<Vec<f64>>,
}

impl CrfModel {
    /// A model with all weights at zero.
    pub fn new() -> Self {
        let n = AddressLabel::COUNT;
        Self {
            emission_weights: HashMap::new(),
            transition_weights: vec![vec![0.0f64; n]; n],
        }
    }

    /// Emission score of `label` for a token with the given features:
    /// `Σ_k w_{k,label} · f_k`.
    pub fn emission_score(&self, features: &FeatureVector, label: AddressLabel) -> f64 {
        let name = label.name();
        features
            .features
            .iter()
            .map(|(feat, val)| {
                let key = format!("{feat}|{name}");
                val * self.emission_weights.get(&key).unwrap_or(&0.0)
            })
            .sum()
    }

    /// Transition score from `prev` to `next`.
    pub fn transition_score(&self, prev: AddressLabel, next: AddressLabel) -> f64 {
        self.transition_weights[prev.index()][next.index()]
    }

    /// Set an emission weight.
    pub fn set_emission(&mut self, feature: &str, label: AddressLabel, weight: f64) {
        self.emission_weights
            .insert(format!("{feature}|{}", label.name()), weight);
    }

    /// Set a transition weight.
    pub fn set_transition(&mut self, from: AddressLabel, to: AddressLabel, weight: f64) {
        self.transition_weights[from.index()][to.index()] = weight;
    }
}

impl Default for CrfModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Emission scores for every token and label: `result[i][l]`.
pub fn compute_emission_scores(model: &CrfModel, feature_vectors: &[FeatureVector]) -> Vec<Vec<f64>> {
    let labels = AddressLabel::all();
    feature_vectors
        .iter()
        .map(|fv| {
            labels
                .iter()
                .map(|label| model.emission_score(fv, *label))
                .collect()
        })
        .collect()
}
