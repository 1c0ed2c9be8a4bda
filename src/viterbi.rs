//! # Viterbi decoding
//!
//! Dynamic-programming search for the highest-scoring label sequence under
//! the linear-chain CRF. Exhaustive search over label sequences would be
//! O(|L|^N); Viterbi exploits the chain structure for O(N·|L|²) time and
//! O(N·|L|) space:
//!
//! ```text
//! init:      v[0][l] = emission(l, x_0)
//! recursion: v[i][l] = max_{l'} [v[i-1][l'] + transition(l', l)] + emission(l, x_i)
//! ```
//!
//! followed by backtracking along the argmax pointers. Ties are broken
//! deterministically toward the lowest label index, so decoding the same
//! input with the same model always yields the same sequence.

use serde::{Deserialize, Serialize};

use crate::crf::{compute_emission_scores, CrfModel};
use crate::features::FeatureVector;
use crate::labels::AddressLabel;

/// Output of a Viterbi decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViterbiResult {
    /// Highest-scoring label per token, aligned with the input.
    pub best_sequence: Vec<AddressLabel>,
    /// Unnormalized score of the best sequence.
    pub best_score: f64,
    /// Accumulated best-path score per token and label (`lattice[i][l]`),
    /// kept for deriving per-token confidences via [`scores_to_probs`].
    pub lattice: Vec<Vec<f64>>,
}

/// Decode the best label sequence for the given feature vectors.
///
/// An empty input produces an empty result. A single token is scored by
/// emissions alone (no transition term).
pub fn viterbi_decode(model: &CrfModel, feature_vectors: &[FeatureVector]) -> ViterbiResult {
    if feature_vectors.is_empty() {
        return ViterbiResult {
            best_sequence: vec![],
            best_score: 0.0,
            lattice: vec![],
        };
    }

    let n_tokens = feature_vectors.len();
    let labels = AddressLabel::all();
    let n_labels = labels.len();

    let emission = compute_emission_scores(model, feature_vectors);

    let mut viterbi: Vec<f64> = vec![f64::NEG_INFINITY; n_labels];
    let mut backptr: Vec<Vec<usize>> = vec![vec![0usize; n_labels]; n_tokens];
    let mut lattice: Vec<Vec<f64>> = Vec::with_capacity(n_tokens);

    // First token: emission only
    for (l, v) in viterbi.iter_mut().enumerate() {
        *v = emission[0][l];
    }
    lattice.push(viterbi.clone());

    for i in 1..n_tokens {
        let mut next_viterbi = vec![f64::NEG_INFINITY; n_labels];

        for l in 0..n_labels {
            // Best predecessor for label l; strict > keeps the lowest
            // previous-label index on ties
            let mut best_prev_score = f64::NEG_INFINITY;
            let mut best_prev = 0;
            for (prev_l, prev_label) in labels.iter().enumerate() {
                let score = viterbi[prev_l] + model.transition_score(*prev_label, labels[l]);
                if score > best_prev_score {
                    best_prev_score = score;
                    best_prev = prev_l;
                }
            }
            next_viterbi[l] = best_prev_score + emission[i][l];
            backptr[i][l] = best_prev;
        }

        viterbi = next_viterbi;
        lattice.push(viterbi.clone());
    }

    // Backtracking
    let (mut best_last, best_total_score) = best_in_slice(&viterbi);
    let mut best_sequence = vec![labels[0]; n_tokens];
    best_sequence[n_tokens - 1] = labels[best_last];
    for i in (0..n_tokens - 1).rev() {
        best_last = backptr[i + 1][best_last];
        best_sequence[i] = labels[best_last];
    }

    ViterbiResult {
        best_sequence,
        best_score: best_total_score,
        lattice,
    }
}

/// Index and value of the maximum in a slice, first occurrence on ties.
fn best_in_slice(scores: &[f64]) -> (usize, f64) {
    let mut best = (0, f64::NEG_INFINITY);
    for (i, &v) in scores.iter().enumerate() {
        if v > best.1 {
            best = (i, v);
        }
    }
    best
}

/// Softmax over a slice of scores, numerically stabilized by the max.
pub fn scores_to_probs(scores: &[f64]) -> Vec<f64> {
    if scores.is_empty() {
        return vec![];
    }
    let max_score = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|&s| (s - max_score).exp()).collect();
    let sum: f64 = exps.iter().sum();
    if sum == 0.0 {
        return vec![1.0 / scores.len() as f64; scores.len()];
    }
    exps.iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureVector;
    use crate::labels::AddressLabel;

    fn fv_with(index: usize, keys: &[&str]) -> FeatureVector {
        let mut fv = FeatureVector::new(index);
        fv.insert("bias", 1.0);
        for k in keys {
            fv.insert(*k, 1.0);
        }
        fv
    }

    /// Score a fixed label assignment under the model, mirroring the CRF
    /// score definition directly.
    fn sequence_score(model: &CrfModel, fvs: &[FeatureVector], seq: &[AddressLabel]) -> f64 {
        let mut total = model.emission_score(&fvs[0], seq[0]);
        for i in 1..seq.len() {
            total += model.transition_score(seq[i - 1], seq[i]);
            total += model.emission_score(&fvs[i], seq[i]);
        }
        total
    }

    #[test]
    fn empty_input() {
        let model = CrfModel::new();
        let result = viterbi_decode(&model, &[]);
        assert!(result.best_sequence.is_empty());
        assert!(result.lattice.is_empty());
    }

    #[test]
    fn single_token_is_emission_only() {
        let mut model = CrfModel::new();
        model.set_emission("zip_shape", AddressLabel::ZipCode, 3.0);
        // a transition weight must not affect a single-token decode
        model.set_transition(AddressLabel::ZipCode, AddressLabel::ZipCode, -100.0);

        let result = viterbi_decode(&model, &[fv_with(0, &["zip_shape"])]);
        assert_eq!(result.best_sequence, vec![AddressLabel::ZipCode]);
        assert!((result.best_score - 3.0).abs() < 1e-9);
    }

    #[test]
    fn output_length_matches_input() {
        let model = CrfModel::new();
        let fvs: Vec<FeatureVector> = (0..7).map(|i| fv_with(i, &[])).collect();
        let result = viterbi_decode(&model, &fvs);
        assert_eq!(result.best_sequence.len(), 7);
        assert_eq!(result.lattice.len(), 7);
    }

    #[test]
    fn zero_model_ties_break_to_lowest_index() {
        // with all weights zero every sequence scores 0.0; the decoder must
        // deterministically pick the first label for every token
        let model = CrfModel::new();
        let fvs: Vec<FeatureVector> = (0..4).map(|i| fv_with(i, &[])).collect();
        let result = viterbi_decode(&model, &fvs);
        assert!(result
            .best_sequence
            .iter()
            .all(|l| *l == AddressLabel::AddressNumberPrefix));
    }

    #[test]
    fn transitions_steer_the_path() {
        let mut model = CrfModel::new();
        model.set_emission("state", AddressLabel::StateName, 2.0);
        model.set_emission("digits=all", AddressLabel::ZipCode, 1.0);
        model.set_emission("digits=all", AddressLabel::AddressNumber, 1.0);
        // the transition decides between the two equal emissions
        model.set_transition(AddressLabel::StateName, AddressLabel::ZipCode, 1.5);

        let fvs = vec![fv_with(0, &["state"]), fv_with(1, &["digits=all"])];
        let result = viterbi_decode(&model, &fvs);
        assert_eq!(
            result.best_sequence,
            vec![AddressLabel::StateName, AddressLabel::ZipCode]
        );
    }

    #[test]
    fn matches_brute_force_enumeration() {
        // small hand-built model with competing paths; compare against an
        // exhaustive search over all |L|^3 label sequences
        let mut model = CrfModel::new();
        model.set_emission("digits=all", AddressLabel::AddressNumber, 1.2);
        model.set_emission("digits=all", AddressLabel::ZipCode, 1.0);
        model.set_emission("capitalized", AddressLabel::StreetName, 0.8);
        model.set_emission("capitalized", AddressLabel::PlaceName, 0.7);
        model.set_emission("street_suffix", AddressLabel::StreetNamePostType, 1.5);
        model.set_transition(AddressLabel::AddressNumber, AddressLabel::StreetName, 0.9);
        model.set_transition(AddressLabel::StreetName, AddressLabel::StreetNamePostType, 1.1);
        model.set_transition(AddressLabel::PlaceName, AddressLabel::StreetNamePostType, -0.5);

        let fvs = vec![
            fv_with(0, &["digits=all"]),
            fv_with(1, &["capitalized"]),
            fv_with(2, &["street_suffix", "capitalized"]),
        ];

        let decoded = viterbi_decode(&model, &fvs);

        let labels = AddressLabel::all();
        let mut best_score = f64::NEG_INFINITY;
        let mut best_seq = vec![];
        for a in labels {
            for b in labels {
                for c in labels {
                    let seq = vec![a, b, c];
                    let score = sequence_score(&model, &fvs, &seq);
                    if score > best_score {
                        best_score = score;
                        best_seq = seq;
                    }
                }
            }
        }

        assert_eq!(decoded.best_sequence, best_seq);
        assert!((decoded.best_score - best_score).abs() < 1e-9);
    }

    #[test]
    fn decode_is_deterministic() {
        let mut model = CrfModel::new();
        model.set_emission("capitalized", AddressLabel::StreetName, 0.5);
        let fvs: Vec<FeatureVector> = (0..5).map(|i| fv_with(i, &["capitalized"])).collect();

        let a = viterbi_decode(&model, &fvs);
        let b = viterbi_decode(&model, &fvs);
        assert_eq!(a.best_sequence, b.best_sequence);
        assert_eq!(a.best_score, b.best_score);
    }

    #[test]
    fn softmax_sums_to_one() {
        let probs = scores_to_probs(&[1.0, 2.0, 3.0, 0.5, -1.0]);
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }
}
