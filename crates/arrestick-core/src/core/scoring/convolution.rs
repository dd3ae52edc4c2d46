use super::alphabet::ValidationError;
use super::params::ModelParameters;
use thiserror::Error;

/// Probability assigned to residues that never start a full kernel window.
pub const DEFAULT_TRAILING_FILL: f64 = 0.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoringError {
    #[error("Sequence of length {length} is shorter than the kernel length {kernel_length}")]
    InsufficientLength { length: usize, kernel_length: usize },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[inline]
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Slides the model kernel over a sequence and turns window scores into probabilities.
pub struct Scorer<'a> {
    params: &'a ModelParameters,
    trailing_fill: f64,
}

impl<'a> Scorer<'a> {
    pub fn new(params: &'a ModelParameters) -> Self {
        Self {
            params,
            trailing_fill: DEFAULT_TRAILING_FILL,
        }
    }

    pub fn with_trailing_fill(mut self, fill: f64) -> Self {
        self.trailing_fill = fill;
        self
    }

    /// Raw convolution scores, one per window start (`N - K + 1` values).
    ///
    /// The kernel is applied in its stored order: `raw[i] = Σ kernel[j] * emb[i + j] + bias`.
    pub fn raw_scores(&self, sequence: &str) -> Result<Vec<f64>, ScoringError> {
        let kernel = self.params.kernel();
        let embedded = self.params.alphabet().embed(sequence)?;

        if embedded.len() < kernel.len() {
            return Err(ScoringError::InsufficientLength {
                length: embedded.len(),
                kernel_length: kernel.len(),
            });
        }

        let bias = self.params.bias();
        Ok(embedded
            .windows(kernel.len())
            .map(|window| {
                window
                    .iter()
                    .zip(kernel)
                    .map(|(emb, weight)| emb * weight)
                    .sum::<f64>()
                    + bias
            })
            .collect())
    }

    /// Per-residue probabilities, always exactly as long as `sequence`.
    ///
    /// The last `K - 1` residues cannot start a window and receive the trailing fill value.
    pub fn score(&self, sequence: &str) -> Result<Vec<f64>, ScoringError> {
        let scale = self.params.sigmoid_scale();
        let offset = self.params.sigmoid_offset();

        let mut probability: Vec<f64> = self
            .raw_scores(sequence)?
            .into_iter()
            .map(|raw| sigmoid(scale * raw + offset))
            .collect();

        let length = sequence.chars().count();
        probability.resize(length, self.trailing_fill);
        Ok(probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const EPS: f64 = 1e-9;

    fn toy_params() -> ModelParameters {
        ModelParameters::new(
            HashMap::from([('A', 1.0), ('B', -1.0)]),
            vec![1.0, 1.0],
            0.0,
            1.0,
            0.0,
        )
        .unwrap()
    }

    #[test]
    fn sigmoid_matches_reference_values() {
        assert!((sigmoid(0.0) - 0.5).abs() < EPS);
        assert!((sigmoid(2.0) - 0.880_797_077_977_882_3).abs() < EPS);
        assert!((sigmoid(-2.0) - 0.119_202_922_022_117_7).abs() < EPS);
    }

    #[test]
    fn sigmoid_is_stable_for_extreme_inputs() {
        let high = sigmoid(1_000.0);
        let low = sigmoid(-1_000.0);
        assert!(high.is_finite() && (0.0..=1.0).contains(&high));
        assert!(low.is_finite() && (0.0..=1.0).contains(&low));
    }

    #[test]
    fn raw_scores_for_toy_sequence() {
        let params = toy_params();
        let raw = Scorer::new(&params).raw_scores("AAB").unwrap();
        assert_eq!(raw, vec![2.0, 0.0]);
    }

    #[test]
    fn score_aligns_probability_with_every_residue() {
        let params = toy_params();
        let probability = Scorer::new(&params).score("AAB").unwrap();

        assert_eq!(probability.len(), 3);
        assert!((probability[0] - sigmoid(2.0)).abs() < EPS);
        assert!((probability[1] - 0.5).abs() < EPS);
        assert_eq!(probability[2], 0.0);
    }

    #[test]
    fn kernel_is_applied_in_stored_order() {
        let params = ModelParameters::new(
            HashMap::from([('A', 1.0), ('B', 0.0)]),
            vec![3.0, 1.0],
            0.0,
            1.0,
            0.0,
        )
        .unwrap();
        let raw = Scorer::new(&params).raw_scores("AB").unwrap();
        assert_eq!(raw, vec![3.0]);
    }

    #[test]
    fn bias_scale_and_offset_are_applied() {
        let params = ModelParameters::new(
            HashMap::from([('A', 1.0)]),
            vec![1.0],
            0.5,
            2.0,
            -1.0,
        )
        .unwrap();
        let probability = Scorer::new(&params).score("A").unwrap();
        assert!((probability[0] - sigmoid(2.0 * 1.5 - 1.0)).abs() < EPS);
    }

    #[test]
    fn trailing_positions_receive_the_fill_value() {
        let params = ModelParameters::new(
            HashMap::from([('A', 1.0)]),
            vec![0.2, 0.2, 0.2, 0.2],
            0.0,
            1.0,
            0.0,
        )
        .unwrap();
        let sequence = "AAAAAAA";
        let probability = Scorer::new(&params).score(sequence).unwrap();

        assert_eq!(probability.len(), sequence.len());
        assert!(probability.iter().all(|p| (0.0..=1.0).contains(p)));
        assert!(probability[4..].iter().all(|&p| p == 0.0));
        assert!(probability[..4].iter().all(|&p| p > 0.0));

        let filled = Scorer::new(&params)
            .with_trailing_fill(0.25)
            .score(sequence)
            .unwrap();
        assert!(filled[4..].iter().all(|&p| p == 0.25));
    }

    #[test]
    fn sequence_equal_to_kernel_length_yields_one_window() {
        let params = toy_params();
        let probability = Scorer::new(&params).score("AB").unwrap();
        assert_eq!(probability.len(), 2);
        assert!((probability[0] - 0.5).abs() < EPS);
        assert_eq!(probability[1], 0.0);
    }

    #[test]
    fn sequence_shorter_than_kernel_is_rejected() {
        let params = toy_params();
        assert_eq!(
            Scorer::new(&params).score("A"),
            Err(ScoringError::InsufficientLength {
                length: 1,
                kernel_length: 2
            })
        );
    }

    #[test]
    fn unknown_residue_is_rejected() {
        let params = toy_params();
        assert!(matches!(
            Scorer::new(&params).score("AXA"),
            Err(ScoringError::Validation(ValidationError::InvalidResidue {
                symbol: 'X',
                position: 2
            }))
        ));
    }
}
