//! Core RANSAC traits and the single-pass hypothesis loop.
//!
//! A pass is expressed through three seams:
//! - an [`Estimator`] turning a minimal sample into a model,
//! - a [`Sampler`] drawing minimal samples from the working cloud,
//! - a [`Scoring`] strategy measuring a model's support.
//!
//! [`Ransac`] orchestrates them for a fixed number of trials and keeps the
//! best-scoring hypothesis. Multi-pass extraction lives in
//! [`crate::extractor`].

use log::trace;

use crate::cloud::PointCloud;
use crate::error::RansacError;

/// Estimator responsible for generating model hypotheses from minimal samples.
pub trait Estimator {
    /// Model type produced by this estimator.
    type Model: Clone;

    /// Size of a minimal sample for this estimator.
    fn sample_size(&self) -> usize;

    /// Estimate a model from the points at `sample`.
    ///
    /// Degenerate samples still produce a model; the scoring step is expected
    /// to give such a model no support.
    fn estimate_model(&self, cloud: &PointCloud, sample: &[usize]) -> Self::Model;
}

/// Sampler responsible for drawing minimal samples from the cloud.
pub trait Sampler {
    /// Fill `out_indices` with positions into `cloud`.
    ///
    /// Fails with [`RansacError::EmptyCloud`] when there is nothing to draw.
    fn sample(&mut self, cloud: &PointCloud, out_indices: &mut [usize])
        -> Result<(), RansacError>;
}

/// Lend a sampler to a loop without giving up its random state.
impl<S: Sampler + ?Sized> Sampler for &mut S {
    fn sample(
        &mut self,
        cloud: &PointCloud,
        out_indices: &mut [usize],
    ) -> Result<(), RansacError> {
        (**self).sample(cloud, out_indices)
    }
}

/// Scoring strategy used to evaluate model quality and determine inliers.
pub trait Scoring<M> {
    /// Score type; a strictly greater score replaces the current best.
    type Score: Clone + Ord;

    /// Inlier/outlier distance threshold.
    fn threshold(&self) -> f64;

    /// Score a model, writing the positions of its inliers into `inliers_out`.
    fn score(&self, cloud: &PointCloud, model: &M, inliers_out: &mut Vec<usize>) -> Self::Score;
}

/// Number of trials needed to draw at least one all-inlier sample.
///
/// `ceil( ln(1 - confidence) / ln(1 - inlier_ratio^sample_size) )`, never
/// less than one. A sample is all-inlier with probability
/// `inlier_ratio^sample_size`, so after N trials the chance of never having
/// drawn one is `(1 - inlier_ratio^sample_size)^N`; N is the smallest count
/// that pushes it to `1 - confidence` or below.
///
/// `confidence` must lie in `(0, 1)` and `inlier_ratio` in `(0, 1]`; a ratio
/// of one needs a single trial.
pub fn estimate_iteration_count(
    confidence: f64,
    inlier_ratio: f64,
    sample_size: usize,
) -> Result<usize, RansacError> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(RansacError::InvalidParameter {
            name: "confidence",
            value: confidence,
            reason: "must lie strictly between 0 and 1",
        });
    }
    if !(inlier_ratio > 0.0 && inlier_ratio <= 1.0) {
        return Err(RansacError::InvalidParameter {
            name: "inlier_ratio",
            value: inlier_ratio,
            reason: "must lie in (0, 1]",
        });
    }
    if sample_size == 0 {
        return Err(RansacError::InvalidParameter {
            name: "sample_size",
            value: 0.0,
            reason: "must be at least 1",
        });
    }
    if inlier_ratio == 1.0 {
        return Ok(1);
    }

    let exponent = i32::try_from(sample_size).map_err(|_| RansacError::InvalidParameter {
        name: "sample_size",
        value: sample_size as f64,
        reason: "too large for an integer exponent",
    })?;
    let p_good_sample = inlier_ratio.powi(exponent);
    let log_one_minus_conf = (1.0 - confidence).ln();
    // ln_1p keeps precision when p_good_sample is tiny.
    let log_one_minus_p = (-p_good_sample).ln_1p();
    if log_one_minus_p == 0.0 || !log_one_minus_p.is_finite() {
        return Err(RansacError::InvalidParameter {
            name: "inlier_ratio",
            value: inlier_ratio,
            reason: "too small for the iteration count to be representable",
        });
    }

    let required = (log_one_minus_conf / log_one_minus_p).ceil().max(1.0);
    if !required.is_finite() || required > usize::MAX as f64 {
        return Err(RansacError::InvalidParameter {
            name: "inlier_ratio",
            value: inlier_ratio,
            reason: "too small for the iteration count to be representable",
        });
    }
    Ok(required as usize)
}

/// Single-pass RANSAC loop over a fixed trial budget.
///
/// Holds the best hypothesis after [`Ransac::run`]. The best inliers are an
/// owned snapshot of positions into the cloud that was scored; each trial
/// scores into its own scratch buffer and only a strictly better trial is
/// copied over, so ties keep the earliest trial.
#[derive(Debug)]
pub struct Ransac<E, Sa, Sc>
where
    E: Estimator,
    Sa: Sampler,
    Sc: Scoring<E::Model>,
{
    pub estimator: E,
    pub sampler: Sa,
    pub scoring: Sc,

    // Outputs / diagnostics
    pub best_model: Option<E::Model>,
    pub best_inliers: Vec<usize>,
    pub best_score: Option<Sc::Score>,
    pub iteration: usize,
}

impl<E, Sa, Sc> Ransac<E, Sa, Sc>
where
    E: Estimator,
    Sa: Sampler,
    Sc: Scoring<E::Model>,
{
    /// Create a new loop from its components.
    pub fn new(estimator: E, sampler: Sa, scoring: Sc) -> Self {
        Self {
            estimator,
            sampler,
            scoring,
            best_model: None,
            best_inliers: Vec::new(),
            best_score: None,
            iteration: 0,
        }
    }

    /// Run `iterations` trials against `cloud`.
    ///
    /// Any previous result is discarded. The first trial always becomes the
    /// initial best, so after a successful run with `iterations > 0` a model
    /// is available even if nothing had support.
    pub fn run(&mut self, cloud: &PointCloud, iterations: usize) -> Result<(), RansacError> {
        let sample_size = self.estimator.sample_size();
        let mut sample = vec![0usize; sample_size];
        let mut tmp_inliers = Vec::new();

        self.best_model = None;
        self.best_inliers.clear();
        self.best_score = None;
        self.iteration = 0;

        while self.iteration < iterations {
            self.sampler.sample(cloud, &mut sample)?;
            let model = self.estimator.estimate_model(cloud, &sample);
            let score = self.scoring.score(cloud, &model, &mut tmp_inliers);

            let better = match &self.best_score {
                None => true,
                Some(best) => score > *best,
            };

            if better {
                trace!(
                    "trial {}: new best with {} inliers",
                    self.iteration,
                    tmp_inliers.len()
                );
                self.best_score = Some(score);
                self.best_model = Some(model);
                self.best_inliers.clear();
                self.best_inliers.extend_from_slice(&tmp_inliers);
            }

            self.iteration += 1;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    #[test]
    fn default_policy_iteration_count() {
        // ln(0.01) / ln(1 - 0.001) = 4602.86...
        assert_eq!(estimate_iteration_count(0.99, 0.1, 3).unwrap(), 4603);
    }

    #[test]
    fn iteration_count_is_monotone() {
        let confidences = [0.5, 0.8, 0.9, 0.95, 0.99, 0.999];
        let ratios = [0.05, 0.1, 0.2, 0.4, 0.6, 0.9];

        for &r in &ratios {
            let counts: Vec<usize> = confidences
                .iter()
                .map(|&c| estimate_iteration_count(c, r, 3).unwrap())
                .collect();
            assert!(counts.windows(2).all(|w| w[0] <= w[1]), "{counts:?}");
        }
        for &c in &confidences {
            let counts: Vec<usize> = ratios
                .iter()
                .map(|&r| estimate_iteration_count(c, r, 3).unwrap())
                .collect();
            assert!(counts.windows(2).all(|w| w[0] >= w[1]), "{counts:?}");
        }
    }

    #[test]
    fn iteration_count_rejects_out_of_range_parameters() {
        for c in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            assert!(matches!(
                estimate_iteration_count(c, 0.1, 3),
                Err(RansacError::InvalidParameter { name: "confidence", .. })
            ));
        }
        for r in [0.0, -0.1, 1.01, f64::NAN] {
            assert!(matches!(
                estimate_iteration_count(0.99, r, 3),
                Err(RansacError::InvalidParameter { name: "inlier_ratio", .. })
            ));
        }
        assert!(estimate_iteration_count(0.99, 0.1, 0).is_err());
        assert!(matches!(
            estimate_iteration_count(0.99, 0.1, usize::MAX),
            Err(RansacError::InvalidParameter { name: "sample_size", .. })
        ));
    }

    #[test]
    fn full_inlier_ratio_needs_one_iteration() {
        assert_eq!(estimate_iteration_count(0.99, 1.0, 3).unwrap(), 1);
    }

    // Mock components: each "model" is the sampled index itself and its score
    // is a fixed table lookup, which makes the tie-break observable.

    struct IndexEstimator;

    impl Estimator for IndexEstimator {
        type Model = usize;

        fn sample_size(&self) -> usize {
            1
        }

        fn estimate_model(&self, _cloud: &PointCloud, sample: &[usize]) -> usize {
            sample[0]
        }
    }

    struct SequentialSampler {
        next: usize,
    }

    impl Sampler for SequentialSampler {
        fn sample(
            &mut self,
            cloud: &PointCloud,
            out_indices: &mut [usize],
        ) -> Result<(), RansacError> {
            if cloud.is_empty() {
                return Err(RansacError::EmptyCloud);
            }
            for v in out_indices.iter_mut() {
                *v = self.next % cloud.len();
                self.next += 1;
            }
            Ok(())
        }
    }

    struct TableScoring(Vec<usize>);

    impl Scoring<usize> for TableScoring {
        type Score = usize;

        fn threshold(&self) -> f64 {
            0.0
        }

        fn score(&self, _cloud: &PointCloud, model: &usize, inliers_out: &mut Vec<usize>) -> usize {
            inliers_out.clear();
            inliers_out.push(*model);
            self.0[*model]
        }
    }

    fn cloud_of(n: usize) -> PointCloud {
        PointCloud::from_points((0..n).map(|i| Point::new(i as f64, 0.0, 0.0))).unwrap()
    }

    #[test]
    fn ransac_keeps_first_of_tied_best() {
        let cloud = cloud_of(5);
        let mut ransac = Ransac::new(
            IndexEstimator,
            SequentialSampler { next: 0 },
            TableScoring(vec![1, 4, 2, 4, 0]),
        );

        ransac.run(&cloud, 5).unwrap();

        assert_eq!(ransac.best_model, Some(1));
        assert_eq!(ransac.best_score, Some(4));
        assert_eq!(ransac.best_inliers, vec![1]);
        assert_eq!(ransac.iteration, 5);
    }

    #[test]
    fn ransac_first_trial_is_initial_best_even_without_support() {
        let cloud = cloud_of(3);
        let mut ransac = Ransac::new(
            IndexEstimator,
            SequentialSampler { next: 0 },
            TableScoring(vec![0, 0, 0]),
        );

        ransac.run(&cloud, 3).unwrap();
        assert_eq!(ransac.best_model, Some(0));
    }

    #[test]
    fn ransac_propagates_sampling_failure() {
        let cloud = PointCloud::new();
        let mut ransac = Ransac::new(
            IndexEstimator,
            SequentialSampler { next: 0 },
            TableScoring(vec![]),
        );

        assert_eq!(ransac.run(&cloud, 10), Err(RansacError::EmptyCloud));
        assert!(ransac.best_model.is_none());
    }
}
