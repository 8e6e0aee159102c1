//! Multi-pass dominant plane extraction.
//!
//! [`RansacPlaneExtractor`] borrows a working cloud and strips planes from it
//! one pass at a time:
//!
//! 1. run `N = estimate_iteration_count(confidence, assumed_inlier_ratio, 3)`
//!    RANSAC trials against the current cloud and keep the best support,
//! 2. remove that support from the cloud,
//! 3. repeat on the residual.
//!
//! The working cloud is only mutated between passes. After
//! [`RansacPlaneExtractor::run`] it holds the residual: every point not
//! attributed to one of the extracted planes.
//!
//! The pass count is fixed by default; the extractor does not detect that no
//! meaningful structure is left and will run passes against a nearly empty
//! residual. Install a [`StoppingCriterion`] (e.g. [`MinSupport`]) to end a
//! run early.
//!
//! # Usage
//!
//! ```rust
//! use plane_ransac::{PointCloud, RansacPlaneExtractor, RansacSettings};
//! use plane_ransac::types::Point;
//!
//! let mut cloud = PointCloud::new();
//! for i in 0..30 {
//!     let (x, y) = ((i % 6) as f64, (i / 6) as f64);
//!     cloud.add(Point::new(x, y, 0.0)).unwrap();
//! }
//! cloud.add(Point::new(0.5, 0.5, 4.0)).unwrap();
//!
//! let settings = RansacSettings::default().with_seed(7);
//! let mut extractor = RansacPlaneExtractor::new(&mut cloud, settings).unwrap();
//! let planes = extractor.run(1, 0.1).unwrap();
//!
//! assert_eq!(planes[0].support.len(), 30);
//! assert_eq!(extractor.residual().len(), 1);
//! ```

use log::{debug, warn};

use crate::cloud::PointCloud;
use crate::core::{estimate_iteration_count, Estimator, Ransac, Sampler, Scoring};
use crate::error::RansacError;
use crate::estimators::PlaneEstimator;
use crate::models::Plane;
use crate::samplers::UniformRandomSampler;
use crate::scoring::{PlaneDistanceScoring, Score};
use crate::settings::{validate_threshold, RansacSettings};

/// The outcome of one extraction pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneDetection {
    /// The hypothesis with the largest support.
    pub plane: Plane,
    /// Snapshot of the points supporting `plane`, in working-cloud order.
    pub support: PointCloud,
    /// Score of `plane`; `score.inlier_count == support.len()`.
    pub score: Score,
    /// Number of RANSAC trials performed.
    pub iterations: usize,
}

/// Decides whether a run should end at a given detection.
///
/// Consulted once per pass, before the detection's support is removed from
/// the working cloud. Returning `true` discards the detection, leaves the
/// cloud untouched and ends the run.
pub trait StoppingCriterion {
    fn should_stop(&self, detection: &PlaneDetection) -> bool;
}

impl<F> StoppingCriterion for F
where
    F: Fn(&PlaneDetection) -> bool,
{
    fn should_stop(&self, detection: &PlaneDetection) -> bool {
        self(detection)
    }
}

/// Ends a run at the first pass whose support is smaller than the wrapped
/// count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinSupport(pub usize);

impl StoppingCriterion for MinSupport {
    fn should_stop(&self, detection: &PlaneDetection) -> bool {
        detection.support.len() < self.0
    }
}

/// RANSAC dominant plane extractor over a borrowed working cloud.
pub struct RansacPlaneExtractor<'a, Sa = UniformRandomSampler>
where
    Sa: Sampler,
{
    cloud: &'a mut PointCloud,
    settings: RansacSettings,
    sampler: Sa,
    stopping: Option<Box<dyn StoppingCriterion + 'a>>,
}

impl<'a> RansacPlaneExtractor<'a, UniformRandomSampler> {
    /// Create an extractor with the default uniform sampler, seeded from
    /// `settings.seed`. A `settings.min_support` installs [`MinSupport`].
    pub fn new(cloud: &'a mut PointCloud, settings: RansacSettings) -> Result<Self, RansacError> {
        let sampler = UniformRandomSampler::from_optional_seed(settings.seed);
        Self::with_sampler(cloud, settings, sampler)
    }
}

impl<'a, Sa> RansacPlaneExtractor<'a, Sa>
where
    Sa: Sampler,
{
    /// Create an extractor drawing samples from `sampler`.
    pub fn with_sampler(
        cloud: &'a mut PointCloud,
        settings: RansacSettings,
        sampler: Sa,
    ) -> Result<Self, RansacError> {
        settings.validate()?;
        let stopping = settings
            .min_support
            .map(|min| Box::new(MinSupport(min)) as Box<dyn StoppingCriterion + 'a>);

        Ok(Self {
            cloud,
            settings,
            sampler,
            stopping,
        })
    }

    /// Replace the stopping criterion.
    pub fn with_stopping_criterion<C>(mut self, criterion: C) -> Self
    where
        C: StoppingCriterion + 'a,
    {
        self.stopping = Some(Box::new(criterion));
        self
    }

    pub fn settings(&self) -> &RansacSettings {
        &self.settings
    }

    /// The working cloud; after [`run`](Self::run), the residual.
    pub fn residual(&self) -> &PointCloud {
        &*self.cloud
    }

    /// Trials per pass, from the configured confidence and inlier ratio.
    ///
    /// The ratio is not re-estimated as the residual shrinks.
    pub fn iteration_count(&self) -> Result<usize, RansacError> {
        estimate_iteration_count(
            self.settings.confidence,
            self.settings.assumed_inlier_ratio,
            PlaneEstimator.sample_size(),
        )
    }

    /// One RANSAC pass against the current working cloud.
    ///
    /// Returns the plane with the largest support (the earliest trial wins
    /// ties) and a snapshot of its supporting points. The working cloud is
    /// not modified.
    pub fn extract_dominant_plane(&mut self, epsilon: f64) -> Result<PlaneDetection, RansacError> {
        validate_threshold(epsilon)?;
        if self.cloud.is_empty() {
            return Err(RansacError::EmptyCloud);
        }
        let iterations = self.iteration_count()?;
        let (detection, _) = self.detect(epsilon, iterations)?;
        Ok(detection)
    }

    /// Extract up to `pass_count` dominant planes, removing each plane's
    /// support from the working cloud before the next pass.
    ///
    /// Without a stopping criterion exactly `pass_count` detections are
    /// returned. A failure in the first pass is returned as is and leaves the
    /// cloud untouched. A failure in a later pass (typically an empty residual,
    /// [`RansacError::EmptyCloud`]) is wrapped in [`RansacError::RunAborted`],
    /// which carries the detections already removed from the cloud.
    pub fn run(
        &mut self,
        pass_count: usize,
        epsilon: f64,
    ) -> Result<Vec<PlaneDetection>, RansacError> {
        validate_threshold(epsilon)?;
        let iterations = self.iteration_count()?;
        let mut detections = Vec::with_capacity(pass_count);

        for pass in 1..=pass_count {
            match self.run_pass(pass, epsilon, iterations) {
                Ok(Some(detection)) => {
                    debug!(
                        "pass {pass}/{pass_count}: {} supporting points, {} remaining",
                        detection.support.len(),
                        self.cloud.len()
                    );
                    detections.push(detection);
                }
                Ok(None) => break,
                Err(cause) if detections.is_empty() => return Err(cause),
                Err(cause) => {
                    warn!(
                        "pass {pass}/{pass_count} failed after {} plane(s): {cause}",
                        detections.len()
                    );
                    return Err(RansacError::RunAborted {
                        pass,
                        completed: detections,
                        cause: Box::new(cause),
                    });
                }
            }
        }

        Ok(detections)
    }

    /// Detect, consult the stopping criterion, then remove the support.
    ///
    /// `Ok(None)` means the criterion ended the run; the cloud is unchanged.
    fn run_pass(
        &mut self,
        pass: usize,
        epsilon: f64,
        iterations: usize,
    ) -> Result<Option<PlaneDetection>, RansacError> {
        if self.cloud.is_empty() {
            return Err(RansacError::EmptyCloud);
        }

        let (mut detection, inliers) = self.detect(epsilon, iterations)?;

        if let Some(criterion) = &self.stopping {
            if criterion.should_stop(&detection) {
                warn!(
                    "pass {pass}: support {} rejected by stopping criterion, ending run",
                    detection.support.len()
                );
                return Ok(None);
            }
        }

        self.cloud.remove_indices(&inliers)?;
        if let Some(name) = self.cloud.name() {
            let name = format!("{name}_{pass}");
            detection.support.set_name(name);
        }

        Ok(Some(detection))
    }

    /// Run the trials and materialize the best support.
    ///
    /// Also returns the support's positions in the working cloud so the
    /// caller can remove exactly those points.
    fn detect(
        &mut self,
        epsilon: f64,
        iterations: usize,
    ) -> Result<(PlaneDetection, Vec<usize>), RansacError> {
        let mut ransac = Ransac::new(
            PlaneEstimator,
            &mut self.sampler,
            PlaneDistanceScoring::new(epsilon),
        );
        ransac.run(&*self.cloud, iterations)?;
        let Ransac {
            scoring,
            best_model,
            best_inliers,
            best_score,
            iteration,
            ..
        } = ransac;

        // `iterations >= 1` and the cloud is non-empty, so the first trial
        // always produced a model.
        let (plane, score) = match (best_model, best_score) {
            (Some(plane), Some(score)) => (plane, score),
            _ => return Err(RansacError::EmptyCloud),
        };

        let mut support = PointCloud::with_capacity(best_inliers.len());
        for &i in &best_inliers {
            support.add(self.cloud.as_slice()[i])?;
        }

        if support.is_empty() {
            warn!(
                "no plane found support within {} among {} points after {} trials",
                scoring.threshold(),
                self.cloud.len(),
                iteration
            );
        }

        Ok((
            PlaneDetection {
                plane,
                support,
                score,
                iterations: iteration,
            },
            best_inliers,
        ))
    }
}
