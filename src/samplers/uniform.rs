//! Uniform random sampler drawing minimal samples with replacement.

use crate::cloud::PointCloud;
use crate::core::Sampler;
use crate::error::RansacError;
use crate::utils::UniformRandomGenerator;

/// Uniform random sampler drawing each sample slot independently.
///
/// Slots are drawn with replacement, so a sample may repeat a point. The
/// resulting degenerate plane scores zero and is discarded by the best-support
/// comparison; it never aborts the pass.
#[derive(Debug, Clone)]
pub struct UniformRandomSampler {
    rng: UniformRandomGenerator,
}

impl Default for UniformRandomSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl UniformRandomSampler {
    /// Construct a new sampler with a random seed.
    pub fn new() -> Self {
        Self {
            rng: UniformRandomGenerator::new(),
        }
    }

    /// Construct a sampler from a fixed seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: UniformRandomGenerator::from_seed(seed),
        }
    }

    /// Seeded if `seed` is given, entropy-seeded otherwise.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::from_seed)
    }
}

impl Sampler for UniformRandomSampler {
    fn sample(
        &mut self,
        cloud: &PointCloud,
        out_indices: &mut [usize],
    ) -> Result<(), RansacError> {
        for slot in out_indices.iter_mut() {
            *slot = cloud.sample_index(&mut self.rng)?;
        }
        Ok(())
    }
}
