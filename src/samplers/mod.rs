//! Sampling strategies.
//!
//! Samplers fill a minimal sample with positions into the working cloud via
//! the shared [`Sampler`](crate::core::Sampler) trait.

pub mod uniform;

pub use uniform::UniformRandomSampler;
