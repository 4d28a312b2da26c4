//! Final-metric blending for ronda.
//!
//! This crate turns the component scores of one instrument (surprise momentum,
//! forward growth and the analyst revision adjustment) into the final metric.
//! Blenders implement the [`Combiner`] trait; [`WeightedBlender`] is the
//! fixed-weight strategy used by the engine.
//!
//! # Examples
//!
//! ```rust
//! use ronda_combine::{BlendWeights, Combiner, ComponentScores, WeightedBlender};
//!
//! let weights: BlendWeights = "momentum=0.5,forward=0.5,revisions=0".parse().unwrap();
//! let blender = WeightedBlender::new(weights);
//!
//! let scores = ComponentScores { momentum: Some(5.0), forward: None, revisions: 0.0 };
//! assert_eq!(blender.combine(&scores), Some(2.5));
//! ```

mod combiner;
mod weighted;

// Re-export main types
pub use combiner::{Combiner, ComponentScores};
pub use weighted::{BlendWeights, WeightedBlender};
