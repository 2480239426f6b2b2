//! Core trait abstractions for the classification pipeline.
//!
//! These traits define the seams between the generic pipeline and the parts
//! that vary per deployment: the generation service, the dataset, and the
//! progress front end.

pub mod generator;
pub mod item;
pub mod progress;
