//! Core foundation layer.
//!
//! Bottom layer of the pipeline with no internal dependencies.
//!
//! # Contents
//!
//! - [`types`]: Poses, point clouds and surface geometry exchanged between stages

pub mod types;
