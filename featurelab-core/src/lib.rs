//! FeatureLab Core — labeled feature tables from daily price histories.
//!
//! This crate contains the whole batch pipeline:
//! - Domain types (price rows, feature table, target label)
//! - Data-quality gate with optional zero imputation
//! - Backward and forward signal indicators
//! - Ternary target labeler
//! - Minimal-order fractional differencing (ADF driven)
//! - Additive seasonal decomposition residuals
//! - Price sources, export and run manifests

pub mod config;
pub mod data;
pub mod decompose;
pub mod domain;
pub mod indicators;
pub mod labeler;
pub mod manifest;
pub mod pipeline;
pub mod quality;
pub mod signals;
pub mod stationarity;

pub use config::{ConfigError, PipelineConfig};
pub use pipeline::{FeaturePipeline, FeatureRun, PipelineError};
