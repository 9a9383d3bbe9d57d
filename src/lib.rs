//! savings-predictor - per-navigation bandwidth savings estimation
//!
//! This library classifies the subresources of a page load by owning
//! third-party entity, accumulates per-navigation feature statistics, applies
//! a fixed linear model to estimate the bytes saved by blocking, and folds
//! the estimates into a seven-day rolling total reported as a histogram
//! bucket.

pub mod accumulator;
pub mod cli;
pub mod clock;
pub mod config;
pub mod entities;
pub mod error;
pub mod features;
pub mod histogram;
pub mod navigation;
pub mod page_metrics;
pub mod predictor;
pub mod prefs;
pub mod replay;
pub mod savings;
pub mod sequence;
