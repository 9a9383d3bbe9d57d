//! Linear bandwidth savings model
//!
//! A fixed dot product over [`FEATURE_NAMES`](crate::features::FEATURE_NAMES)
//! plus an intercept. The output is an unconstrained byte estimate: callers
//! treat zero and negative values as "no savings".

mod coefficients;

pub use coefficients::{COEFFICIENTS, INTERCEPT};

use crate::features::{feature_index, FeatureMap, FeatureVector, FEATURE_COUNT};

/// Predict savings from features in model order
///
/// The caller is responsible for the order; the array length is checked at
/// compile time.
pub fn predict(features: &FeatureVector) -> f64 {
    features
        .iter()
        .zip(COEFFICIENTS.iter())
        .fold(INTERCEPT, |acc, (x, w)| acc + x * w)
}

/// Predict savings from named features
///
/// Missing names count as 0.0 and unknown names are ignored, so a misspelled
/// feature silently contributes nothing.
pub fn predict_map(features: &FeatureMap) -> f64 {
    predict(&to_feature_vector(features))
}

/// Translate named features into model order
pub fn to_feature_vector(features: &FeatureMap) -> FeatureVector {
    let mut vector = [0.0; FEATURE_COUNT];
    for (name, value) in features {
        match feature_index(name) {
            Some(i) => vector[i] = *value,
            None => tracing::trace!("Ignoring unknown feature {}", name),
        }
    }
    vector
}
