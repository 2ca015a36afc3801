//! One-hot feature encoding
//!
//! Maps a set of reported symptoms onto a fixed-length feature vector
//! aligned to the vocabulary's column order, matching the layout the
//! models were trained on.

use std::collections::HashSet;

/// Encode selected symptoms against the vocabulary column order.
///
/// Position `i` is 1.0 iff `vocabulary[i]` appears in `selected`. Names not
/// present in the vocabulary are silently ignored.
pub fn encode(selected: &[String], vocabulary: &[String]) -> Vec<f64> {
    let selected: HashSet<&str> = selected.iter().map(String::as_str).collect();
    vocabulary
        .iter()
        .map(|symptom| {
            if selected.contains(symptom.as_str()) {
                1.0
            } else {
                0.0
            }
        })
        .collect()
}
