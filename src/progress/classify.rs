// src/progress/classify.rs

//! Line classification for MESA terminal output.
//!
//! MESA prints one summary row per step. When a row ends with the name of
//! the quantity that limited the timestep (see [`super::markers`]), its first
//! column is the current model age in years. Anything that doesn't fit that
//! shape is simply not a progress line; classification never errors.

use super::markers::is_progress_marker;

/// Phrase MESA prints when a run stops before reaching its goal.
pub const TERMINATION_MARKER: &str = "terminated evolution:";

pub fn is_termination_line(line: &str) -> bool {
    line.contains(TERMINATION_MARKER)
}

/// Extract the model age from a step line, if it is one.
///
/// The last one, two and three tokens are each tried as a marker key. Lines
/// with fewer than three tokens, or whose first token isn't a number, yield
/// `None`.
pub fn classify_line(line: &str) -> Option<f64> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [.., third_last, second_last, last] = tokens.as_slice() else {
        return None;
    };

    let one = *last;
    let two = format!("{second_last} {last}");
    let three = format!("{third_last} {second_last} {last}");

    if is_progress_marker(one) || is_progress_marker(&two) || is_progress_marker(&three) {
        tokens[0].parse::<f64>().ok()
    } else {
        None
    }
}
