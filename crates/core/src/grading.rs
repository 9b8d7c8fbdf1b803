//! Output checking for lesson exercises.

/// Trim and collapse every run of whitespace into a single space.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compare program output with the lesson's expected output.
///
/// An empty expectation means the lesson has no check and always passes.
#[must_use]
pub fn check_code_correctness(output: &str, expected: &str) -> bool {
    if expected.is_empty() {
        return true;
    }
    normalize_whitespace(output) == normalize_whitespace(expected)
}
