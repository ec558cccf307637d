//! Unicode lowercasing char filter.

use super::{CharFilter, Transformation};

/// A char filter that lowercases the entire input.
///
/// Lowercasing happens before any character stripping so that uppercase
/// ASCII letters survive an `[^a-z]` allow-list. Characters whose lowercase
/// form has a different byte length (e.g. `'İ'` -> `"i\u{307}"`, the Kelvin
/// sign -> `'k'`) are recorded as transformations.
#[derive(Clone, Debug, Default)]
pub struct LowercaseCharFilter;

impl LowercaseCharFilter {
    /// Create a new lowercase char filter.
    pub fn new() -> Self {
        LowercaseCharFilter
    }
}

impl CharFilter for LowercaseCharFilter {
    fn filter(&self, input: &str) -> (String, Vec<Transformation>) {
        if input.is_ascii() {
            return (input.to_ascii_lowercase(), Vec::new());
        }

        let mut output = String::with_capacity(input.len());
        let mut transformations = Vec::new();

        for (start, c) in input.char_indices() {
            let new_start = output.len();
            output.extend(c.to_lowercase());
            let new_end = output.len();

            let end = start + c.len_utf8();
            if new_end - new_start != end - start {
                transformations.push(Transformation::new(start, end, new_start, new_end));
            }
        }

        (output, transformations)
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}
