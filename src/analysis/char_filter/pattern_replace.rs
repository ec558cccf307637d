use regex::Regex;

use super::{CharFilter, Transformation};

/// A char filter that replaces every match of a regex pattern.
pub struct PatternReplaceCharFilter {
    pattern: Regex,
    replacement: String,
}

impl PatternReplaceCharFilter {
    /// Create a new pattern replace char filter.
    pub fn new(pattern: &str, replacement: &str) -> crate::error::Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)
                .map_err(|e| crate::error::CritiqueError::Anyhow(anyhow::Error::from(e)))?,
            replacement: replacement.to_string(),
        })
    }

    /// The source of the compiled pattern.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl CharFilter for PatternReplaceCharFilter {
    fn filter(&self, input: &str) -> (String, Vec<Transformation>) {
        let mut output = String::with_capacity(input.len());
        let mut transformations = Vec::new();
        let mut last_match_end = 0;

        for m in self.pattern.find_iter(input) {
            let match_start = m.start();
            let match_end = m.end();

            output.push_str(&input[last_match_end..match_start]);

            let replacement_start = output.len();
            output.push_str(&self.replacement);
            let replacement_end = output.len();

            // Same-length replacements need no offset correction.
            if match_end - match_start != replacement_end - replacement_start {
                transformations.push(Transformation::new(
                    match_start,
                    match_end,
                    replacement_start,
                    replacement_end,
                ));
            }

            last_match_end = match_end;
        }

        output.push_str(&input[last_match_end..]);

        (output, transformations)
    }

    fn name(&self) -> &'static str {
        "pattern_replace"
    }
}

impl std::fmt::Debug for PatternReplaceCharFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternReplaceCharFilter")
            .field("pattern", &self.pattern.as_str())
            .field("replacement", &self.replacement)
            .finish()
    }
}
