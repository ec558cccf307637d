//! Porter stemming algorithm implementation.
//!
//! This is the Porter (1980) suffix-stripping algorithm with the extensions
//! used by NLTK's default `PorterStemmer` mode, so stems line up with
//! vocabularies built by NLTK-based preprocessing:
//!
//! - a small pool of irregular forms (`"dying"` -> `"die"`, `"skies"` -> `"sky"`)
//! - words of one or two letters are returned unchanged
//! - `-ies`/`-ied` on four-letter words keep the `e` (`"dies"` -> `"die"`)
//! - step 1c only rewrites `y` after a consonant
//! - step 2 uses `bli` -> `ble`, handles `alli` first, and adds `fulli`/`logi`
//! - `*o` also matches two-letter vowel-consonant stems
//!
//! # Algorithm
//!
//! 1. Plurals and -ed/-ing suffixes, then terminal y -> i
//! 2. Double suffixes to single ones (-ational -> -ate, -tional -> -tion, ...)
//! 3. -icate -> -ic, -ative -> "", -ful -> "", -ness -> "", ...
//! 4. Remove -al, -ance, -ence, -er, ... when the measure exceeds 1
//! 5. Remove a final -e and reduce -ll
//!
//! # Examples
//!
//! ```
//! use critique::analysis::token_filter::stem::Stemmer;
//! use critique::analysis::token_filter::stem::porter::PorterStemmer;
//!
//! let stemmer = PorterStemmer::new();
//!
//! assert_eq!(stemmer.stem("running"), "run");
//! assert_eq!(stemmer.stem("amazing"), "amaz");
//! assert_eq!(stemmer.stem("traditional"), "tradit");
//! ```

use crate::analysis::token_filter::stem::Stemmer;

/// A rule condition evaluated against the stem left after removing a suffix.
type Condition<'a> = Option<&'a dyn Fn(&str) -> bool>;

/// Irregular forms resolved before running the algorithm.
const IRREGULAR_FORMS: &[(&str, &str)] = &[
    ("sky", "sky"),
    ("skies", "sky"),
    ("dying", "die"),
    ("lying", "lie"),
    ("tying", "tie"),
    ("news", "news"),
    ("innings", "inning"),
    ("inning", "inning"),
    ("outings", "outing"),
    ("outing", "outing"),
    ("cannings", "canning"),
    ("canning", "canning"),
    ("howe", "howe"),
    ("proceed", "proceed"),
    ("exceed", "exceed"),
    ("succeed", "succeed"),
];

/// Porter stemmer.
#[derive(Debug, Clone, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    /// Create a new Porter stemmer.
    pub fn new() -> Self {
        PorterStemmer
    }

    /// Check if the character at `pos` is a consonant.
    ///
    /// `y` is a consonant at the start of a word or after a vowel, and a
    /// vowel after a consonant.
    fn is_consonant(chars: &[char], pos: usize) -> bool {
        match chars[pos] {
            'a' | 'e' | 'i' | 'o' | 'u' => false,
            'y' => pos == 0 || !Self::is_consonant(chars, pos - 1),
            _ => true,
        }
    }

    /// Calculate the measure of a stem: the number of VC sequences in `[C](VC){m}[V]`.
    fn measure(&self, stem: &str) -> usize {
        let chars: Vec<char> = stem.chars().collect();
        (1..chars.len())
            .filter(|&i| !Self::is_consonant(&chars, i - 1) && Self::is_consonant(&chars, i))
            .count()
    }

    /// `*v*`: the stem contains a vowel.
    fn contains_vowel(&self, stem: &str) -> bool {
        let chars: Vec<char> = stem.chars().collect();
        (0..chars.len()).any(|i| !Self::is_consonant(&chars, i))
    }

    /// `*d`: the word ends with a double consonant.
    fn ends_double_consonant(&self, word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        let len = chars.len();
        len >= 2 && chars[len - 1] == chars[len - 2] && Self::is_consonant(&chars, len - 1)
    }

    /// `*o`: the word ends consonant-vowel-consonant, the last not w, x or y.
    fn ends_cvc(&self, word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        let len = chars.len();

        let cvc = len >= 3
            && Self::is_consonant(&chars, len - 3)
            && !Self::is_consonant(&chars, len - 2)
            && Self::is_consonant(&chars, len - 1)
            && !matches!(chars[len - 1], 'w' | 'x' | 'y');

        cvc || (len == 2 && !Self::is_consonant(&chars, 0) && Self::is_consonant(&chars, 1))
    }

    /// Apply the first rule whose suffix matches.
    ///
    /// Once a suffix matches, no later rule is tried even if the condition
    /// rejects the stem.
    fn apply_rules(&self, word: &str, rules: &[(&str, &str, Condition<'_>)]) -> String {
        for (suffix, replacement, condition) in rules {
            if let Some(stem) = word.strip_suffix(suffix) {
                return match condition {
                    Some(condition) if !condition(stem) => word.to_string(),
                    _ => format!("{stem}{replacement}"),
                };
            }
        }
        word.to_string()
    }

    /// Step 1a: plurals.
    fn step1a(&self, word: &str) -> String {
        if let Some(stem) = word.strip_suffix("ies")
            && word.chars().count() == 4
        {
            return format!("{stem}ie");
        }

        self.apply_rules(
            word,
            &[
                ("sses", "ss", None),
                ("ies", "i", None),
                ("ss", "ss", None),
                ("s", "", None),
            ],
        )
    }

    /// Step 1b: -eed, -ed and -ing.
    fn step1b(&self, word: &str) -> String {
        if let Some(stem) = word.strip_suffix("ied") {
            return if word.chars().count() == 4 {
                format!("{stem}ie")
            } else {
                format!("{stem}i")
            };
        }

        if let Some(stem) = word.strip_suffix("eed") {
            return if self.measure(stem) > 0 {
                format!("{stem}ee")
            } else {
                word.to_string()
            };
        }

        let Some(stem) = ["ed", "ing"].iter().find_map(|suffix| {
            word.strip_suffix(suffix)
                .filter(|stem| self.contains_vowel(stem))
        }) else {
            return word.to_string();
        };

        // at -> ate, bl -> ble, iz -> ize
        if ["at", "bl", "iz"].iter().any(|suffix| stem.ends_with(suffix)) {
            return format!("{stem}e");
        }

        if self.ends_double_consonant(stem) {
            return match stem.chars().last() {
                Some('l' | 's' | 'z') => stem.to_string(),
                Some(last) => stem[..stem.len() - last.len_utf8()].to_string(),
                None => stem.to_string(),
            };
        }

        if self.measure(stem) == 1 && self.ends_cvc(stem) {
            format!("{stem}e")
        } else {
            stem.to_string()
        }
    }

    /// Step 1c: terminal y -> i after a consonant.
    fn step1c(&self, word: &str) -> String {
        let after_consonant: &dyn Fn(&str) -> bool = &|stem| {
            let chars: Vec<char> = stem.chars().collect();
            chars.len() > 1 && Self::is_consonant(&chars, chars.len() - 1)
        };
        self.apply_rules(word, &[("y", "i", Some(after_consonant))])
    }

    /// Step 2: double suffixes.
    fn step2(&self, word: &str) -> String {
        if let Some(stem) = word.strip_suffix("alli")
            && self.measure(stem) > 0
        {
            return self.step2(&format!("{stem}al"));
        }

        let positive: &dyn Fn(&str) -> bool = &|stem| self.measure(stem) > 0;
        // The 'l' of "logi" stays with the stem so short stems like "geo" qualify.
        let logi: &dyn Fn(&str) -> bool = &|stem| self.measure(&format!("{stem}l")) > 0;

        self.apply_rules(
            word,
            &[
                ("ational", "ate", Some(positive)),
                ("tional", "tion", Some(positive)),
                ("enci", "ence", Some(positive)),
                ("anci", "ance", Some(positive)),
                ("izer", "ize", Some(positive)),
                ("bli", "ble", Some(positive)),
                ("alli", "al", Some(positive)),
                ("entli", "ent", Some(positive)),
                ("eli", "e", Some(positive)),
                ("ousli", "ous", Some(positive)),
                ("ization", "ize", Some(positive)),
                ("ation", "ate", Some(positive)),
                ("ator", "ate", Some(positive)),
                ("alism", "al", Some(positive)),
                ("iveness", "ive", Some(positive)),
                ("fulness", "ful", Some(positive)),
                ("ousness", "ous", Some(positive)),
                ("aliti", "al", Some(positive)),
                ("iviti", "ive", Some(positive)),
                ("biliti", "ble", Some(positive)),
                ("fulli", "ful", Some(positive)),
                ("logi", "log", Some(logi)),
            ],
        )
    }

    /// Step 3: -icate, -ative, -alize, -iciti, -ical, -ful, -ness.
    fn step3(&self, word: &str) -> String {
        let positive: &dyn Fn(&str) -> bool = &|stem| self.measure(stem) > 0;

        self.apply_rules(
            word,
            &[
                ("icate", "ic", Some(positive)),
                ("ative", "", Some(positive)),
                ("alize", "al", Some(positive)),
                ("iciti", "ic", Some(positive)),
                ("ical", "ic", Some(positive)),
                ("ful", "", Some(positive)),
                ("ness", "", Some(positive)),
            ],
        )
    }

    /// Step 4: strip residual suffixes from long stems.
    fn step4(&self, word: &str) -> String {
        let gt1: &dyn Fn(&str) -> bool = &|stem| self.measure(stem) > 1;
        let ion: &dyn Fn(&str) -> bool =
            &|stem| self.measure(stem) > 1 && (stem.ends_with('s') || stem.ends_with('t'));

        self.apply_rules(
            word,
            &[
                ("al", "", Some(gt1)),
                ("ance", "", Some(gt1)),
                ("ence", "", Some(gt1)),
                ("er", "", Some(gt1)),
                ("ic", "", Some(gt1)),
                ("able", "", Some(gt1)),
                ("ible", "", Some(gt1)),
                ("ant", "", Some(gt1)),
                ("ement", "", Some(gt1)),
                ("ment", "", Some(gt1)),
                ("ent", "", Some(gt1)),
                ("ion", "", Some(ion)),
                ("ou", "", Some(gt1)),
                ("ism", "", Some(gt1)),
                ("ate", "", Some(gt1)),
                ("iti", "", Some(gt1)),
                ("ous", "", Some(gt1)),
                ("ive", "", Some(gt1)),
                ("ize", "", Some(gt1)),
            ],
        )
    }

    /// Step 5a: remove a final -e.
    fn step5a(&self, word: &str) -> String {
        if let Some(stem) = word.strip_suffix('e') {
            let m = self.measure(stem);
            if m > 1 || (m == 1 && !self.ends_cvc(stem)) {
                return stem.to_string();
            }
        }
        word.to_string()
    }

    /// Step 5b: -ll -> -l on long stems.
    fn step5b(&self, word: &str) -> String {
        if let Some(stem) = word.strip_suffix('l')
            && stem.ends_with('l')
            && self.measure(stem) > 1
        {
            return stem.to_string();
        }
        word.to_string()
    }
}

impl Stemmer for PorterStemmer {
    fn stem(&self, word: &str) -> String {
        let word = word.to_lowercase();

        if let Some((_, stem)) = IRREGULAR_FORMS.iter().find(|(form, _)| *form == word) {
            return stem.to_string();
        }

        if word.chars().count() <= 2 {
            return word;
        }

        let word = self.step1a(&word);
        let word = self.step1b(&word);
        let word = self.step1c(&word);
        let word = self.step2(&word);
        let word = self.step3(&word);
        let word = self.step4(&word);
        let word = self.step5a(&word);
        self.step5b(&word)
    }

    fn name(&self) -> &'static str {
        "porter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_stems(cases: &[(&str, &str)]) {
        let stemmer = PorterStemmer::new();
        for (word, expected) in cases {
            assert_eq!(stemmer.stem(word), *expected, "stem({word})");
        }
    }

    #[test]
    fn test_porter_stemmer() {
        assert_stems(&[
            ("running", "run"),
            ("flies", "fli"),
            ("agreed", "agre"),
            ("disabled", "disabl"),
            ("measuring", "measur"),
            ("itemization", "item"),
            ("sensational", "sensat"),
            ("traditional", "tradit"),
        ]);
    }

    #[test]
    fn test_review_vocabulary() {
        assert_stems(&[
            ("amazing", "amaz"),
            ("love", "love"),
            ("loved", "love"),
            ("product", "product"),
            ("disappointed", "disappoint"),
            ("quality", "qualiti"),
            ("delivery", "deliveri"),
            ("satisfied", "satisfi"),
            ("waste", "wast"),
            ("money", "money"),
            ("happy", "happi"),
            ("good", "good"),
        ]);
    }

    #[test]
    fn test_step1() {
        assert_stems(&[
            ("caresses", "caress"),
            ("ponies", "poni"),
            ("ties", "tie"),
            ("cats", "cat"),
            ("feed", "feed"),
            ("plastered", "plaster"),
            ("bled", "bled"),
            ("conflated", "conflat"),
            ("sized", "size"),
            ("hated", "hate"),
            ("rated", "rate"),
            ("troubled", "troubl"),
            ("hopping", "hop"),
            ("falling", "fall"),
            ("fizzed", "fizz"),
            ("filing", "file"),
            ("died", "die"),
            ("spied", "spi"),
        ]);
    }

    #[test]
    fn test_steps_2_to_5() {
        assert_stems(&[
            ("relational", "relat"),
            ("conditional", "condit"),
            ("operator", "oper"),
            ("radicalli", "radic"),
            ("differentli", "differ"),
            ("hopefulness", "hope"),
            ("goodness", "good"),
            ("triplicate", "triplic"),
            ("electrical", "electr"),
            ("effective", "effect"),
            ("adjustment", "adjust"),
            ("replacement", "replac"),
            ("cease", "ceas"),
            ("rate", "rate"),
            ("controll", "control"),
            ("roll", "roll"),
        ]);
    }

    #[test]
    fn test_irregular_and_short_words() {
        assert_stems(&[
            ("skies", "sky"),
            ("dying", "die"),
            ("news", "news"),
            ("proceed", "proceed"),
            ("is", "is"),
            ("a", "a"),
            ("", ""),
        ]);
    }

    #[test]
    fn test_porter_measure() {
        let stemmer = PorterStemmer::new();

        assert_eq!(stemmer.measure("tr"), 0);
        assert_eq!(stemmer.measure("tree"), 0);
        assert_eq!(stemmer.measure("trees"), 1);
        assert_eq!(stemmer.measure("trouble"), 1);
        assert_eq!(stemmer.measure("troubles"), 2);
        assert_eq!(stemmer.measure("oaten"), 2);
    }

    #[test]
    fn test_porter_consonant_detection() {
        let word: Vec<char> = "toy".chars().collect();
        assert!(PorterStemmer::is_consonant(&word, 0));
        assert!(!PorterStemmer::is_consonant(&word, 1));
        assert!(PorterStemmer::is_consonant(&word, 2)); // y after a vowel

        let word: Vec<char> = "syzygy".chars().collect();
        assert!(PorterStemmer::is_consonant(&word, 0));
        assert!(!PorterStemmer::is_consonant(&word, 1)); // y after a consonant
    }
}
