//! Fixed-length sequence padding.

use serde::{Deserialize, Serialize};

use super::TokenId;

/// Value used to fill short sequences.
pub const PADDING_VALUE: TokenId = 0;

/// Which side of a short sequence receives the padding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Padding {
    /// Pad at the front (the layout the model was trained with).
    #[default]
    Pre,
    /// Pad at the end.
    Post,
}

/// Which side of a long sequence loses tokens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Truncating {
    /// Drop the earliest tokens, keeping the last `max_len`.
    #[default]
    Pre,
    /// Drop the latest tokens, keeping the first `max_len`.
    Post,
}

/// Pad or truncate `sequence` to exactly `max_len` ids.
///
/// ```
/// use critique::sequence::{Padding, Truncating, pad_sequence};
///
/// assert_eq!(pad_sequence(&[7, 8], 4, Padding::Pre, Truncating::Pre), vec![0, 0, 7, 8]);
/// assert_eq!(pad_sequence(&[1, 2, 3, 4, 5], 3, Padding::Pre, Truncating::Pre), vec![3, 4, 5]);
/// ```
pub fn pad_sequence(
    sequence: &[TokenId],
    max_len: usize,
    padding: Padding,
    truncating: Truncating,
) -> Vec<TokenId> {
    let kept = if sequence.len() > max_len {
        match truncating {
            Truncating::Pre => &sequence[sequence.len() - max_len..],
            Truncating::Post => &sequence[..max_len],
        }
    } else {
        sequence
    };

    let fill = max_len - kept.len();
    let mut padded = Vec::with_capacity(max_len);
    match padding {
        Padding::Pre => {
            padded.resize(fill, PADDING_VALUE);
            padded.extend_from_slice(kept);
        }
        Padding::Post => {
            padded.extend_from_slice(kept);
            padded.resize(max_len, PADDING_VALUE);
        }
    }
    padded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pre_padding() {
        assert_eq!(pad_sequence(&[5, 6], 5, Padding::Pre, Truncating::Pre), vec![0, 0, 0, 5, 6]);
    }

    #[test]
    fn test_post_padding() {
        assert_eq!(pad_sequence(&[5, 6], 4, Padding::Post, Truncating::Pre), vec![5, 6, 0, 0]);
    }

    #[test]
    fn test_empty_sequence() {
        assert_eq!(pad_sequence(&[], 3, Padding::Pre, Truncating::Pre), vec![0, 0, 0]);
        assert!(pad_sequence(&[], 0, Padding::Pre, Truncating::Pre).is_empty());
    }

    #[test]
    fn test_pre_truncation_keeps_last_tokens() {
        let sequence: Vec<TokenId> = (1..=150).collect();
        let padded = pad_sequence(&sequence, 100, Padding::Pre, Truncating::Pre);
        assert_eq!(padded.len(), 100);
        assert_eq!(padded[0], 51);
        assert_eq!(padded[99], 150);
    }

    #[test]
    fn test_post_truncation_keeps_first_tokens() {
        assert_eq!(pad_sequence(&[1, 2, 3, 4], 2, Padding::Pre, Truncating::Post), vec![1, 2]);
    }

    #[test]
    fn test_exact_length_is_unchanged() {
        assert_eq!(pad_sequence(&[9, 8, 7], 3, Padding::Post, Truncating::Post), vec![9, 8, 7]);
    }
}
