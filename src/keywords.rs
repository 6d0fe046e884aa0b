use std::collections::HashMap;

use crate::model::KeywordCount;

pub const DEFAULT_TOP_K: usize = 10;

/// Tokens this short are treated as stop words.
const MIN_TOKEN_CHARS: usize = 4;

const TRAILING_PUNCTUATION: &[char] = &['.', ',', '!', '?'];

/// Most frequent tokens across `texts`, highest count first.
///
/// Ties keep the order in which the tokens were first seen.
pub fn top_keywords<S: AsRef<str>>(texts: &[S], k: usize) -> Vec<KeywordCount> {
    let mut counts: Vec<KeywordCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for text in texts {
        let lowered = text.as_ref().to_lowercase();
        for token in lowered.split_whitespace() {
            if token.chars().count() < MIN_TOKEN_CHARS {
                continue;
            }
            let token = token.trim_end_matches(TRAILING_PUNCTUATION);
            if token.is_empty() {
                continue;
            }
            match index.get(token) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(token.to_string(), counts.len());
                    counts.push(KeywordCount {
                        keyword: token.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(k);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(counts: &[KeywordCount]) -> Vec<(&str, usize)> {
        counts.iter().map(|c| (c.keyword.as_str(), c.count)).collect()
    }

    #[test]
    fn three_letter_tokens_are_excluded() {
        assert!(top_keywords(&["the cat sat", "the cat ran"], 2).is_empty());
    }

    #[test]
    fn four_letter_tokens_qualify() {
        let got = top_keywords(&["the cats sat", "the cats ran home"], 10);
        assert_eq!(pairs(&got), vec![("cats", 2), ("home", 1)]);
    }

    #[test]
    fn length_is_checked_before_stripping_punctuation() {
        // "cat!" has four characters and survives as "cat".
        let got = top_keywords(&["cat! cat"], 10);
        assert_eq!(pairs(&got), vec![("cat", 1)]);
    }

    #[test]
    fn strips_trailing_punctuation_and_lowercases() {
        let got = top_keywords(&["Refund, please!", "REFUND now?", "refund."], 10);
        assert_eq!(pairs(&got), vec![("refund", 3), ("please", 1)]);
    }

    #[test]
    fn ties_keep_first_seen_order_and_k_limits() {
        let got = top_keywords(&["delta alpha bravo", "bravo alpha"], 2);
        assert_eq!(pairs(&got), vec![("alpha", 2), ("bravo", 2)]);
    }

    #[test]
    fn punctuation_only_tokens_are_dropped() {
        assert!(top_keywords(&["....", "!!!!"], 5).is_empty());
    }

    #[test]
    fn empty_input() {
        let none: [&str; 0] = [];
        assert!(top_keywords(&none, 10).is_empty());
        assert!(top_keywords(&["shipping"], 0).is_empty());
    }
}
