//! Text primitives shared by the matching strategies.
//!
//! Word boundaries are defined by [`char::is_alphanumeric`]: anything else
//! (whitespace, punctuation, symbols, underscores) separates words.

use std::borrow::Cow;

use regex::{Regex, RegexBuilder};

/// Lowercases `value` unless the comparison is case sensitive.
pub(crate) fn fold(value: &str, case_sensitive: bool) -> Cow<'_, str> {
    if case_sensitive {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(value.to_lowercase())
    }
}

/// Splits `value` into its alphanumeric words.
pub fn words(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
}

/// Builds a pattern matching `term` only where it is bounded by
/// non-alphanumeric characters or the ends of the input.
pub(crate) fn word_pattern(term: &str, case_sensitive: bool) -> Result<Regex, regex::Error> {
    let pattern = format!(
        r"(?:^|[^\p{{Alphabetic}}\p{{N}}]){}(?:$|[^\p{{Alphabetic}}\p{{N}}])",
        regex::escape(term)
    );
    RegexBuilder::new(&pattern)
        .case_insensitive(!case_sensitive)
        .build()
}

/// Levenshtein edit distance with unit costs, over Unicode scalar values.
///
/// ```
/// use standout_search::levenshtein;
///
/// assert_eq!(levenshtein("kitten", "sitting"), 3);
/// assert_eq!(levenshtein("sitting", "kitten"), 3);
/// ```
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    if b.is_empty() {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for j in 1..=b.len() {
            let cost = usize::from(ca != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Returns `true` if `a` and `b` are at most `max` edits apart.
pub(crate) fn within_distance(a: &str, b: &str, max: usize) -> bool {
    if max == 0 {
        return a == b;
    }
    let (la, lb) = (a.chars().count(), b.chars().count());
    if la.abs_diff(lb) > max {
        return false;
    }
    levenshtein(a, b) <= max
}

/// American Soundex code of the ASCII letters in `value`.
///
/// Returns `None` when `value` has no ASCII letter to anchor the code.
///
/// ```
/// use standout_search::soundex;
///
/// assert_eq!(soundex("Robert").as_deref(), Some("R163"));
/// assert_eq!(soundex("Rupert").as_deref(), Some("R163"));
/// assert_eq!(soundex("42"), None);
/// ```
pub fn soundex(value: &str) -> Option<String> {
    let mut letters = value
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase());

    let first = letters.next()?;
    let mut code = String::with_capacity(4);
    code.push(first);
    let mut last = soundex_digit(first);

    for letter in letters {
        match soundex_digit(letter) {
            Some(digit) => {
                if last != Some(digit) {
                    code.push(digit);
                    if code.len() == 4 {
                        break;
                    }
                }
                last = Some(digit);
            }
            // H and W do not separate letters with the same code.
            None if letter == 'H' || letter == 'W' => {}
            None => last = None,
        }
    }

    while code.len() < 4 {
        code.push('0');
    }
    Some(code)
}

fn soundex_digit(letter: char) -> Option<char> {
    match letter {
        'B' | 'F' | 'P' | 'V' => Some('1'),
        'C' | 'G' | 'J' | 'K' | 'Q' | 'S' | 'X' | 'Z' => Some('2'),
        'D' | 'T' => Some('3'),
        'L' => Some('4'),
        'M' | 'N' => Some('5'),
        'R' => Some('6'),
        _ => None,
    }
}
