//! Matching strategies and their options.
//!
//! A [`Strategy`] decides whether one field value satisfies a set of terms.
//! Terms combine with OR for every strategy except
//! [`Strategy::ContainingAll`], which requires every term.

use crate::error::{Result, SearchError};
use crate::text;

/// Edit distance used by [`Strategy::Fuzzy`] when none is configured.
pub const DEFAULT_MAX_DISTANCE: usize = 1;

/// A matching algorithm applied to a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Value equals at least one term.
    Equals,
    /// Value contains at least one term.
    Contains,
    /// Value contains every term.
    ContainingAll,
    /// Value contains at least one term.
    ContainingAny,
    /// Value starts with at least one term.
    StartsWith,
    /// Value ends with at least one term.
    EndsWith,
    /// One of the value's words equals at least one term.
    WholeWord,
    /// The value, or one of its words, is within the maximum edit distance
    /// of at least one term.
    Fuzzy,
    /// One of the value's words has the same Soundex code as a term.
    Phonetic,
}

impl Strategy {
    /// Returns `true` for the substring strategies that accept
    /// [`SearchOptions::whole_word`].
    pub fn is_contains_family(self) -> bool {
        matches!(
            self,
            Strategy::Contains | Strategy::ContainingAll | Strategy::ContainingAny
        )
    }

    /// Returns `true` if every term must match (AND), rather than any (OR).
    pub fn requires_all_terms(self) -> bool {
        matches!(self, Strategy::ContainingAll)
    }

    /// Checks that `options` make sense for this strategy.
    pub fn validate(self, options: &SearchOptions) -> Result<()> {
        if options.whole_word && !self.is_contains_family() {
            return Err(SearchError::InvalidOption {
                option: "whole_word",
                strategy: self.as_str(),
            });
        }
        if options.max_distance.is_some() && self != Strategy::Fuzzy {
            return Err(SearchError::InvalidDistance {
                strategy: self.as_str(),
            });
        }
        Ok(())
    }

    /// Evaluates this strategy against a field value.
    ///
    /// A missing value never matches. Terms are applied as given; callers
    /// building searches go through [`Criterion`](crate::Criterion), which
    /// rejects empty term sets up front. Fails with
    /// [`SearchError::InvalidPattern`] when a whole-word pattern cannot be
    /// compiled.
    ///
    /// ```
    /// use standout_search::{SearchOptions, Strategy};
    ///
    /// let options = SearchOptions::default();
    /// assert!(Strategy::ContainingAll.matches(Some("foo bar"), &["bar", "FOO"], &options)?);
    /// assert!(!Strategy::ContainingAll.matches(Some("foo"), &["foo", "bar"], &options)?);
    /// assert!(!Strategy::Equals.matches(None, &["foo"], &options)?);
    /// # Ok::<(), standout_search::SearchError>(())
    /// ```
    pub fn matches(self, value: Option<&str>, terms: &[&str], options: &SearchOptions) -> Result<bool> {
        let Some(value) = value else {
            return Ok(false);
        };
        let whole_word = options.whole_word && self.is_contains_family();
        let compiled = terms
            .iter()
            .map(|term| -> Result<_> {
                let word = if whole_word {
                    Some(text::word_pattern(term, options.case_sensitive)?)
                } else {
                    None
                };
                Ok((text::fold(term, options.case_sensitive), word))
            })
            .collect::<Result<Vec<_>>>()?;

        let folded = text::fold(value, options.case_sensitive);
        let hit = |needle: &str, word: Option<&regex::Regex>| {
            self.test_term(value, &folded, needle, word, options)
        };

        Ok(if self.requires_all_terms() {
            compiled.iter().all(|(needle, word)| hit(needle.as_ref(), word.as_ref()))
        } else {
            compiled.iter().any(|(needle, word)| hit(needle.as_ref(), word.as_ref()))
        })
    }

    /// Tests one term.
    ///
    /// `folded` and `needle` are already case-folded per the options;
    /// `word` is the whole-word pattern for the term, when that option is on.
    pub(crate) fn test_term(
        self,
        raw: &str,
        folded: &str,
        needle: &str,
        word: Option<&regex::Regex>,
        options: &SearchOptions,
    ) -> bool {
        if let Some(re) = word {
            return re.is_match(raw);
        }
        match self {
            Strategy::Equals => folded == needle,
            Strategy::Contains | Strategy::ContainingAll | Strategy::ContainingAny => {
                folded.contains(needle)
            }
            Strategy::StartsWith => folded.starts_with(needle),
            Strategy::EndsWith => folded.ends_with(needle),
            Strategy::WholeWord => text::words(folded).any(|w| w == needle),
            Strategy::Fuzzy => {
                let max = options.max_distance.unwrap_or(DEFAULT_MAX_DISTANCE);
                text::within_distance(folded, needle, max)
                    || text::words(folded).any(|w| text::within_distance(w, needle, max))
            }
            Strategy::Phonetic => match text::soundex(needle) {
                Some(code) => text::words(raw).any(|w| text::soundex(w).as_ref() == Some(&code)),
                None => false,
            },
        }
    }

    /// Returns the display name of this strategy.
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Equals => "equals",
            Strategy::Contains => "contains",
            Strategy::ContainingAll => "containing_all",
            Strategy::ContainingAny => "containing_any",
            Strategy::StartsWith => "starts_with",
            Strategy::EndsWith => "ends_with",
            Strategy::WholeWord => "whole_word",
            Strategy::Fuzzy => "fuzzy",
            Strategy::Phonetic => "phonetic",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Options applied to one criterion.
///
/// # Example
///
/// ```
/// use standout_search::SearchOptions;
///
/// let options = SearchOptions::new().case_sensitive(true).whole_word(true);
/// assert!(options.case_sensitive);
/// assert!(options.whole_word);
/// assert_eq!(options.max_distance, None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SearchOptions {
    /// Compare text exactly instead of case-insensitively.
    pub case_sensitive: bool,
    /// Only count substring hits bounded by non-alphanumeric characters.
    /// Valid for the contains family only.
    pub whole_word: bool,
    /// Maximum edit distance. Valid for [`Strategy::Fuzzy`] only.
    pub max_distance: Option<usize>,
}

impl SearchOptions {
    /// Creates the default options: case-insensitive, substring matching.
    pub fn new() -> Self {
        SearchOptions::default()
    }

    /// Sets case sensitivity.
    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    /// Sets whole-word matching.
    pub fn whole_word(mut self, yes: bool) -> Self {
        self.whole_word = yes;
        self
    }

    /// Sets the maximum edit distance.
    pub fn max_distance(mut self, distance: usize) -> Self {
        self.max_distance = Some(distance);
        self
    }
}
