//! Criteria: one strategy applied to a field path with a set of terms.
//!
//! A [`Criterion`] is immutable and validated on construction. Literal terms
//! are case-folded (and compiled into whole-word patterns) once, up front.

use std::fmt;

use regex::Regex;

use crate::error::{Result, SearchError};
use crate::eval::FieldFault;
use crate::field::{FieldPath, FieldRef};
use crate::strategy::{SearchOptions, Strategy};
use crate::text;
use crate::traits::Searchable;

/// A search term as supplied by the caller.
///
/// Terms are either literal text or a reference to another field of the same
/// record, whose value is used as the term when the record is evaluated.
///
/// ```
/// use standout_search::Term;
///
/// let literal: Term = "needle".into();
/// assert_eq!(literal, Term::Text("needle".to_string()));
/// assert_eq!(Term::field("title"), Term::Field("title".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// Literal text.
    Text(String),
    /// The value of the named field of the record under evaluation.
    Field(String),
}

impl Term {
    /// Creates a literal term.
    pub fn text(value: impl Into<String>) -> Self {
        Term::Text(value.into())
    }

    /// Creates a term read from another field of each record.
    pub fn field(name: impl Into<String>) -> Self {
        Term::Field(name.into())
    }
}

impl From<&str> for Term {
    fn from(s: &str) -> Self {
        Term::Text(s.to_string())
    }
}

impl From<String> for Term {
    fn from(s: String) -> Self {
        Term::Text(s)
    }
}

impl From<&String> for Term {
    fn from(s: &String) -> Self {
        Term::Text(s.clone())
    }
}

/// A literal term prepared for matching.
#[derive(Clone)]
pub struct TextTerm {
    raw: String,
    folded: String,
    word: Option<Regex>,
}

impl TextTerm {
    fn new(raw: String, strategy: Strategy, options: &SearchOptions) -> Result<Self> {
        let folded = text::fold(&raw, options.case_sensitive).into_owned();
        let word = if options.whole_word && strategy.is_contains_family() {
            Some(text::word_pattern(&raw, options.case_sensitive)?)
        } else {
            None
        };
        Ok(TextTerm { raw, folded, word })
    }

    /// Returns the term as supplied.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Debug for TextTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.raw, f)
    }
}

/// A resolved term of a criterion.
pub enum CriterionTerm<T> {
    /// Literal text.
    Text(TextTerm),
    /// Another field of the same record.
    Field(FieldRef<T>),
}

impl<T> Clone for CriterionTerm<T> {
    fn clone(&self) -> Self {
        match self {
            CriterionTerm::Text(t) => CriterionTerm::Text(t.clone()),
            CriterionTerm::Field(f) => CriterionTerm::Field(f.clone()),
        }
    }
}

impl<T> fmt::Debug for CriterionTerm<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CriterionTerm::Text(t) => write!(f, "{t:?}"),
            CriterionTerm::Field(field) => write!(f, "@{}", field.name()),
        }
    }
}

/// One matching rule: strategy + fields + terms + options.
///
/// A criterion holds for a record when at least one of its fields satisfies
/// the strategy's term rule.
pub struct Criterion<T> {
    strategy: Strategy,
    fields: FieldPath<T>,
    terms: Vec<CriterionTerm<T>>,
    options: SearchOptions,
}

impl<T: Searchable> Criterion<T> {
    /// Builds a validated criterion.
    ///
    /// Fails with [`SearchError::EmptyTermSet`] for an empty term list,
    /// [`SearchError::EmptyTerm`] for an empty literal,
    /// [`SearchError::InvalidFieldPath`] for an unknown field term, and with
    /// the errors of [`Strategy::validate`] for misplaced options.
    pub fn new<I>(
        strategy: Strategy,
        fields: FieldPath<T>,
        terms: I,
        options: SearchOptions,
    ) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        strategy.validate(&options)?;

        let mut resolved = Vec::new();
        for (index, term) in terms.into_iter().map(Into::into).enumerate() {
            let term = match term {
                Term::Text(raw) if raw.is_empty() => {
                    return Err(SearchError::EmptyTerm { index });
                }
                Term::Text(raw) => CriterionTerm::Text(TextTerm::new(raw, strategy, &options)?),
                Term::Field(name) => CriterionTerm::Field(FieldRef::resolve(&name)?),
            };
            resolved.push(term);
        }

        if resolved.is_empty() {
            return Err(SearchError::EmptyTermSet {
                strategy: strategy.as_str(),
            });
        }

        Ok(Criterion {
            strategy,
            fields,
            terms: resolved,
            options,
        })
    }
}

impl<T> Criterion<T> {
    /// Returns the strategy.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Returns the fields this criterion searches.
    pub fn fields(&self) -> &FieldPath<T> {
        &self.fields
    }

    /// Returns the resolved terms in the order given.
    pub fn terms(&self) -> &[CriterionTerm<T>] {
        &self.terms
    }

    /// Returns the matching options.
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Evaluates this criterion against a record.
    ///
    /// Fields are tried left to right and evaluation stops at the first field
    /// that satisfies the terms.
    pub fn evaluate(&self, record: &T) -> std::result::Result<bool, FieldFault> {
        for field in &self.fields {
            let value = field
                .read(record)
                .map_err(|e| FieldFault::new(field.name(), e))?;
            if let Some(value) = value {
                if self.field_satisfies(&value, record)? {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn field_satisfies(&self, value: &str, record: &T) -> std::result::Result<bool, FieldFault> {
        let folded = text::fold(value, self.options.case_sensitive);
        let all = self.strategy.requires_all_terms();

        for term in &self.terms {
            let hit = self.term_hits(value, &folded, term, record)?;
            if hit != all {
                return Ok(hit);
            }
        }
        Ok(all)
    }

    fn term_hits(
        &self,
        value: &str,
        folded: &str,
        term: &CriterionTerm<T>,
        record: &T,
    ) -> std::result::Result<bool, FieldFault> {
        match term {
            CriterionTerm::Text(t) => Ok(self.strategy.test_term(
                value,
                folded,
                &t.folded,
                t.word.as_ref(),
                &self.options,
            )),
            CriterionTerm::Field(source) => {
                let raw = source
                    .read(record)
                    .map_err(|e| FieldFault::new(source.name(), e))?;
                let Some(raw) = raw else {
                    return Ok(false);
                };
                let needle = text::fold(&raw, self.options.case_sensitive);
                let word = if self.options.whole_word && self.strategy.is_contains_family() {
                    let pattern = text::word_pattern(&raw, self.options.case_sensitive)
                        .map_err(|e| FieldFault::pattern(source.name(), e))?;
                    Some(pattern)
                } else {
                    None
                };
                Ok(self
                    .strategy
                    .test_term(value, folded, &needle, word.as_ref(), &self.options))
            }
        }
    }
}

impl<T> Clone for Criterion<T> {
    fn clone(&self) -> Self {
        Criterion {
            strategy: self.strategy,
            fields: self.fields.clone(),
            terms: self.terms.clone(),
            options: self.options,
        }
    }
}

impl<T> fmt::Debug for Criterion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Criterion")
            .field("strategy", &self.strategy)
            .field("fields", &self.fields)
            .field("terms", &self.terms)
            .field("options", &self.options)
            .finish()
    }
}
