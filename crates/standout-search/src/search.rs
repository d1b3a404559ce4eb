//! The fluent search session.
//!
//! A [`Search`] pairs a source with the predicate tree built so far and the
//! fields currently selected. Every fluent call borrows the session and
//! returns a new one, so a partially built search can be reused as the
//! starting point of several independent searches.
//!
//! # Combination Rules
//!
//! ```text
//! fields(A).containing(x)                 → A ∋ x
//! fields(A).containing(x).starting_with(y) → (A ∋ x) ∧ (A starts with y)
//! fields(A).equal_to(x).fields(B).containing(y)
//!                                         → (A = x) ∧ (B ∋ y)
//! fields(A).containing(x).or_fields(B).containing(x)
//!                                         → (A ∋ x) ∨ (B ∋ x)
//! ```
//!
//! Independent stages always combine with AND. `or_fields` makes only the
//! next criterion combine with OR against the most recent stage.

use std::fmt;

use tracing::debug;

use crate::criterion::{Criterion, Term};
use crate::error::{Result, SearchError};
use crate::eval::{Matches, Predicate};
use crate::field::FieldPath;
use crate::node::PredicateNode;
use crate::strategy::{SearchOptions, Strategy};
use crate::traits::Searchable;

/// Something a search can run against.
///
/// Sources that execute elsewhere use [`Source::accept`] to reject criteria
/// they cannot express, at the moment the criterion is added.
pub trait Source<T> {
    /// Checks that this source can execute `criterion`.
    fn accept(&self, criterion: &Criterion<T>) -> Result<()> {
        let _ = criterion;
        Ok(())
    }
}

/// An in-memory source: any cloneable iterable of record references.
#[derive(Debug, Clone, Copy)]
pub struct Records<I> {
    items: I,
}

impl<I> Records<I> {
    /// Wraps an iterable of records.
    pub fn new(items: I) -> Self {
        Records { items }
    }
}

impl<T, I> Source<T> for Records<I> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Join {
    And,
    Or,
}

/// A fluent, immutable search session.
///
/// # Example
///
/// ```
/// use standout_search::{Search, Searchable};
///
/// #[derive(Searchable)]
/// struct Post {
///     #[search(text)]
///     title: String,
///     #[search(text)]
///     body: String,
/// }
///
/// let posts = vec![
///     Post { title: "Rust tips".into(), body: "borrowing explained".into() },
///     Post { title: "Gardening".into(), body: "tomatoes and rust on leaves".into() },
///     Post { title: "Cooking".into(), body: "pasta".into() },
/// ];
///
/// let rusty = Search::records(&posts)
///     .fields(["title", "body"])?
///     .containing(["rust"])?;
/// assert_eq!(rusty.count()?, 2);
///
/// let exact = rusty.fields(["title"])?.equal_to(["gardening"])?;
/// assert_eq!(exact.first()?.map(|p| p.title.as_str()), Some("Gardening"));
/// # Ok::<(), standout_search::SearchError>(())
/// ```
pub struct Search<T, S> {
    source: S,
    stages: Vec<PredicateNode<T>>,
    current: Option<FieldPath<T>>,
    join: Join,
    options: SearchOptions,
}

impl<T, S: Source<T>> Search<T, S> {
    /// Starts an empty search over `source`. An empty search matches
    /// every record.
    pub fn over(source: S) -> Self {
        Search {
            source,
            stages: Vec::new(),
            current: None,
            join: Join::And,
            options: SearchOptions::default(),
        }
    }
}

impl<T, S> Search<T, S> {
    /// Returns the source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the currently selected fields, if any.
    pub fn current_fields(&self) -> Option<&FieldPath<T>> {
        self.current.as_ref()
    }

    /// Returns the session-wide matching options.
    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Returns the predicate tree built so far, or `None` if no criterion
    /// has been added.
    pub fn tree(&self) -> Option<PredicateNode<T>> {
        PredicateNode::all(self.stages.iter().cloned())
    }

    /// Compiles the tree for in-memory evaluation.
    pub fn predicate(&self) -> Predicate<T> {
        match self.tree() {
            Some(tree) => Predicate::compile(&tree),
            None => Predicate::accept_all(),
        }
    }
}

impl<'a, T: 'a, I> Search<T, Records<I>>
where
    I: IntoIterator<Item = &'a T> + Clone,
{
    /// Starts an empty search over in-memory records.
    pub fn records(items: I) -> Self {
        Search::over(Records::new(items))
    }

    /// Lazily iterates over the matching records in source order.
    ///
    /// Each call starts over from the source.
    pub fn iter(&self) -> Matches<T, I::IntoIter> {
        self.predicate().filter(self.source.items.clone())
    }

    /// Collects the matching records.
    pub fn to_vec(&self) -> Result<Vec<&'a T>> {
        self.iter().collect()
    }

    /// Counts the matching records.
    pub fn count(&self) -> Result<usize> {
        let mut count = 0;
        for record in self.iter() {
            record?;
            count += 1;
        }
        Ok(count)
    }

    /// Returns the first matching record.
    pub fn first(&self) -> Result<Option<&'a T>> {
        self.iter().next().transpose()
    }
}

impl<'s, 'a, T: 'a, I> IntoIterator for &'s Search<T, Records<I>>
where
    I: IntoIterator<Item = &'a T> + Clone,
{
    type Item = Result<&'a T>;
    type IntoIter = Matches<T, I::IntoIter>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S> Search<T, S>
where
    T: Searchable,
    S: Source<T> + Clone,
{
    /// Selects the fields subsequent criteria apply to.
    ///
    /// Starts a new stage: the next criterion combines with the existing
    /// tree using AND.
    pub fn fields<I, N>(&self, selectors: I) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let path = FieldPath::resolve(selectors)?;
        debug!(fields = ?path, "selected search fields");
        Ok(self.with_fields(path, Join::And))
    }

    /// Selects alternative fields: the next criterion combines with the most
    /// recent stage using OR.
    ///
    /// With no stage yet, this behaves like [`Search::fields`].
    pub fn or_fields<I, N>(&self, selectors: I) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let path = FieldPath::resolve(selectors)?;
        debug!(fields = ?path, "selected alternative search fields");
        let join = if self.stages.is_empty() {
            Join::And
        } else {
            Join::Or
        };
        Ok(self.with_fields(path, join))
    }

    /// Sets case sensitivity for subsequent criteria. Default: insensitive.
    pub fn case_sensitive(&self, yes: bool) -> Self {
        let mut next = self.clone();
        next.options.case_sensitive = yes;
        next
    }

    /// Makes subsequent contains-family criteria match whole words only.
    pub fn match_whole_words(&self, yes: bool) -> Self {
        let mut next = self.clone();
        next.options.whole_word = yes;
        next
    }

    /// Adds a criterion with explicit options over the current fields.
    ///
    /// Session options are ignored; `options` is used as given.
    pub fn with_strategy<I>(&self, strategy: Strategy, terms: I, options: SearchOptions) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        let fields = self
            .current
            .clone()
            .ok_or(SearchError::NoFieldsSelected {
                strategy: strategy.as_str(),
            })?;
        let criterion = Criterion::new(strategy, fields, terms, options)?;
        self.source.accept(&criterion)?;

        let leaf = PredicateNode::leaf(criterion);
        let mut stages = self.stages.clone();
        match (self.join, stages.pop()) {
            (Join::Or, Some(last)) => stages.push(last.or(&leaf)),
            (_, last) => {
                stages.extend(last);
                stages.push(leaf);
            }
        }
        debug!(
            %strategy,
            joined_with_or = self.join == Join::Or,
            stages = stages.len(),
            "added search criterion"
        );

        Ok(Search {
            source: self.source.clone(),
            stages,
            current: self.current.clone(),
            join: Join::And,
            options: self.options,
        })
    }

    /// Matches records where a selected field equals one of `terms`.
    pub fn equal_to<I>(&self, terms: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        self.apply(Strategy::Equals, terms)
    }

    /// Matches records where a selected field contains one of `terms`.
    pub fn containing<I>(&self, terms: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        self.apply(Strategy::Contains, terms)
    }

    /// Matches records where a single selected field contains every term.
    pub fn containing_all<I>(&self, terms: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        self.apply(Strategy::ContainingAll, terms)
    }

    /// Matches records where a selected field contains any of `terms`.
    pub fn containing_any<I>(&self, terms: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        self.apply(Strategy::ContainingAny, terms)
    }

    /// Matches records where a selected field starts with one of `terms`.
    pub fn starting_with<I>(&self, terms: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        self.apply(Strategy::StartsWith, terms)
    }

    /// Matches records where a selected field ends with one of `terms`.
    pub fn ending_with<I>(&self, terms: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        self.apply(Strategy::EndsWith, terms)
    }

    /// Matches records where a selected field has one of `terms` as a word.
    pub fn whole_words<I>(&self, terms: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        self.apply(Strategy::WholeWord, terms)
    }

    /// Matches records where a selected field, or one of its words, is
    /// within `max_distance` edits of one of `terms`.
    pub fn fuzzy<I>(&self, terms: I, max_distance: usize) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        let options = self.options_for(Strategy::Fuzzy).max_distance(max_distance);
        self.with_strategy(Strategy::Fuzzy, terms, options)
    }

    /// Matches records where a word of a selected field sounds like one of
    /// `terms` (American Soundex).
    pub fn sounding_like<I>(&self, terms: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        self.apply(Strategy::Phonetic, terms)
    }

    fn apply<I>(&self, strategy: Strategy, terms: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        self.with_strategy(strategy, terms, self.options_for(strategy))
    }

    fn options_for(&self, strategy: Strategy) -> SearchOptions {
        SearchOptions {
            case_sensitive: self.options.case_sensitive,
            whole_word: self.options.whole_word && strategy.is_contains_family(),
            max_distance: None,
        }
    }

    fn with_fields(&self, path: FieldPath<T>, join: Join) -> Self {
        Search {
            source: self.source.clone(),
            stages: self.stages.clone(),
            current: Some(path),
            join,
            options: self.options,
        }
    }
}

impl<T, S: Clone> Clone for Search<T, S> {
    fn clone(&self) -> Self {
        Search {
            source: self.source.clone(),
            stages: self.stages.clone(),
            current: self.current.clone(),
            join: self.join,
            options: self.options,
        }
    }
}

impl<T, S: fmt::Debug> fmt::Debug for Search<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Search")
            .field("source", &self.source)
            .field("tree", &self.tree())
            .field("current", &self.current)
            .field("options", &self.options)
            .finish()
    }
}

/// Starts searches directly on slices.
///
/// ```
/// use standout_search::{SearchExt, Searchable};
///
/// #[derive(Searchable)]
/// struct Tag {
///     #[search(text)]
///     label: String,
/// }
///
/// let tags = vec![Tag { label: "urgent".into() }, Tag { label: "later".into() }];
/// let found = tags.search(["label"])?.starting_with(["URG"])?.to_vec()?;
/// assert_eq!(found.len(), 1);
/// # Ok::<(), standout_search::SearchError>(())
/// ```
pub trait SearchExt<T> {
    /// Starts a search over these records with `selectors` selected.
    fn search<I, N>(&self, selectors: I) -> Result<Search<T, Records<&[T]>>>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>;
}

impl<T: Searchable> SearchExt<T> for [T] {
    fn search<I, N>(&self, selectors: I) -> Result<Search<T, Records<&[T]>>>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        Search::records(self).fields(selectors)
    }
}
