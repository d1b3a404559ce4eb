//! Immediate, in-memory evaluation.
//!
//! A [`Predicate`] is a compiled predicate tree. [`Predicate::filter`] wraps
//! any iterator in a lazy [`Matches`] adapter that keeps the source order and
//! pulls each record exactly once.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;

use tracing::trace;

use crate::error::SearchError;
use crate::node::PredicateNode;
use crate::traits::AccessError;

/// An accessor failure, attributed to the field being read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFault {
    field: String,
    message: String,
}

impl FieldFault {
    pub(crate) fn new(field: &str, error: AccessError) -> Self {
        FieldFault {
            field: field.to_string(),
            message: error.message().to_string(),
        }
    }

    pub(crate) fn pattern(field: &str, error: regex::Error) -> Self {
        FieldFault {
            field: field.to_string(),
            message: format!("value cannot be used as a whole-word term: {error}"),
        }
    }

    /// Returns the name of the field that failed.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the accessor's failure message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Attaches the record position, producing a [`SearchError::FieldAccess`].
    pub fn into_error(self, record: usize) -> SearchError {
        SearchError::FieldAccess {
            field: self.field,
            record,
            message: self.message,
        }
    }
}

impl fmt::Display for FieldFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': {}", self.field, self.message)
    }
}

/// A predicate tree compiled into a single-record test.
///
/// An empty predicate (no criteria) accepts every record.
pub struct Predicate<T> {
    root: Option<PredicateNode<T>>,
}

impl<T> Predicate<T> {
    /// Compiles a tree.
    pub fn compile(root: &PredicateNode<T>) -> Self {
        Predicate {
            root: Some(root.clone()),
        }
    }

    /// A predicate that accepts every record.
    pub fn accept_all() -> Self {
        Predicate { root: None }
    }

    /// Returns the compiled tree, if any.
    pub fn tree(&self) -> Option<&PredicateNode<T>> {
        self.root.as_ref()
    }

    /// Tests one record.
    pub fn test(&self, record: &T) -> Result<bool, FieldFault> {
        match &self.root {
            Some(root) => root.evaluate(record),
            None => Ok(true),
        }
    }

    /// Lazily filters `records`, yielding matches in source order.
    ///
    /// Accessor failures are yielded as errors carrying the record's position
    /// in the source; iteration may continue past them.
    pub fn filter<I>(self, records: I) -> Matches<T, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        Matches {
            predicate: self,
            records: records.into_iter().enumerate(),
            _record: PhantomData,
        }
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Predicate {
            root: self.root.clone(),
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").field("root", &self.root).finish()
    }
}

/// Lazy iterator over the records accepted by a [`Predicate`].
pub struct Matches<T, I> {
    predicate: Predicate<T>,
    records: std::iter::Enumerate<I>,
    _record: PhantomData<fn(&T)>,
}

impl<T, I> Iterator for Matches<T, I>
where
    I: Iterator,
    I::Item: Borrow<T>,
{
    type Item = Result<I::Item, SearchError>;

    fn next(&mut self) -> Option<Self::Item> {
        for (position, record) in self.records.by_ref() {
            match self.predicate.test(Borrow::<T>::borrow(&record)) {
                Ok(true) => return Some(Ok(record)),
                Ok(false) => {}
                Err(fault) => {
                    trace!(position, field = fault.field(), "accessor failed during search");
                    return Some(Err(fault.into_error(position)));
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.records.size_hint().1)
    }
}
