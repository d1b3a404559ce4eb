//! Translation of predicate trees into a backend's native query language.
//!
//! Translators consume the same [`PredicateNode`] the in-memory evaluator
//! runs, so a search built once can be evaluated locally or pushed down to a
//! store. A translator declares what it cannot express through
//! [`Translator::check`]; queryable sources call it while the search is being
//! built, so unsupported criteria fail before any query is issued.

pub(crate) mod sql;

pub use sql::{SqlPredicate, SqlTranslator};

use crate::criterion::Criterion;
use crate::error::Result;
use crate::node::PredicateNode;

/// Converts predicate trees into a backend representation.
pub trait Translator {
    /// The translated form.
    type Output;

    /// Short backend name used in error messages.
    fn name(&self) -> &'static str;

    /// Fails with [`SearchError::UnsupportedStrategy`](crate::SearchError::UnsupportedStrategy)
    /// if `criterion` has no native equivalent in this backend.
    fn check<T>(&self, criterion: &Criterion<T>) -> Result<()>;

    /// Translates a whole tree. Every leaf is checked first.
    fn translate<T>(&self, node: &PredicateNode<T>) -> Result<Self::Output>;
}
