//! Standout Search - fluent multi-field search over typed record collections.
//!
//! A search selects one or more fields of a record type, applies a matching
//! strategy with a set of terms, and combines criteria into an immutable
//! predicate tree. The same tree runs in memory against any iterable of
//! records, or is translated into a parameterized SQL query and executed by
//! SQLite. It supports:
//!
//! - Equality, substring, prefix/suffix, whole-word, fuzzy and phonetic matching
//! - Several fields per criterion, several terms per field
//! - Terms read from another field of the same record
//! - Case-sensitive and whole-word options
//! - Lazy, order-preserving in-memory evaluation
//!
//! # Quick Start
//!
//! ```rust
//! use standout_search::{SearchExt, Searchable};
//!
//! #[derive(Searchable)]
//! struct Person {
//!     #[search(text)]
//!     first_name: String,
//!     #[search(text)]
//!     last_name: String,
//!     #[search(optional)]
//!     nickname: Option<String>,
//! }
//!
//! let people = vec![
//!     Person { first_name: "Ada".into(), last_name: "Lovelace".into(), nickname: None },
//!     Person { first_name: "Grace".into(), last_name: "Hopper".into(), nickname: Some("Amazing Grace".into()) },
//!     Person { first_name: "Alan".into(), last_name: "Turing".into(), nickname: None },
//! ];
//!
//! let found = people
//!     .search(["first_name", "last_name", "nickname"])?
//!     .containing(["grace", "ada"])?
//!     .to_vec()?;
//! assert_eq!(found.len(), 2);
//!
//! let narrowed = people
//!     .search(["first_name"])?
//!     .starting_with(["a"])?
//!     .fields(["last_name"])?
//!     .ending_with(["ing"])?;
//! assert_eq!(narrowed.first()?.map(|p| p.first_name.as_str()), Some("Alan"));
//! # Ok::<(), standout_search::SearchError>(())
//! ```
//!
//! # Combination Semantics
//!
//! ```text
//! criterion = field₁ satisfies terms ∨ field₂ satisfies terms ∨ …
//! terms     = any term matches          (all strategies but ContainingAll)
//!           | every term matches        (ContainingAll)
//! search    = stage₁ ∧ stage₂ ∧ …       (or_fields ORs one leaf into the last stage)
//! ```
//!
//! A missing field value (`None`) never matches. A search with no criteria
//! matches every record.
//!
//! # Strategies
//!
//! | Strategy | Holds when the value… | SQLite |
//! |----------|-----------------------|--------|
//! | `Equals` | equals a term | yes |
//! | `Contains`, `ContainingAny` | contains a term | yes |
//! | `ContainingAll` | contains every term | yes |
//! | `StartsWith`, `EndsWith` | starts/ends with a term | yes |
//! | `WholeWord` | has a term as a whole word | no |
//! | `Fuzzy` | or one of its words is within N edits of a term | no |
//! | `Phonetic` | has a word with a term's Soundex code | no |
//!
//! Strategies marked "no" fail with [`SearchError::UnsupportedStrategy`] as
//! soon as they are added to a search over a SQLite table.

mod backend;
mod criterion;
mod error;
mod eval;
mod field;
mod node;
mod search;
mod strategy;
mod text;
mod traits;
mod translate;

// Re-export public API
#[cfg(feature = "sqlite")]
pub use backend::{register_functions, RowMapper, SqlQuery, SqliteTable};
pub use criterion::{Criterion, CriterionTerm, Term, TextTerm};
pub use error::{Result, SearchError};
pub use eval::{FieldFault, Matches, Predicate};
pub use field::{FieldPath, FieldRef};
pub use node::PredicateNode;
pub use search::{Records, Search, SearchExt, Source};
pub use strategy::{SearchOptions, Strategy, DEFAULT_MAX_DISTANCE};
pub use text::{levenshtein, soundex, words};
pub use traits::{read, AccessError, FieldRead, ReadFn, Searchable};
pub use translate::{SqlPredicate, SqlTranslator, Translator};

#[cfg(feature = "derive")]
pub use standout_search_macros::Searchable;
