//! SQL translator (SQLite dialect).
//!
//! # SQL Generated
//!
//! ```text
//! Equals            "col" = ?1
//! Contains family   instr("col", ?1) > 0
//! StartsWith        substr("col", 1, length(?1)) = ?1
//! EndsWith          (length("col") >= length(?1)
//!                    AND substr("col", length("col") - length(?1) + 1) = ?1)
//! case-insensitive  every operand wrapped in search_fold(..)
//! ```
//!
//! Literal terms are bound as numbered parameters; a term referring to
//! another field becomes that field's column. Several fields are ORed,
//! several terms ORed (ANDed for `ContainingAll`), and `And`/`Or` nodes map
//! to SQL `AND`/`OR` with explicit grouping.
//!
//! `search_fold` applies the same Unicode lowercasing as in-memory
//! evaluation. SQLite's own `lower()` folds ASCII only, so the function must
//! be registered on the connection running the clause; `SqliteTable` does
//! this, `register_functions` covers other connections.

use std::collections::HashMap;

use tracing::debug;

use super::Translator;
use crate::criterion::{Criterion, CriterionTerm};
use crate::error::{Result, SearchError};
use crate::node::PredicateNode;
use crate::strategy::Strategy;

const BACKEND: &str = "sqlite";

/// Name of the scalar function that case-folds an operand.
pub(crate) const FOLD_FUNCTION: &str = "search_fold";

/// Translates predicate trees into parameterized SQLite `WHERE` clauses.
///
/// Fields map to columns of the same name unless remapped.
///
/// ```
/// use standout_search::SqlTranslator;
///
/// let translator = SqlTranslator::new().column("title", "post_title");
/// assert_eq!(translator.column_for("title"), "post_title");
/// assert_eq!(translator.column_for("body"), "body");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SqlTranslator {
    columns: HashMap<String, String>,
}

/// A translated `WHERE` clause and its parameters, in binding order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlPredicate {
    /// The boolean expression, without the `WHERE` keyword.
    pub clause: String,
    /// Values for `?1`, `?2`, ...
    pub params: Vec<String>,
}

impl SqlPredicate {
    /// A predicate that matches every row.
    pub fn always() -> Self {
        SqlPredicate {
            clause: "1 = 1".to_string(),
            params: Vec::new(),
        }
    }

    /// Renders the clause with the parameters substituted as SQL literals.
    ///
    /// For logging and debugging only; execute the parameterized form.
    pub fn inline(&self) -> String {
        let mut out = String::with_capacity(self.clause.len());
        let mut chars = self.clause.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '?' {
                out.push(c);
                continue;
            }
            let mut digits = String::new();
            while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                digits.push(d);
                chars.next();
            }
            let value = digits
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| self.params.get(i));
            match value {
                Some(value) => {
                    out.push('\'');
                    out.push_str(&value.replace('\'', "''"));
                    out.push('\'');
                }
                None => {
                    out.push('?');
                    out.push_str(&digits);
                }
            }
        }
        out
    }
}

impl SqlTranslator {
    /// Creates a translator with the identity field-to-column mapping.
    pub fn new() -> Self {
        SqlTranslator::default()
    }

    /// Maps `field` to `column`.
    pub fn column(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.columns.insert(field.into(), column.into());
        self
    }

    /// Returns the column a field is stored in.
    pub fn column_for<'a>(&'a self, field: &'a str) -> &'a str {
        self.columns.get(field).map(String::as_str).unwrap_or(field)
    }

    fn translate_node<T>(&self, node: &PredicateNode<T>, params: &mut Vec<String>) -> Result<String> {
        match node {
            PredicateNode::Leaf(criterion) => self.translate_leaf(criterion, params),
            PredicateNode::And(children) => {
                let parts = children
                    .iter()
                    .map(|child| self.translate_node(child, params))
                    .collect::<Result<Vec<_>>>()?;
                Ok(group(parts, " AND "))
            }
            PredicateNode::Or(children) => {
                let parts = children
                    .iter()
                    .map(|child| self.translate_node(child, params))
                    .collect::<Result<Vec<_>>>()?;
                Ok(group(parts, " OR "))
            }
        }
    }

    fn translate_leaf<T>(&self, criterion: &Criterion<T>, params: &mut Vec<String>) -> Result<String> {
        self.check(criterion)?;

        let strategy = criterion.strategy();
        let fold = !criterion.options().case_sensitive;
        let joiner = if strategy.requires_all_terms() {
            " AND "
        } else {
            " OR "
        };

        let mut fields = Vec::with_capacity(criterion.fields().len());
        for field in criterion.fields() {
            let column = self.operand(&quote_identifier(self.column_for(field.name())), fold);
            let mut terms = Vec::with_capacity(criterion.terms().len());
            for term in criterion.terms() {
                let value = match term {
                    CriterionTerm::Text(text) => {
                        params.push(text.as_str().to_string());
                        format!("?{}", params.len())
                    }
                    CriterionTerm::Field(other) => quote_identifier(self.column_for(other.name())),
                };
                terms.push(compare(strategy, &column, &self.operand(&value, fold))?);
            }
            fields.push(group(terms, joiner));
        }
        Ok(group(fields, " OR "))
    }

    fn operand(&self, expr: &str, fold: bool) -> String {
        if fold {
            format!("{FOLD_FUNCTION}({expr})")
        } else {
            expr.to_string()
        }
    }
}

impl Translator for SqlTranslator {
    type Output = SqlPredicate;

    fn name(&self) -> &'static str {
        BACKEND
    }

    fn check<T>(&self, criterion: &Criterion<T>) -> Result<()> {
        let strategy = criterion.strategy();
        if matches!(
            strategy,
            Strategy::WholeWord | Strategy::Fuzzy | Strategy::Phonetic
        ) {
            return Err(unsupported(strategy.as_str()));
        }
        if criterion.options().whole_word {
            return Err(unsupported("whole_word"));
        }
        Ok(())
    }

    fn translate<T>(&self, node: &PredicateNode<T>) -> Result<SqlPredicate> {
        let mut params = Vec::new();
        let clause = self.translate_node(node, &mut params)?;
        debug!(%clause, params = params.len(), "translated search to sql");
        Ok(SqlPredicate { clause, params })
    }
}

fn compare(strategy: Strategy, column: &str, value: &str) -> Result<String> {
    Ok(match strategy {
        Strategy::Equals => format!("{column} = {value}"),
        Strategy::Contains | Strategy::ContainingAll | Strategy::ContainingAny => {
            format!("instr({column}, {value}) > 0")
        }
        Strategy::StartsWith => format!("substr({column}, 1, length({value})) = {value}"),
        Strategy::EndsWith => format!(
            "(length({column}) >= length({value}) AND substr({column}, length({column}) - length({value}) + 1) = {value})"
        ),
        Strategy::WholeWord | Strategy::Fuzzy | Strategy::Phonetic => {
            return Err(unsupported(strategy.as_str()));
        }
    })
}

fn group(parts: Vec<String>, joiner: &str) -> String {
    if parts.len() == 1 {
        parts.into_iter().collect()
    } else {
        format!("({})", parts.join(joiner))
    }
}

fn unsupported(feature: &'static str) -> SearchError {
    SearchError::UnsupportedStrategy {
        backend: BACKEND,
        feature,
    }
}

/// Quotes an SQL identifier.
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
