//! SQLite tables as search sources.
//!
//! A search over a [`SqliteTable`] is built exactly like an in-memory one.
//! Each criterion is checked against the table's [`SqlTranslator`] as it is
//! added, [`Search::query`] translates the finished tree, and nothing touches
//! the database until [`SqlQuery::fetch`], [`SqlQuery::for_each`] or
//! [`SqlQuery::count`] runs.

use std::fmt;

use rusqlite::functions::FunctionFlags;
use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection, Row};
use tracing::debug;

use crate::criterion::Criterion;
use crate::error::{Result, SearchError};
use crate::search::{Search, Source};
use crate::text;
use crate::translate::sql::{quote_identifier, FOLD_FUNCTION};
use crate::translate::{SqlPredicate, SqlTranslator, Translator};

/// Maps one result row to a record.
pub type RowMapper<T> = fn(&Row<'_>) -> rusqlite::Result<T>;

/// Registers the SQL functions that translated clauses call.
///
/// [`SqliteTable::new`] registers them on its connection. Call this before
/// running [`SqlTranslator`] output on any other connection.
pub fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        FOLD_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let folded = match ctx.get_raw(0) {
                ValueRef::Null => None,
                ValueRef::Integer(n) => Some(n.to_string()),
                ValueRef::Real(f) => Some(f.to_string()),
                ValueRef::Text(bytes) => {
                    let value = std::str::from_utf8(bytes)
                        .map_err(|err| rusqlite::Error::UserFunctionError(Box::new(err)))?;
                    Some(text::fold(value, false).into_owned())
                }
                ValueRef::Blob(bytes) => {
                    Some(text::fold(&String::from_utf8_lossy(bytes), false).into_owned())
                }
            };
            Ok(folded)
        },
    )
}

/// A table of records in a SQLite database.
///
/// ```
/// use rusqlite::Connection;
/// use standout_search::{Search, Searchable, SqliteTable};
///
/// #[derive(Debug, Searchable)]
/// struct Book {
///     #[search(text)]
///     title: String,
/// }
///
/// let conn = Connection::open_in_memory()?;
/// conn.execute_batch(
///     "CREATE TABLE books (title TEXT);
///      INSERT INTO books VALUES ('Dune'), ('Emma'), ('Dracula');",
/// )?;
///
/// let books = SqliteTable::<Book>::new(&conn, "books", |row| {
///     Ok(Book { title: row.get("title")? })
/// })?;
/// let query = Search::over(books)
///     .fields(["title"])?
///     .starting_with(["d"])?
///     .query()?;
///
/// assert_eq!(query.fetch()?.len(), 2);
/// # Ok::<(), standout_search::SearchError>(())
/// ```
pub struct SqliteTable<'c, T> {
    conn: &'c Connection,
    table: String,
    translator: SqlTranslator,
    map_row: RowMapper<T>,
}

impl<'c, T> SqliteTable<'c, T> {
    /// Creates a source reading rows of `table` through `map_row`.
    ///
    /// Registers the case-folding function on `conn`.
    pub fn new(
        conn: &'c Connection,
        table: impl Into<String>,
        map_row: RowMapper<T>,
    ) -> Result<Self> {
        register_functions(conn)?;
        Ok(SqliteTable {
            conn,
            table: table.into(),
            translator: SqlTranslator::new(),
            map_row,
        })
    }

    /// Replaces the translator, e.g. to remap fields to columns.
    pub fn with_translator(mut self, translator: SqlTranslator) -> Self {
        self.translator = translator;
        self
    }

    /// Returns the table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the translator.
    pub fn translator(&self) -> &SqlTranslator {
        &self.translator
    }
}

impl<T> Source<T> for SqliteTable<'_, T> {
    fn accept(&self, criterion: &Criterion<T>) -> Result<()> {
        self.translator.check(criterion)
    }
}

impl<T> Clone for SqliteTable<'_, T> {
    fn clone(&self) -> Self {
        SqliteTable {
            conn: self.conn,
            table: self.table.clone(),
            translator: self.translator.clone(),
            map_row: self.map_row,
        }
    }
}

impl<T> fmt::Debug for SqliteTable<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteTable")
            .field("table", &self.table)
            .field("translator", &self.translator)
            .finish_non_exhaustive()
    }
}

impl<'c, T> Search<T, SqliteTable<'c, T>> {
    /// Translates the search into a query against the table.
    ///
    /// An empty search selects every row.
    pub fn query(&self) -> Result<SqlQuery<'c, T>> {
        let source = self.source();
        let predicate = match self.tree() {
            Some(tree) => source.translator.translate(&tree)?,
            None => SqlPredicate::always(),
        };
        debug!(table = %source.table, clause = %predicate.clause, "built sqlite search query");
        Ok(SqlQuery {
            conn: source.conn,
            table: quote_identifier(&source.table),
            predicate,
            map_row: source.map_row,
        })
    }
}

/// A translated, not yet executed query.
pub struct SqlQuery<'c, T> {
    conn: &'c Connection,
    table: String,
    predicate: SqlPredicate,
    map_row: RowMapper<T>,
}

impl<T> SqlQuery<'_, T> {
    /// Returns the `SELECT` statement.
    pub fn sql(&self) -> String {
        format!("SELECT * FROM {} WHERE {}", self.table, self.predicate.clause)
    }

    /// Returns the parameters bound to the statement, in order.
    pub fn params(&self) -> &[String] {
        &self.predicate.params
    }

    /// Returns the translated predicate.
    pub fn predicate(&self) -> &SqlPredicate {
        &self.predicate
    }

    /// Runs the query and collects every matching record.
    pub fn fetch(&self) -> Result<Vec<T>> {
        let mut stmt = self.conn.prepare(&self.sql())?;
        let rows = stmt.query_map(params_from_iter(self.params()), self.map_row)?;
        let records = rows.collect::<rusqlite::Result<Vec<T>>>()?;
        Ok(records)
    }

    /// Runs the query, handing each record to `f` as its row is read.
    pub fn for_each<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(T),
    {
        let mut stmt = self.conn.prepare(&self.sql())?;
        let mut rows = stmt.query(params_from_iter(self.params()))?;
        while let Some(row) = rows.next()? {
            f((self.map_row)(row)?);
        }
        Ok(())
    }

    /// Counts the matching rows without mapping them.
    pub fn count(&self) -> Result<usize> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {}",
            self.table, self.predicate.clause
        );
        let count: i64 = self
            .conn
            .query_row(&sql, params_from_iter(self.params()), |row| row.get(0))?;
        usize::try_from(count).map_err(|_| {
            SearchError::Backend(rusqlite::Error::IntegralValueOutOfRange(0, count))
        })
    }
}

impl<T> fmt::Debug for SqlQuery<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlQuery")
            .field("sql", &self.sql())
            .field("params", &self.predicate.params)
            .finish()
    }
}
