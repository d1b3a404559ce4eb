//! Queryable sources that run translated searches in a store.

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::{register_functions, RowMapper, SqlQuery, SqliteTable};
