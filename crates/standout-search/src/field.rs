//! Field path resolution.
//!
//! A [`FieldPath`] is the canonical form of one or more field selectors: an
//! ordered, de-duplicated list of field names paired with their compiled
//! accessors. Resolution is cached per record type and de-duplicated name
//! list.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::{Result, SearchError};
use crate::traits::{FieldRead, ReadFn, Searchable};

type CacheKey = (TypeId, String);
type CacheEntry = Arc<dyn Any + Send + Sync>;

static RESOLVED: Lazy<RwLock<HashMap<CacheKey, CacheEntry>>> = Lazy::new(Default::default);

// Unit separator; cannot appear in a Rust identifier.
const SIGNATURE_SEPARATOR: char = '\u{1f}';

/// A single resolved field: its name and accessor.
pub struct FieldRef<T> {
    name: Arc<str>,
    read: ReadFn<T>,
}

impl<T: Searchable> FieldRef<T> {
    /// Resolves one field selector against `T`.
    pub fn resolve(selector: &str) -> Result<Self> {
        let read = T::search_field(selector).ok_or_else(|| SearchError::InvalidFieldPath {
            record: std::any::type_name::<T>(),
            field: selector.to_string(),
        })?;
        Ok(FieldRef {
            name: Arc::from(selector),
            read,
        })
    }
}

impl<T> FieldRef<T> {
    /// Returns the field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reads this field from a record.
    pub fn read<'a>(&self, record: &'a T) -> FieldRead<'a> {
        (self.read)(record)
    }
}

impl<T> Clone for FieldRef<T> {
    fn clone(&self) -> Self {
        FieldRef {
            name: Arc::clone(&self.name),
            read: self.read,
        }
    }
}

impl<T> fmt::Debug for FieldRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldRef").field(&self.name).finish()
    }
}

/// An ordered, non-empty group of fields of one record type.
///
/// # Example
///
/// ```
/// use standout_search::{FieldPath, Searchable};
///
/// #[derive(Searchable)]
/// struct Note {
///     #[search(text)]
///     title: String,
///     #[search(text)]
///     body: String,
/// }
///
/// let path = FieldPath::<Note>::resolve(["body", "title", "body"]).unwrap();
/// assert_eq!(path.names().collect::<Vec<_>>(), vec!["body", "title"]);
/// ```
pub struct FieldPath<T> {
    fields: Arc<[FieldRef<T>]>,
}

impl<T: Searchable> FieldPath<T> {
    /// Resolves selectors into a field path.
    ///
    /// Duplicate selectors collapse to their first occurrence. Fails with
    /// [`SearchError::EmptyFieldSet`] when no selector is given and with
    /// [`SearchError::InvalidFieldPath`] when one does not name a field.
    pub fn resolve<I, S>(selectors: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = Vec::new();
        for selector in selectors {
            let selector = selector.as_ref();
            if !names.iter().any(|name| name == selector) {
                names.push(selector.to_string());
            }
        }
        if names.is_empty() {
            return Err(SearchError::EmptyFieldSet);
        }

        let key = (
            TypeId::of::<T>(),
            names.join(&SIGNATURE_SEPARATOR.to_string()),
        );
        if let Some(path) = Self::cached(&key) {
            return Ok(path);
        }

        let fields = names
            .iter()
            .map(|name| FieldRef::resolve(name))
            .collect::<Result<Vec<_>>>()?;

        let path = FieldPath {
            fields: Arc::from(fields),
        };
        debug!(
            record = std::any::type_name::<T>(),
            fields = ?path.names().collect::<Vec<_>>(),
            "resolved field path"
        );

        let entry: CacheEntry = Arc::new(path.clone());
        RESOLVED
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, entry);

        Ok(path)
    }

    fn cached(key: &CacheKey) -> Option<Self> {
        let cache = RESOLVED.read().unwrap_or_else(PoisonError::into_inner);
        cache
            .get(key)
            .and_then(|entry| entry.downcast_ref::<FieldPath<T>>())
            .cloned()
    }
}

impl<T> FieldPath<T> {
    /// Iterates over the resolved fields in selector order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldRef<T>> {
        self.fields.iter()
    }

    /// Iterates over the field names in selector order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(FieldRef::name)
    }

    /// Returns the number of fields. Never zero.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the path has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns `true` if both paths share the same resolved storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.fields, &other.fields)
    }
}

impl<T> Clone for FieldPath<T> {
    fn clone(&self) -> Self {
        FieldPath {
            fields: Arc::clone(&self.fields),
        }
    }
}

impl<T> fmt::Debug for FieldPath<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl<'a, T> IntoIterator for &'a FieldPath<T> {
    type Item = &'a FieldRef<T>;
    type IntoIter = std::slice::Iter<'a, FieldRef<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::read;

    struct Pair {
        left: String,
        right: String,
    }

    fn pair_left(p: &Pair) -> FieldRead<'_> {
        read::text(&p.left)
    }

    fn pair_right(p: &Pair) -> FieldRead<'_> {
        read::text(&p.right)
    }

    impl Searchable for Pair {
        fn search_field(name: &str) -> Option<ReadFn<Self>> {
            match name {
                "left" => Some(pair_left),
                "right" => Some(pair_right),
                _ => None,
            }
        }
    }

    #[test]
    fn resolve_preserves_order() {
        let path = FieldPath::<Pair>::resolve(["right", "left"]).unwrap();
        assert_eq!(path.names().collect::<Vec<_>>(), vec!["right", "left"]);
        assert_eq!(path.len(), 2);
        assert!(!path.is_empty());
    }

    #[test]
    fn resolve_dedupes() {
        let path = FieldPath::<Pair>::resolve(["left", "left", "right"]).unwrap();
        assert_eq!(path.names().collect::<Vec<_>>(), vec!["left", "right"]);
    }

    #[test]
    fn resolve_empty_fails() {
        let err = FieldPath::<Pair>::resolve(Vec::<&str>::new()).unwrap_err();
        assert!(matches!(err, SearchError::EmptyFieldSet));
    }

    #[test]
    fn resolve_unknown_fails() {
        let err = FieldPath::<Pair>::resolve(["left", "middle"]).unwrap_err();
        match err {
            SearchError::InvalidFieldPath { field, record } => {
                assert_eq!(field, "middle");
                assert!(record.ends_with("Pair"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn resolve_is_cached() {
        let a = FieldPath::<Pair>::resolve(["left"]).unwrap();
        let b = FieldPath::<Pair>::resolve(["left"]).unwrap();
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn repeated_selectors_share_one_cache_entry() {
        let once = FieldPath::<Pair>::resolve(["right"]).unwrap();
        let repeated = FieldPath::<Pair>::resolve(["right", "right", "right"]).unwrap();
        assert!(once.ptr_eq(&repeated));

        let key = (TypeId::of::<Pair>(), "right".to_string());
        let cache = RESOLVED.read().unwrap();
        assert!(cache.contains_key(&key));
        assert!(!cache.contains_key(&(TypeId::of::<Pair>(), format!("right{SIGNATURE_SEPARATOR}right"))));
    }

    #[test]
    fn accessors_read_their_field() {
        let pair = Pair {
            left: "l".to_string(),
            right: "r".to_string(),
        };
        let path = FieldPath::<Pair>::resolve(["left", "right"]).unwrap();
        let values: Vec<_> = path
            .iter()
            .map(|f| f.read(&pair).unwrap().unwrap().into_owned())
            .collect();
        assert_eq!(values, vec!["l", "r"]);
    }
}
