//! Field access for searchable record types.
//!
//! The search engine never inspects a record itself. It asks the record type
//! for a compiled accessor per field name through [`Searchable`], resolves
//! those once, and calls the resulting function pointers during evaluation.

use std::borrow::Cow;
use std::fmt;

/// Failure reported by an accessor that could not read its field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessError {
    message: String,
}

impl AccessError {
    /// Creates an access error with a human readable reason.
    pub fn new(message: impl Into<String>) -> Self {
        AccessError {
            message: message.into(),
        }
    }

    /// Returns the reason the read failed.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for AccessError {}

/// Outcome of reading one field: text, absent (`None`), or a failure.
pub type FieldRead<'a> = Result<Option<Cow<'a, str>>, AccessError>;

/// Compiled accessor for one field of `T`.
pub type ReadFn<T> = for<'a> fn(&'a T) -> FieldRead<'a>;

/// Trait for record types that can be searched.
///
/// This trait is typically derived using `#[derive(Searchable)]`, but can
/// also be implemented by hand with plain functions.
///
/// # Manual Implementation
///
/// ```
/// use standout_search::{read, FieldRead, ReadFn, Searchable};
///
/// struct Contact {
///     name: String,
///     email: Option<String>,
/// }
///
/// fn contact_name(contact: &Contact) -> FieldRead<'_> {
///     read::text(&contact.name)
/// }
///
/// fn contact_email(contact: &Contact) -> FieldRead<'_> {
///     read::optional(&contact.email)
/// }
///
/// impl Searchable for Contact {
///     fn search_field(name: &str) -> Option<ReadFn<Self>> {
///         match name {
///             "name" => Some(contact_name),
///             "email" => Some(contact_email),
///             _ => None,
///         }
///     }
///
///     fn search_fields() -> &'static [&'static str] {
///         &["name", "email"]
///     }
/// }
/// ```
pub trait Searchable: Sized + 'static {
    /// Returns the accessor for `name`, or `None` if the type has no such
    /// searchable field.
    fn search_field(name: &str) -> Option<ReadFn<Self>>;

    /// Lists every searchable field name, in declaration order.
    fn search_fields() -> &'static [&'static str] {
        &[]
    }
}

/// Helpers for writing accessors.
pub mod read {
    use std::borrow::Cow;
    use std::fmt::Display;

    use super::FieldRead;

    /// Reads a text field by borrowing it.
    pub fn text(value: &str) -> FieldRead<'_> {
        Ok(Some(Cow::Borrowed(value)))
    }

    /// Reads an optional text field; `None` is an absent value.
    pub fn optional<S: AsRef<str>>(value: &Option<S>) -> FieldRead<'_> {
        Ok(value.as_ref().map(|s| Cow::Borrowed(s.as_ref())))
    }

    /// Reads any displayable field through its string form.
    pub fn display<D: Display + ?Sized>(value: &D) -> FieldRead<'static> {
        Ok(Some(Cow::Owned(value.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        title: String,
        note: Option<String>,
        count: u32,
    }

    fn item_title(item: &Item) -> FieldRead<'_> {
        read::text(&item.title)
    }

    fn item_note(item: &Item) -> FieldRead<'_> {
        read::optional(&item.note)
    }

    fn item_count(item: &Item) -> FieldRead<'_> {
        read::display(&item.count)
    }

    impl Searchable for Item {
        fn search_field(name: &str) -> Option<ReadFn<Self>> {
            match name {
                "title" => Some(item_title),
                "note" => Some(item_note),
                "count" => Some(item_count),
                _ => None,
            }
        }
    }

    fn sample() -> Item {
        Item {
            title: "hello".to_string(),
            note: None,
            count: 7,
        }
    }

    #[test]
    fn borrowed_text_read() {
        let item = sample();
        let read = Item::search_field("title").unwrap();
        assert_eq!(read(&item).unwrap().as_deref(), Some("hello"));
    }

    #[test]
    fn absent_optional_reads_none() {
        let item = sample();
        let read = Item::search_field("note").unwrap();
        assert_eq!(read(&item).unwrap(), None);
    }

    #[test]
    fn display_read_is_owned() {
        let item = sample();
        let read = Item::search_field("count").unwrap();
        assert_eq!(read(&item).unwrap().as_deref(), Some("7"));
    }

    #[test]
    fn unknown_field_has_no_accessor() {
        assert!(Item::search_field("missing").is_none());
        assert!(Item::search_fields().is_empty());
    }

    #[test]
    fn access_error_display() {
        let err = AccessError::new("locked");
        assert_eq!(err.to_string(), "locked");
        assert_eq!(err.message(), "locked");
    }
}
