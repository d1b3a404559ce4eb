//! Proc macros for standout-search.
//!
//! - [`Searchable`] - Generate compiled field accessors for searchable records

mod searchable;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Searchable` trait for searchable record structs.
///
/// Each annotated field gets a plain accessor function, so field selection
/// involves no runtime reflection. Fields without a `#[search(...)]`
/// attribute are not searchable.
///
/// # Field Attributes
///
/// | Attribute | Field type | Read as |
/// |-----------|------------|---------|
/// | `text` | anything that derefs to `str` | borrowed text |
/// | `optional` | `Option<S>` where `S: AsRef<str>` | text, `None` is absent |
/// | `display` | any `Display` type | its formatted string |
/// | `skip` | | not searchable |
/// | `rename = "..."` | | custom selector name |
///
/// # Generated Code
///
/// The macro generates:
///
/// 1. Field name constants (e.g., `Person::FIRST_NAME`)
/// 2. Implementation of `Searchable::search_field()` and
///    `Searchable::search_fields()`
///
/// # Example
///
/// ```ignore
/// use standout_search::{SearchExt, Searchable};
///
/// #[derive(Searchable)]
/// struct Person {
///     #[search(text)]
///     first_name: String,
///
///     #[search(optional, rename = "nick")]
///     nickname: Option<String>,
///
///     #[search(display)]
///     age: u32,
///
///     #[search(skip)]
///     internal_id: u64,
/// }
///
/// let people = vec![Person {
///     first_name: "Ada".into(),
///     nickname: None,
///     age: 36,
///     internal_id: 1,
/// }];
///
/// let found = people
///     .search([Person::FIRST_NAME, Person::NICK])?
///     .containing(["ada"])?
///     .to_vec()?;
/// assert_eq!(found.len(), 1);
/// assert_eq!(Person::search_fields(), &["first_name", "nick", "age"]);
/// ```
#[proc_macro_derive(Searchable, attributes(search))]
pub fn searchable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    searchable::searchable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
