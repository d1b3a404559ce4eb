//! Integration tests for the Searchable derive macro.
//!
//! These tests verify that `#[derive(Searchable)]` generates working
//! accessors and field constants from struct field annotations.

#![cfg(feature = "derive")]
#![allow(dead_code)] // Some fields are intentionally not searchable

use std::fmt;

use standout_search::{FieldPath, SearchError, SearchExt, Searchable};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    Open,
    Closed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Open => f.write_str("open"),
            Status::Closed => f.write_str("closed"),
        }
    }
}

#[derive(Debug, Searchable)]
struct Ticket {
    #[search(text)]
    title: String,

    #[search(optional, rename = "desc")]
    description: Option<String>,

    #[search(display)]
    status: Status,

    #[search(display)]
    number: u32,

    #[search(skip)]
    secret: String,

    internal: String,
}

fn ticket(number: u32, title: &str, description: Option<&str>, status: Status) -> Ticket {
    Ticket {
        title: title.to_string(),
        description: description.map(str::to_string),
        status,
        number,
        secret: "hunter2".to_string(),
        internal: "internal".to_string(),
    }
}

fn tickets() -> Vec<Ticket> {
    vec![
        ticket(1, "Crash on start", Some("segfault in loader"), Status::Open),
        ticket(2, "Typo in docs", None, Status::Closed),
        ticket(3, "Slow start", Some("takes ten seconds"), Status::Open),
    ]
}

fn numbers(found: Vec<&Ticket>) -> Vec<u32> {
    found.into_iter().map(|t| t.number).collect()
}

#[test]
fn test_field_constants_generated() {
    assert_eq!(Ticket::TITLE, "title");
    assert_eq!(Ticket::DESC, "desc");
    assert_eq!(Ticket::STATUS, "status");
    assert_eq!(Ticket::NUMBER, "number");
}

#[test]
fn test_search_fields_in_declaration_order() {
    assert_eq!(Ticket::search_fields(), &["title", "desc", "status", "number"]);
}

#[test]
fn test_accessors_read_values() {
    let t = ticket(9, "Title", None, Status::Closed);
    let title = Ticket::search_field("title").unwrap();
    let desc = Ticket::search_field("desc").unwrap();
    let status = Ticket::search_field("status").unwrap();

    assert_eq!(title(&t).unwrap().as_deref(), Some("Title"));
    assert_eq!(desc(&t).unwrap(), None);
    assert_eq!(status(&t).unwrap().as_deref(), Some("closed"));
}

#[test]
fn test_skipped_and_unannotated_fields_are_not_searchable() {
    assert!(Ticket::search_field("secret").is_none());
    assert!(Ticket::search_field("internal").is_none());
    assert!(Ticket::search_field("description").is_none());
    assert!(matches!(
        FieldPath::<Ticket>::resolve(["secret"]),
        Err(SearchError::InvalidFieldPath { .. })
    ));
}

#[test]
fn test_search_with_constants() {
    let data = tickets();
    let found = data
        .search([Ticket::TITLE, Ticket::DESC])
        .unwrap()
        .containing(["start"])
        .unwrap()
        .fields([Ticket::STATUS])
        .unwrap()
        .equal_to([Status::Open.to_string()])
        .unwrap()
        .to_vec()
        .unwrap();
    assert_eq!(numbers(found), vec![1, 3]);
}

#[test]
fn test_optional_field_absent_value() {
    let data = tickets();
    let found = data
        .search([Ticket::DESC])
        .unwrap()
        .containing(["s"])
        .unwrap()
        .to_vec()
        .unwrap();
    assert_eq!(numbers(found), vec![1, 3]);
}

#[test]
fn test_display_field_search() {
    let data = tickets();
    let found = data
        .search([Ticket::STATUS])
        .unwrap()
        .equal_to(["CLOSED"])
        .unwrap()
        .to_vec()
        .unwrap();
    assert_eq!(numbers(found), vec![2]);
}

#[test]
fn test_resolution_is_cached() {
    let first = FieldPath::<Ticket>::resolve(["title", "desc"]).unwrap();
    let second = FieldPath::<Ticket>::resolve(["title", "desc"]).unwrap();
    assert!(first.ptr_eq(&second));
}
