//! The plain data shape of an incoming delete operation, restated from the GraphQL-level
//! input a caller's own AST walker would hand this crate (see `SPEC_FULL.md` §6 — the parser
//! itself is out of scope).

use crate::filter::Filter;

/// An operation the rewriter can translate. Only deletes are implemented today; the variant
/// exists so the Driver's entry point has room to grow without a breaking signature change.
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    Delete {
        type_name: String,
        filter: Filter,
        /// The optional read-back selection set, i.e. the `author { id, name }` sub-field of
        /// a `deleteAuthor` mutation payload.
        selection: Option<Selection>,
    },
}

impl Operation {
    pub fn type_name(&self) -> &str {
        match self {
            Operation::Delete { type_name, .. } => type_name,
        }
    }
}

/// A GraphQL selection set over a single type: the fields requested, plus the query-shaping
/// arguments (`order`, `filter`, `first`, `offset`) that apply when the selection is itself a
/// list field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    pub fields: Vec<SelectionField>,
    pub order: Option<Order>,
    pub filter: Option<Filter>,
    pub first: Option<i64>,
    pub offset: Option<i64>,
}

impl Selection {
    pub fn new(fields: Vec<SelectionField>) -> Selection {
        Selection {
            fields,
            order: None,
            filter: None,
            first: None,
            offset: None,
        }
    }
}

/// One requested field, with its own nested selection when the field is itself a relationship.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionField {
    pub name: String,
    pub nested: Option<Selection>,
}

impl SelectionField {
    pub fn scalar(name: impl Into<String>) -> SelectionField {
        SelectionField {
            name: name.into(),
            nested: None,
        }
    }

    pub fn nested(name: impl Into<String>, selection: Selection) -> SelectionField {
        SelectionField {
            name: name.into(),
            nested: Some(selection),
        }
    }
}

/// An `order: {asc: F}` / `order: {desc: F}` GraphQL argument, translated by the Query Emitter
/// into `orderasc`/`orderdesc`.
#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub field: String,
    pub direction: OrderDirection,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OrderDirection {
    Asc,
    Desc,
}
