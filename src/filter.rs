//! The abstract filter tree a filter compiler hands the rewriter: a tagged variant rather than
//! a class hierarchy, per the schema design note this crate follows (see `SPEC_FULL.md` §9).

use crate::value::Value;

/// A filter over nodes of a single type.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// A filter on the synthetic node id (or an `@id`-marked field): `{id: [u1, u2, ...]}`.
    /// Recognized specially by the Filter Translator before any recursive translation.
    IdSet(Vec<String>),
    /// A single comparator applied to one field.
    Leaf {
        field: String,
        op: Operator,
        value: Value,
    },
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: Value) -> Filter {
        Filter::Leaf {
            field: field.into(),
            op: Operator::Eq,
            value,
        }
    }

    pub fn and(filters: Vec<Filter>) -> Filter {
        Filter::And(filters)
    }
}

/// A leaf comparator. Legality against a field's scalar kind is enforced by the Filter
/// Translator, not here.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Operator {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
    AnyOfTerms,
    AllOfTerms,
    Has,
}

impl Operator {
    /// The function name this operator is rendered as in the graph-query language.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Lt => "lt",
            Operator::Le => "le",
            Operator::Gt => "gt",
            Operator::Ge => "ge",
            Operator::AnyOfTerms => "anyofterms",
            Operator::AllOfTerms => "allofterms",
            Operator::Has => "has",
        }
    }
}
