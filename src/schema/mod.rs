//! The normalized, read-only view of a caller's schema that the rewriter consumes: types,
//! fields, edges, inverse-edge metadata, and per-type authorization rules.
//!
//! A [`Schema`] is built once — usually via [`config::SchemaConfig`] loaded from YAML — and
//! shared, `Arc`-cheap, across every [`crate::rewrite::rewrite`] call. It carries no mutable
//! state and no connection to a running database; see `SPEC_FULL.md` for the schema-loader
//! boundary this module stops short of.

pub mod config;

use crate::value::Value;
use crate::Error;
use std::collections::HashMap;
use std::sync::Arc;

/// An immutable, shareable view of a caller's schema.
///
/// # Examples
///
/// ```rust
/// use graphscribe::schema::{Schema, TypeDef, TypeKind};
/// use std::collections::HashMap;
///
/// let mut type_defs = HashMap::new();
/// type_defs.insert(
///     "Widget".to_string(),
///     TypeDef::new("Widget".to_string(), TypeKind::Object, Vec::new()),
/// );
/// let schema = Schema::new(type_defs);
/// assert!(schema.type_def_by_name("Widget").is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct Schema {
    type_defs: Arc<HashMap<String, TypeDef>>,
}

impl Schema {
    pub fn new(type_defs: HashMap<String, TypeDef>) -> Schema {
        Schema {
            type_defs: Arc::new(type_defs),
        }
    }

    /// Looks up a type by name, failing with [`Error::UnknownType`] since a caller-visible
    /// filter or operation naming a type the schema doesn't have is a caller error, not an
    /// internal bug.
    pub fn type_def_by_name(&self, name: &str) -> Result<&TypeDef, Error> {
        self.type_defs
            .get(name)
            .ok_or_else(|| Error::UnknownType {
                name: name.to_string(),
            })
    }
}

/// A named type in the schema: its kind, its fields in declaration order, and its
/// per-operation authorization rules.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeDef {
    name: String,
    kind: TypeKind,
    fields: Vec<FieldDef>,
    auth_rules: HashMap<AuthOperation, AuthExpr>,
}

impl TypeDef {
    pub fn new(name: String, kind: TypeKind, fields: Vec<FieldDef>) -> TypeDef {
        TypeDef {
            name,
            kind,
            fields,
            auth_rules: HashMap::new(),
        }
    }

    pub fn with_auth_rules(mut self, auth_rules: HashMap<AuthOperation, AuthExpr>) -> TypeDef {
        self.auth_rules = auth_rules;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The field designated by `@id`, if the type has one, used as an alternate lookup key in
    /// addition to the synthetic node id.
    pub fn id_field(&self) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.is_id)
    }

    pub fn auth_rule(&self, op: AuthOperation) -> Option<&AuthExpr> {
        self.auth_rules.get(&op)
    }
}

/// The GraphQL-level shape of a type: a concrete object, an interface (with its implementing
/// types, for the degenerate-delete check), or a union (never a legal delete target).
#[derive(Clone, Debug, PartialEq)]
pub enum TypeKind {
    Object,
    Interface { implementors: Vec<String> },
    Union { members: Vec<String> },
}

/// A scalar field's underlying GraphQL scalar kind, used by the Filter Translator to check
/// operator legality.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ScalarKind {
    String,
    Int,
    Float,
    Boolean,
    DateTime,
}

/// One field of a [`TypeDef`], in schema declaration order. Declaration order matters: it
/// drives both lexicographic-tie-breaking in the Filter Translator and the inverse-edge
/// numbering order in the Inverse-Edge Planner.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDef {
    name: String,
    type_name: String,
    list: bool,
    is_id: bool,
    scalar: Option<ScalarKind>,
    edge: Option<EdgeDef>,
}

impl FieldDef {
    pub fn new_scalar(name: String, type_name: String, scalar: ScalarKind) -> FieldDef {
        FieldDef {
            name,
            type_name,
            list: false,
            is_id: false,
            scalar: Some(scalar),
            edge: None,
        }
    }

    pub fn new_edge(name: String, type_name: String, list: bool, edge: EdgeDef) -> FieldDef {
        FieldDef {
            name,
            type_name,
            list,
            is_id: false,
            scalar: None,
            edge: Some(edge),
        }
    }

    pub fn with_id(mut self, is_id: bool) -> FieldDef {
        self.is_id = is_id;
        self
    }

    pub fn with_list(mut self, list: bool) -> FieldDef {
        self.list = list;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn list(&self) -> bool {
        self.list
    }

    pub fn is_id(&self) -> bool {
        self.is_id
    }

    pub fn scalar(&self) -> Option<ScalarKind> {
        self.scalar
    }

    pub fn edge(&self) -> Option<&EdgeDef> {
        self.edge.as_ref()
    }
}

/// Direction a field's edge is walked in the graph-query language: `Forward` means the field
/// has its own materialized predicate (`Type.field`); `Reverse` means the field is only
/// reachable via the `~predicate` of an edge owned by another type.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EdgeDirection {
    Forward,
    Reverse,
}

/// Cardinality of a predicate as seen from the referencing side, used to decide whether a
/// cleanup mutation nulls out a singleton reference or removes one entry from a list.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Cardinality {
    One,
    Many,
}

/// Edge metadata for a relationship field, carrying everything the Inverse-Edge Planner needs
/// to project and null out the other side of the relationship on delete.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeDef {
    direction: EdgeDirection,
    /// The predicate used to walk from the victim to the inverse holder, without the leading
    /// `~` even when `direction` is `Reverse` (the renderer adds it).
    predicate: String,
    /// The predicate key used in the cleanup mutation object on the inverse holder.
    inverse_predicate: String,
    /// Cardinality of `inverse_predicate`, i.e. whether the inverse holder's reference back to
    /// the victim is a singleton or a list.
    cardinality: Cardinality,
}

impl EdgeDef {
    pub fn new(
        direction: EdgeDirection,
        predicate: String,
        inverse_predicate: String,
        cardinality: Cardinality,
    ) -> EdgeDef {
        EdgeDef {
            direction,
            predicate,
            inverse_predicate,
            cardinality,
        }
    }

    pub fn direction(&self) -> EdgeDirection {
        self.direction
    }

    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    pub fn inverse_predicate(&self) -> &str {
        &self.inverse_predicate
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }
}

/// The operation an [`AuthRule`] governs. Only `Delete` rules are consulted by this crate's
/// rewriter today; the others are carried for schema-config parity with the add/update rewrite
/// paths this crate does not yet implement.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum AuthOperation {
    Query,
    Add,
    Update,
    Delete,
}

/// A claim-testing expression tree. Kept as a tagged variant rather than an opaque string so
/// the Auth Rule Compiler can tell, without evaluating against a live [`AuthContext`], whether
/// a rule can ever block an unauthenticated caller.
#[derive(Clone, Debug, PartialEq)]
pub enum AuthExpr {
    /// Requires the named claim to be present; otherwise unconditionally unauthorized.
    Claim(String),
    /// Requires the named claim to be present, and if so, contributes an additional
    /// `field = claim value` filter leaf rather than failing outright — this is how row-level
    /// ownership checks ("only the owner may delete their own posts") compose with the
    /// caller-supplied filter.
    Eq { field: String, claim: String },
    And(Vec<AuthExpr>),
    Or(Vec<AuthExpr>),
    Not(Box<AuthExpr>),
    /// Always satisfied; never requires a claim and never contributes a filter.
    AlwaysAllow,
}

/// Caller-claim lookup consumed by the Auth Rule Compiler. Implementations source claims from
/// wherever the hosting transport authenticates the caller (a JWT, a session store, …); this
/// crate never reads claims out of the operation body itself.
pub trait AuthContext: Send + Sync {
    fn claim(&self, key: &str) -> Option<Value>;
}

/// A simple, map-backed [`AuthContext`] suitable for tests and for hosts that resolve claims
/// eagerly before calling the rewriter.
#[derive(Clone, Debug, Default)]
pub struct Claims(HashMap<String, Value>);

impl Claims {
    pub fn new() -> Claims {
        Claims(HashMap::new())
    }

    pub fn with_claim(mut self, key: impl Into<String>, value: Value) -> Claims {
        self.0.insert(key.into(), value);
        self
    }
}

impl AuthContext for Claims {
    fn claim(&self, key: &str) -> Option<Value> {
        self.0.get(key).cloned()
    }
}
