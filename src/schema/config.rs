//! Serde/YAML-driven configuration layer for [`super::Schema`].
//!
//! [`SchemaConfig`] is the shape a human (or a schema loader) hands this crate: an ordered
//! list of types, each with an ordered list of fields. It converts fallibly into the
//! immutable, `Arc`-backed [`super::Schema`] the rewriter actually walks, mirroring the
//! lineage's `Configuration` → `Info` split.
//!
//! # Examples
//!
//! ```rust
//! use graphscribe::schema::config::SchemaConfig;
//!
//! let yaml = r#"
//! types:
//!   - name: Author
//!     kind: object
//!     fields:
//!       - name: name
//!         scalar: string
//! "#;
//! let config = SchemaConfig::from_yaml_str(yaml).expect("valid config");
//! let schema = config.try_into_schema().expect("valid schema");
//! assert!(schema.type_def_by_name("Author").is_ok());
//! ```

use super::{
    AuthExpr, AuthOperation, Cardinality, EdgeDef, EdgeDirection, FieldDef, ScalarKind, Schema,
    TypeDef, TypeKind,
};
use crate::Error;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::TryFrom;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// The root of a YAML-deserializable schema configuration: an ordered list of [`TypeConfig`]s.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaConfig {
    #[serde(default)]
    pub types: Vec<TypeConfig>,
}

impl SchemaConfig {
    pub fn new(types: Vec<TypeConfig>) -> SchemaConfig {
        SchemaConfig { types }
    }

    /// Parses a [`SchemaConfig`] from a YAML document.
    pub fn from_yaml_str(s: &str) -> Result<SchemaConfig, Error> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Parses a [`SchemaConfig`] from any reader, such as an open file.
    pub fn from_reader<R: Read>(r: R) -> Result<SchemaConfig, Error> {
        Ok(serde_yaml::from_reader(r)?)
    }

    /// Opens and parses a [`SchemaConfig`] from a path on disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<SchemaConfig, Error> {
        let f = File::open(path)?;
        SchemaConfig::from_reader(BufReader::new(f))
    }

    /// Converts this configuration into the immutable [`Schema`] the rewriter consumes.
    pub fn try_into_schema(self) -> Result<Schema, Error> {
        Schema::try_from(self)
    }
}

impl TryFrom<File> for SchemaConfig {
    type Error = Error;

    fn try_from(f: File) -> Result<SchemaConfig, Error> {
        SchemaConfig::from_reader(BufReader::new(f))
    }
}

impl TryFrom<&str> for SchemaConfig {
    type Error = Error;

    fn try_from(s: &str) -> Result<SchemaConfig, Error> {
        SchemaConfig::from_yaml_str(s)
    }
}

/// One type entry in a [`SchemaConfig`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypeConfig {
    pub name: String,
    #[serde(default)]
    pub kind: TypeKindConfig,
    #[serde(default)]
    pub implementors: Vec<String>,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
    #[serde(default)]
    pub auth: HashMap<AuthOperationConfig, AuthExprConfig>,
}

/// Mirrors [`TypeKind`] with a serde-friendly, lowercase wire representation.
#[derive(Copy, Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TypeKindConfig {
    Object,
    Interface,
    Union,
}

impl Default for TypeKindConfig {
    fn default() -> Self {
        TypeKindConfig::Object
    }
}

/// One field entry of a [`TypeConfig`]. A field is either scalar (`scalar` set) or an edge
/// (`edge` set); exactly one of the two is expected to be present.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    pub name: String,
    #[serde(default)]
    pub list: bool,
    #[serde(default)]
    pub id: bool,
    pub scalar: Option<ScalarKindConfig>,
    pub edge: Option<EdgeConfig>,
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKindConfig {
    String,
    Int,
    Float,
    Boolean,
    DateTime,
}

/// Mirrors [`EdgeDef`], in the shape a schema loader or a hand-authored YAML fixture supplies.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EdgeConfig {
    pub direction: EdgeDirectionConfig,
    pub predicate: String,
    pub inverse_predicate: String,
    pub cardinality: CardinalityConfig,
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum EdgeDirectionConfig {
    Forward,
    Reverse,
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum CardinalityConfig {
    One,
    Many,
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AuthOperationConfig {
    Query,
    Add,
    Update,
    Delete,
}

/// Mirrors [`AuthExpr`] in a serde-friendly shape; the `eq` variant's `field`/`claim` pair
/// matches [`AuthExpr::Eq`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AuthExprConfig {
    Claim(String),
    Eq { field: String, claim: String },
    And(Vec<AuthExprConfig>),
    Or(Vec<AuthExprConfig>),
    Not(Box<AuthExprConfig>),
    AlwaysAllow,
}

impl From<AuthExprConfig> for AuthExpr {
    fn from(c: AuthExprConfig) -> AuthExpr {
        match c {
            AuthExprConfig::Claim(c) => AuthExpr::Claim(c),
            AuthExprConfig::Eq { field, claim } => AuthExpr::Eq { field, claim },
            AuthExprConfig::And(v) => AuthExpr::And(v.into_iter().map(AuthExpr::from).collect()),
            AuthExprConfig::Or(v) => AuthExpr::Or(v.into_iter().map(AuthExpr::from).collect()),
            AuthExprConfig::Not(inner) => AuthExpr::Not(Box::new(AuthExpr::from(*inner))),
            AuthExprConfig::AlwaysAllow => AuthExpr::AlwaysAllow,
        }
    }
}

impl From<AuthOperationConfig> for AuthOperation {
    fn from(c: AuthOperationConfig) -> AuthOperation {
        match c {
            AuthOperationConfig::Query => AuthOperation::Query,
            AuthOperationConfig::Add => AuthOperation::Add,
            AuthOperationConfig::Update => AuthOperation::Update,
            AuthOperationConfig::Delete => AuthOperation::Delete,
        }
    }
}

impl From<ScalarKindConfig> for ScalarKind {
    fn from(c: ScalarKindConfig) -> ScalarKind {
        match c {
            ScalarKindConfig::String => ScalarKind::String,
            ScalarKindConfig::Int => ScalarKind::Int,
            ScalarKindConfig::Float => ScalarKind::Float,
            ScalarKindConfig::Boolean => ScalarKind::Boolean,
            ScalarKindConfig::DateTime => ScalarKind::DateTime,
        }
    }
}

impl From<EdgeDirectionConfig> for EdgeDirection {
    fn from(c: EdgeDirectionConfig) -> EdgeDirection {
        match c {
            EdgeDirectionConfig::Forward => EdgeDirection::Forward,
            EdgeDirectionConfig::Reverse => EdgeDirection::Reverse,
        }
    }
}

impl From<CardinalityConfig> for Cardinality {
    fn from(c: CardinalityConfig) -> Cardinality {
        match c {
            CardinalityConfig::One => Cardinality::One,
            CardinalityConfig::Many => Cardinality::Many,
        }
    }
}

impl From<EdgeConfig> for EdgeDef {
    fn from(c: EdgeConfig) -> EdgeDef {
        EdgeDef::new(
            c.direction.into(),
            c.predicate,
            c.inverse_predicate,
            c.cardinality.into(),
        )
    }
}

impl TryFrom<FieldConfig> for FieldDef {
    type Error = Error;

    fn try_from(c: FieldConfig) -> Result<FieldDef, Error> {
        match (c.scalar, c.edge) {
            (Some(scalar), None) => Ok(FieldDef::new_scalar(
                c.name.clone(),
                c.name,
                scalar.into(),
            )
            .with_id(c.id)
            .with_list(c.list)),
            (None, Some(edge)) => Ok(FieldDef::new_edge(
                c.name.clone(),
                c.name,
                c.list,
                edge.into(),
            )),
            (Some(_), Some(_)) | (None, None) => Err(Error::InvalidFilter {
                message: format!(
                    "field `{}` must declare exactly one of `scalar` or `edge`",
                    c.name
                ),
            }),
        }
    }
}

impl TryFrom<TypeConfig> for TypeDef {
    type Error = Error;

    fn try_from(c: TypeConfig) -> Result<TypeDef, Error> {
        let kind = match c.kind {
            TypeKindConfig::Object => TypeKind::Object,
            TypeKindConfig::Interface => TypeKind::Interface {
                implementors: c.implementors,
            },
            TypeKindConfig::Union => TypeKind::Union { members: c.members },
        };
        let fields = c
            .fields
            .into_iter()
            .map(FieldDef::try_from)
            .collect::<Result<Vec<_>, Error>>()?;
        let auth_rules = c
            .auth
            .into_iter()
            .map(|(op, expr)| (AuthOperation::from(op), AuthExpr::from(expr)))
            .collect::<HashMap<_, _>>();
        Ok(TypeDef::new(c.name, kind, fields).with_auth_rules(auth_rules))
    }
}

impl TryFrom<SchemaConfig> for Schema {
    type Error = Error;

    fn try_from(c: SchemaConfig) -> Result<Schema, Error> {
        let type_defs = c
            .types
            .into_iter()
            .map(|t| {
                let type_def = TypeDef::try_from(t)?;
                Ok((type_def.name().to_string(), type_def))
            })
            .collect::<Result<HashMap<_, _>, Error>>()?;
        Ok(Schema::new(type_defs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
types:
  - name: Author
    kind: object
    fields:
      - name: name
        scalar: string
      - name: dob
        scalar: dateTime
      - name: posts
        list: true
        edge:
          direction: forward
          predicate: Author.posts
          inversePredicate: Post.author
          cardinality: one
  - name: Post
    kind: object
    fields:
      - name: title
        scalar: string
      - name: author
        edge:
          direction: forward
          predicate: Post.author
          inversePredicate: Author.posts
          cardinality: many
"#
    }

    #[test]
    fn parses_and_converts_to_schema() {
        let config = SchemaConfig::from_yaml_str(sample_yaml()).unwrap();
        let schema = config.try_into_schema().unwrap();
        let author = schema.type_def_by_name("Author").unwrap();
        assert_eq!(3, author.fields().len());
        assert!(author.field("posts").unwrap().edge().is_some());
    }

    #[test]
    fn field_with_both_scalar_and_edge_is_rejected() {
        let bad = FieldConfig {
            name: "broken".to_string(),
            list: false,
            id: false,
            scalar: Some(ScalarKindConfig::String),
            edge: Some(EdgeConfig {
                direction: EdgeDirectionConfig::Forward,
                predicate: "X.y".to_string(),
                inverse_predicate: "Y.x".to_string(),
                cardinality: CardinalityConfig::One,
            }),
        };
        assert!(FieldDef::try_from(bad).is_err());
    }

    #[test]
    fn interface_implementors_survive_conversion() {
        let yaml = r#"
types:
  - name: Node
    kind: interface
    implementors: [Author, Post]
"#;
        let config = SchemaConfig::from_yaml_str(yaml).unwrap();
        let schema = config.try_into_schema().unwrap();
        match schema.type_def_by_name("Node").unwrap().kind() {
            TypeKind::Interface { implementors } => {
                assert_eq!(&vec!["Author".to_string(), "Post".to_string()], implementors)
            }
            other => panic!("expected interface, got {:?}", other),
        }
    }
}
