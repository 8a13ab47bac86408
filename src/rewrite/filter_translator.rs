//! Translates an abstract [`Filter`] tree for a single type into the graph-query `(rootFunc,
//! filterClause)` pair the Query Emitter assembles into a query block.

use crate::filter::{Filter, Operator};
use crate::schema::{ScalarKind, TypeDef};
use crate::value::Value;
use crate::Error;
use log::trace;

/// Translates `filter` against `type_def`, returning the root function (`uid(...)` or
/// `type(T)`) and, when one applies, the rendered `@filter(...)` clause body.
///
/// The mandatory `type(T)` guard is only added to the filter clause when the root function is
/// `uid(...)`: when the root function is `type(T)` it already constrains membership, so adding
/// the guard again to the filter clause would be redundant and does not match the corpus
/// examples.
pub(crate) fn translate(
    type_def: &TypeDef,
    filter: &Filter,
) -> Result<(String, Option<String>), Error> {
    trace!(
        "filter_translator::translate called -- type: {}, filter: {:?}",
        type_def.name(),
        filter
    );

    let (ids, remainder) = extract_id_set(filter)?;

    match ids {
        Some(ids) => {
            if ids.is_empty() {
                return Err(Error::InvalidFilter {
                    message: "id filter must not be empty".to_string(),
                });
            }
            let root_func = format!("uid({})", ids.join(", "));
            let type_guard = format!("type({})", type_def.name());
            let clause = match remainder {
                Some(r) => {
                    let rendered = render(type_def, &r)?;
                    format!("({} AND {})", rendered, type_guard)
                }
                None => type_guard,
            };
            Ok((root_func, Some(clause)))
        }
        None => {
            let root_func = format!("type({})", type_def.name());
            let clause = match remainder {
                Some(r) => Some(render(type_def, &r)?),
                None => None,
            };
            Ok((root_func, clause))
        }
    }
}

/// Pulls a top-level [`Filter::IdSet`] out of `filter`, returning the ids (if any) alongside
/// whatever filter remains once the id term is removed. An `IdSet` is only recognized as the
/// whole filter or as a direct child of a top-level `And` — it is not a legal nested term.
fn extract_id_set(filter: &Filter) -> Result<(Option<Vec<String>>, Option<Filter>), Error> {
    match filter {
        Filter::IdSet(ids) => Ok((Some(ids.clone()), None)),
        Filter::And(children) => {
            let mut ids = None;
            let mut rest = Vec::new();
            for child in children {
                match child {
                    Filter::IdSet(v) if ids.is_none() => ids = Some(v.clone()),
                    other => rest.push(other.clone()),
                }
            }
            let remainder = match rest.len() {
                0 => None,
                1 => Some(rest.into_iter().next().expect("len checked above")),
                _ => Some(Filter::And(rest)),
            };
            Ok((ids, remainder))
        }
        other => Ok((None, Some(other.clone()))),
    }
}

/// Renders a filter (with no id-term) into its textual form, without the outer `type(T)`
/// guard.
fn render(type_def: &TypeDef, filter: &Filter) -> Result<String, Error> {
    match filter {
        Filter::IdSet(_) => Err(Error::InvalidFilter {
            message: "id filter is only legal at the top level of a delete filter".to_string(),
        }),
        Filter::Leaf { field, op, value } => render_leaf(type_def, field, *op, value),
        Filter::And(children) => render_conjunction(type_def, children, "AND"),
        Filter::Or(children) => render_conjunction(type_def, children, "OR"),
        Filter::Not(inner) => {
            let rendered = render(type_def, inner)?;
            Ok(format!("NOT {}", rendered))
        }
    }
}

fn render_conjunction(type_def: &TypeDef, children: &[Filter], op: &str) -> Result<String, Error> {
    if children.is_empty() {
        return Err(Error::InvalidFilter {
            message: format!("empty {} filter", op),
        });
    }

    // Leaves sort lexicographically by field name; nested sub-expressions sort after leaves,
    // by their fully rendered text, to keep output deterministic even for deeply nested trees.
    let mut leaves = Vec::new();
    let mut nested = Vec::new();
    for child in children {
        let rendered = render(type_def, child)?;
        match child {
            Filter::Leaf { field, .. } => leaves.push((field.clone(), rendered)),
            _ => nested.push(rendered),
        }
    }
    leaves.sort_by(|a, b| a.0.cmp(&b.0));
    nested.sort();

    let mut parts: Vec<String> = leaves.into_iter().map(|(_, rendered)| rendered).collect();
    parts.extend(nested);

    if parts.len() > 1 {
        Ok(format!("({})", parts.join(&format!(" {} ", op))))
    } else {
        Ok(parts.remove(0))
    }
}

fn render_leaf(
    type_def: &TypeDef,
    field: &str,
    op: Operator,
    value: &Value,
) -> Result<String, Error> {
    let field_def = type_def.field(field).ok_or_else(|| Error::UnknownType {
        name: format!("{}.{}", type_def.name(), field),
    })?;

    if op != Operator::Has {
        let scalar = field_def.scalar().ok_or_else(|| Error::InvalidFilter {
            message: format!(
                "operator `{}` is not legal against the relationship field `{}.{}`",
                op.as_str(),
                type_def.name(),
                field
            ),
        })?;
        if !operator_legal_for(op, scalar) {
            return Err(Error::InvalidFilter {
                message: format!(
                    "operator `{}` is not legal against {}.{} of scalar kind {:?}",
                    op.as_str(),
                    type_def.name(),
                    field,
                    scalar
                ),
            });
        }
    }

    if op == Operator::Has {
        return Ok(format!("has({}.{})", type_def.name(), field));
    }

    Ok(format!(
        "{}({}.{}, {})",
        op.as_str(),
        type_def.name(),
        field,
        render_literal(value)?
    ))
}

fn operator_legal_for(op: Operator, scalar: ScalarKind) -> bool {
    use Operator::*;
    use ScalarKind::*;
    match op {
        Eq => matches!(scalar, String | Int | Float | Boolean | DateTime),
        Lt | Le | Gt | Ge => matches!(scalar, Int | Float | DateTime),
        AnyOfTerms | AllOfTerms => matches!(scalar, ScalarKind::String),
        Has => true,
    }
}

fn render_literal(value: &Value) -> Result<String, Error> {
    match value {
        Value::String(s) => Ok(format!("{:?}", s)),
        Value::Int64(i) => Ok(i.to_string()),
        Value::UInt64(i) => Ok(i.to_string()),
        Value::Float64(f) => Ok(f.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(Error::InvalidFilter {
            message: format!("value {:?} is not a legal filter literal", other),
        }),
    }
}
