//! Assembles the top-level graph query: the victim binding block and, when requested, the
//! read-back selection block.

use super::inverse::InverseProjection;
use crate::operation::{Order, OrderDirection, Selection};
use crate::schema::{Schema, TypeDef};
use crate::Error;

/// Emits the victim binding block:
///
/// ```text
/// query {
///   x as <alias>(func: <rootFunc>) @filter(<filterClause>) {
///     uid
///     <projectExpr>
///     ...
///   }
///   <selectionBlock>
/// }
/// ```
pub(crate) fn emit(
    alias: &str,
    root_func: &str,
    filter_clause: Option<&str>,
    projections: &[InverseProjection],
    selection_block: Option<&str>,
) -> String {
    let mut s = String::new();
    s.push_str("query {\n");
    s.push_str(&format!("  x as {}(func: {})", alias, root_func));
    if let Some(clause) = filter_clause {
        s.push_str(&format!(" @filter({})", clause));
    }
    s.push_str(" {\n");
    s.push_str("    uid\n");
    for p in projections {
        s.push_str(&format!("    {}\n", p.project_expr));
    }
    s.push_str("  }\n");
    if let Some(block) = selection_block {
        s.push_str(block);
    }
    s.push_str("}\n");
    s
}

/// Emits the degenerate binding block for an interface delete blocked by auth on an
/// implementing type: no filter, no body.
pub(crate) fn emit_degenerate(alias: &str) -> String {
    format!("query {{\n  x as {}()\n}}\n", alias)
}

/// Renders the read-back selection block rooted at `func: uid(x)`, named `alias` (the
/// lowerCamel GraphQL field name, e.g. `author`).
pub(crate) fn render_selection(
    schema: &Schema,
    type_def: &TypeDef,
    alias: &str,
    selection: &Selection,
) -> Result<String, Error> {
    let mut args = vec!["func: uid(x)".to_string()];
    if let Some(clause) = selection.filter.as_ref() {
        let (_, rendered) = super::filter_translator::translate(type_def, clause)?;
        if let Some(rendered) = rendered {
            args.push(format!("@filter({})", rendered));
        }
    }
    push_order_first_offset(&mut args, type_def, selection);

    let mut s = String::new();
    s.push_str(&format!("  {}({}) {{\n", alias, args.join(", ")));
    render_fields(schema, type_def, selection, 2, &mut s)?;
    s.push_str("  }\n");
    Ok(s)
}

fn push_order_first_offset(args: &mut Vec<String>, type_def: &TypeDef, selection: &Selection) {
    if let Some(Order { field, direction }) = selection.order.as_ref() {
        let keyword = match direction {
            OrderDirection::Asc => "orderasc",
            OrderDirection::Desc => "orderdesc",
        };
        args.push(format!("{}: {}.{}", keyword, type_def.name(), field));
    }
    if let Some(first) = selection.first {
        args.push(format!("first: {}", first));
    }
    if let Some(offset) = selection.offset {
        args.push(format!("offset: {}", offset));
    }
}

/// Renders the field list of a selection block (scalar field aliasing plus recursive nested
/// relationship blocks), always terminated by `dgraph.uid : uid`.
fn render_fields(
    schema: &Schema,
    type_def: &TypeDef,
    selection: &Selection,
    indent: usize,
    out: &mut String,
) -> Result<(), Error> {
    let pad = "  ".repeat(indent);
    for field in &selection.fields {
        if field.name == "id" {
            // The synthetic node id is always surfaced via the dgraph.uid terminator below;
            // an explicit `id` selection does not get its own line.
            continue;
        }

        let field_def = type_def.field(&field.name).ok_or_else(|| Error::UnknownType {
            name: format!("{}.{}", type_def.name(), field.name),
        })?;

        match (&field.nested, field_def.edge()) {
            (Some(nested_selection), Some(edge)) => {
                let nested_type = schema.type_def_by_name(field_def.type_name())?;
                let mut args = Vec::new();
                if let Some(clause) = nested_selection.filter.as_ref() {
                    let (_, rendered) = super::filter_translator::translate(nested_type, clause)?;
                    if let Some(rendered) = rendered {
                        args.push(format!("@filter({})", rendered));
                    }
                }
                push_order_first_offset(&mut args, nested_type, nested_selection);

                let predicate = edge.predicate();
                if args.is_empty() {
                    out.push_str(&format!("{}{} : {} {{\n", pad, field.name, predicate));
                } else {
                    out.push_str(&format!(
                        "{}{}({}) : {} {{\n",
                        pad,
                        field.name,
                        args.join(", "),
                        predicate
                    ));
                }
                render_fields(schema, nested_type, nested_selection, indent + 1, out)?;
                out.push_str(&format!("{}}}\n", pad));
            }
            (None, _) => {
                out.push_str(&format!(
                    "{}{} : {}.{}\n",
                    pad,
                    field.name,
                    type_def.name(),
                    field.name
                ));
            }
            (Some(_), None) => {
                return Err(Error::InvalidFilter {
                    message: format!(
                        "field `{}.{}` has a nested selection but is not a relationship",
                        type_def.name(),
                        field.name
                    ),
                })
            }
        }
    }
    out.push_str(&format!("{}dgraph.uid : uid\n", pad));
    Ok(())
}
