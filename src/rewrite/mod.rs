//! The rewrite pipeline: Driver → Auth Rule Compiler → Filter Translator → Inverse-Edge
//! Planner → Query Emitter ∥ Mutation Emitter.
//!
//! [`rewrite`] is a pure function of `(Operation, Schema, AuthContext)`: no shared mutable
//! state, no background tasks, no I/O. Multiple calls may run concurrently across threads
//! sharing the same `Schema`.

mod auth;
mod filter_translator;
mod inverse;
mod mutation_emitter;
mod query_emitter;
mod suffix;

use crate::filter::Filter;
use crate::operation::{Operation, Selection};
use crate::schema::{AuthContext, Schema, TypeDef, TypeKind};
use crate::Error;
use std::collections::HashMap;
use tracing::instrument;

/// The result of rewriting a single operation: the graph-query request and the ordered
/// mutation bundle, kept together so a caller can submit both in one round trip.
#[derive(Clone, Debug, PartialEq)]
pub struct RewrittenRequest {
    pub query: String,
    pub mutations: Vec<serde_json::Value>,
    pub variables: HashMap<String, String>,
    /// Empty for deletes; carried for uniformity with the add/update rewrite paths this crate
    /// does not yet implement, which would populate it with newly allocated node uids.
    pub new_nodes: HashMap<String, String>,
}

/// Rewrites `operation` against `schema` under the authorization context `ctx`.
///
/// # Examples
///
/// ```rust
/// use graphscribe::filter::Filter;
/// use graphscribe::operation::Operation;
/// use graphscribe::schema::{Claims, FieldDef, ScalarKind, Schema, TypeDef, TypeKind};
/// use graphscribe::rewrite;
/// use std::collections::HashMap;
///
/// let mut type_defs = HashMap::new();
/// type_defs.insert(
///     "Author".to_string(),
///     TypeDef::new(
///         "Author".to_string(),
///         TypeKind::Object,
///         vec![FieldDef::new_scalar(
///             "name".to_string(),
///             "String".to_string(),
///             ScalarKind::String,
///         )],
///     ),
/// );
/// let schema = Schema::new(type_defs);
///
/// let op = Operation::Delete {
///     type_name: "Author".to_string(),
///     filter: Filter::IdSet(vec!["0x1".to_string()]),
///     selection: None,
/// };
///
/// let result = rewrite::rewrite(&op, &schema, &Claims::new()).unwrap();
/// assert!(result.query.contains("uid(0x1)"));
/// ```
#[instrument(skip(schema, ctx), fields(type_name = %operation.type_name()))]
pub fn rewrite(
    operation: &Operation,
    schema: &Schema,
    ctx: &dyn AuthContext,
) -> Result<RewrittenRequest, Error> {
    match operation {
        Operation::Delete {
            type_name,
            filter,
            selection,
        } => rewrite_delete(type_name, filter, selection.as_ref(), schema, ctx),
    }
}

fn rewrite_delete(
    type_name: &str,
    filter: &Filter,
    selection: Option<&Selection>,
    schema: &Schema,
    ctx: &dyn AuthContext,
) -> Result<RewrittenRequest, Error> {
    let type_def = schema.type_def_by_name(type_name)?;

    if let TypeKind::Union { .. } = type_def.kind() {
        return Err(Error::UnsupportedOperation {
            message: format!("cannot delete union type `{}`", type_name),
        });
    }

    if let TypeKind::Object = type_def.kind() {
        if !type_def.fields().iter().any(|f| f.scalar().is_some()) {
            return Err(Error::UnsupportedOperation {
                message: format!("type `{}` has no persisted predicate", type_name),
            });
        }
    }

    let alias = format!("delete{}", type_name);

    let auth_result = auth::compile(schema, type_def, ctx)?;
    if auth_result.degenerate {
        return Ok(RewrittenRequest {
            query: query_emitter::emit_degenerate(&alias),
            mutations: mutation_emitter::emit_degenerate(),
            variables: HashMap::new(),
            new_nodes: HashMap::new(),
        });
    }

    let combined_filter = match auth_result.extra_filter {
        Some(extra) => combine_and(filter.clone(), extra),
        None => filter.clone(),
    };

    let (root_func, filter_clause) = filter_translator::translate(type_def, &combined_filter)?;

    let mut counter = suffix::VarCounter::new();
    let projections = inverse::plan(type_def, &mut counter);

    let selection_block = match selection {
        Some(sel) => {
            let alias = lower_camel(type_name);
            Some(query_emitter::render_selection(schema, type_def, &alias, sel)?)
        }
        None => None,
    };

    let query = query_emitter::emit(
        &alias,
        &root_func,
        filter_clause.as_deref(),
        &projections,
        selection_block.as_deref(),
    );
    let mutations = mutation_emitter::emit(&projections);

    Ok(RewrittenRequest {
        query,
        mutations,
        variables: HashMap::new(),
        new_nodes: HashMap::new(),
    })
}

fn combine_and(filter: Filter, extra: Filter) -> Filter {
    match filter {
        Filter::And(mut children) => {
            children.push(extra);
            Filter::And(children)
        }
        other => Filter::And(vec![other, extra]),
    }
}

fn lower_camel(type_name: &str) -> String {
    let mut chars = type_name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
