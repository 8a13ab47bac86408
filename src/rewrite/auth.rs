//! Compiles a type's `Delete` [`AuthRule`] against a caller's [`AuthContext`] into either the
//! degenerate empty-result plan or an additional filter to AND-compose with the caller's own
//! filter.
//!
//! Grounded in the three-phase shape (resolve context → evaluate → reconstruct) used by the
//! authorization pipeline this crate's auth model is patterned on, collapsed here into a single
//! "compile, or short-circuit" pass appropriate for a pure rewrite function.

use crate::filter::Filter;
use crate::schema::{AuthContext, AuthExpr, AuthOperation, Schema, TypeDef, TypeKind};
use crate::Error;
use log::trace;

/// The result of compiling a type's delete authorization: either the degenerate plan applies,
/// or an optional extra filter should be AND-composed with the caller's filter.
pub(crate) struct AuthCompileResult {
    pub(crate) degenerate: bool,
    pub(crate) extra_filter: Option<Filter>,
}

/// Compiles authorization for a delete of `type_def`.
///
/// If `type_def` is an interface and any of its implementing types carries a `Delete` rule,
/// the whole pipeline short circuits to the degenerate plan before the caller's filter is
/// translated at all, matching the control-flow order in `SPEC_FULL.md` §2.
pub(crate) fn compile(
    schema: &Schema,
    type_def: &TypeDef,
    ctx: &dyn AuthContext,
) -> Result<AuthCompileResult, Error> {
    trace!(
        "auth::compile called -- type: {}",
        type_def.name()
    );

    if let TypeKind::Interface { implementors } = type_def.kind() {
        for name in implementors {
            let implementor = schema.type_def_by_name(name)?;
            if implementor.auth_rule(AuthOperation::Delete).is_some() {
                return Ok(AuthCompileResult {
                    degenerate: true,
                    extra_filter: None,
                });
            }
        }
    }

    let extra_filter = match type_def.auth_rule(AuthOperation::Delete) {
        Some(expr) => evaluate(expr, ctx)?,
        None => None,
    };

    Ok(AuthCompileResult {
        degenerate: false,
        extra_filter,
    })
}

/// Evaluates an [`AuthExpr`] against `ctx`, returning the additional filter it contributes (if
/// any), or failing with [`Error::Unauthorized`] if a required claim is absent.
fn evaluate(expr: &AuthExpr, ctx: &dyn AuthContext) -> Result<Option<Filter>, Error> {
    match expr {
        AuthExpr::AlwaysAllow => Ok(None),
        AuthExpr::Claim(name) => {
            if ctx.claim(name).is_none() {
                return Err(Error::Unauthorized {
                    rule: format!("claim `{}` is required", name),
                });
            }
            Ok(None)
        }
        AuthExpr::Eq { field, claim } => match ctx.claim(claim) {
            Some(value) => Ok(Some(Filter::eq(field.clone(), value))),
            None => Err(Error::Unauthorized {
                rule: format!("claim `{}` is required", claim),
            }),
        },
        AuthExpr::And(children) => {
            let mut filters = Vec::new();
            for child in children {
                if let Some(f) = evaluate(child, ctx)? {
                    filters.push(f);
                }
            }
            Ok(combine(filters))
        }
        AuthExpr::Or(children) => {
            let mut last_err = None;
            let mut filters = Vec::new();
            for child in children {
                match evaluate(child, ctx) {
                    Ok(f) => {
                        if let Some(f) = f {
                            filters.push(f);
                        } else {
                            // A branch that unconditionally allows makes the whole Or allow.
                            return Ok(None);
                        }
                    }
                    Err(e) => last_err = Some(e),
                }
            }
            if filters.is_empty() {
                match last_err {
                    Some(e) => Err(e),
                    None => Ok(None),
                }
            } else if filters.len() == 1 {
                Ok(filters.into_iter().next())
            } else {
                Ok(Some(Filter::Or(filters)))
            }
        }
        AuthExpr::Not(inner) => match evaluate(inner, ctx) {
            Ok(Some(f)) => Ok(Some(Filter::Not(Box::new(f)))),
            Ok(None) => Err(Error::Unauthorized {
                rule: "negated rule is unconditionally satisfied".to_string(),
            }),
            Err(_) => Ok(None),
        },
    }
}

fn combine(filters: Vec<Filter>) -> Option<Filter> {
    match filters.len() {
        0 => None,
        1 => filters.into_iter().next(),
        _ => Some(Filter::And(filters)),
    }
}
