//! Assembles the ordered array of delete-mutation JSON objects.

use super::inverse::InverseProjection;
use serde_json::json;

/// Emits the victim removal followed by one cleanup object per planned inverse edge, in order.
pub(crate) fn emit(projections: &[InverseProjection]) -> Vec<serde_json::Value> {
    let mut mutations = vec![json!({ "uid": "uid(x)" })];
    mutations.extend(projections.iter().map(|p| p.mutation_object.clone()));
    mutations
}

/// Emits the degenerate mutation array for an auth-blocked interface delete: just the victim
/// removal, with no cleanup objects.
pub(crate) fn emit_degenerate() -> Vec<serde_json::Value> {
    vec![json!({ "uid": "uid(x)" })]
}
