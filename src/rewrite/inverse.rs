//! Discovers, for a victim type, every edge whose deletion would leave a dangling reference
//! from another type, and plans the query projection and cleanup mutation for each.

use super::suffix::VarCounter;
use crate::schema::{Cardinality, EdgeDirection, TypeDef};
use log::trace;
use serde_json::json;

/// One planned inverse-edge cleanup: the fresh query variable bound to the inverse holder, the
/// query projection expression that binds it, and the delete-mutation JSON object that nulls
/// out the reference.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct InverseProjection {
    pub(crate) var: String,
    pub(crate) project_expr: String,
    pub(crate) mutation_object: serde_json::Value,
}

/// Plans the inverse-edge cleanup for every edge field of `type_def`, in field declaration
/// order, drawing the numeric suffix from `counter`. `counter` is shared across the whole
/// rewrite call so numbering is global across every edge of the victim type, not reset per
/// field.
///
/// The variable name itself is the edge's destination type name followed by that suffix
/// (`Post2`, `Country2`): a forward edge's predicate already names its destination type
/// (`Author.posts`), so the projection variable reuses it directly. A reverse edge's predicate
/// carries no such type name (`~directed.movies` is a free-form Dgraph predicate, not a
/// `Type.field` pair), so it is prefixed with the victim type to keep it unambiguous —
/// `MovieDirector2`, not a bare `Director2`.
pub(crate) fn plan(type_def: &TypeDef, counter: &mut VarCounter) -> Vec<InverseProjection> {
    trace!(
        "inverse::plan called -- type: {}, field_count: {}",
        type_def.name(),
        type_def.fields().len()
    );

    type_def
        .fields()
        .iter()
        .filter_map(|field| field.edge().map(|edge| (field, edge)))
        .map(|(field, edge)| {
            let suffix = counter.next_suffix();
            let label = match edge.direction() {
                EdgeDirection::Forward => field.type_name().to_string(),
                EdgeDirection::Reverse => format!("{}{}", type_def.name(), field.type_name()),
            };
            let var = format!("{}{}", label, suffix);
            let predicate_render = match edge.direction() {
                EdgeDirection::Forward => edge.predicate().to_string(),
                EdgeDirection::Reverse => format!("~{}", edge.predicate()),
            };
            let project_expr = format!("{} as {}", var, predicate_render);

            let value = match edge.cardinality() {
                Cardinality::One => json!({ "uid": "uid(x)" }),
                Cardinality::Many => json!([{ "uid": "uid(x)" }]),
            };
            let mutation_object = json!({
                "uid": format!("uid({})", var),
                edge.inverse_predicate(): value,
            });

            InverseProjection {
                var,
                project_expr,
                mutation_object,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{EdgeDef, FieldDef, ScalarKind, TypeKind};

    fn post_type() -> TypeDef {
        TypeDef::new(
            "Post".to_string(),
            TypeKind::Object,
            vec![
                FieldDef::new_scalar("title".to_string(), "String".to_string(), ScalarKind::String),
                FieldDef::new_edge(
                    "author".to_string(),
                    "Author".to_string(),
                    false,
                    EdgeDef::new(
                        EdgeDirection::Forward,
                        "Post.author".to_string(),
                        "Author.posts".to_string(),
                        Cardinality::Many,
                    ),
                ),
                FieldDef::new_edge(
                    "category".to_string(),
                    "Category".to_string(),
                    false,
                    EdgeDef::new(
                        EdgeDirection::Forward,
                        "Post.category".to_string(),
                        "Category.posts".to_string(),
                        Cardinality::Many,
                    ),
                ),
            ],
        )
    }

    /// S5 — two edges in declaration order produce Author2/Category3, with the counter global
    /// across both.
    #[test]
    fn counter_continues_across_edges() {
        let mut counter = VarCounter::new();
        let projections = plan(&post_type(), &mut counter);

        assert_eq!(2, projections.len());
        assert_eq!("Author2", projections[0].var);
        assert_eq!("Author2 as Post.author", projections[0].project_expr);
        assert_eq!(
            json!({"uid": "uid(Author2)", "Author.posts": [{"uid": "uid(x)"}]}),
            projections[0].mutation_object
        );

        assert_eq!("Category3", projections[1].var);
        assert_eq!("Category3 as Post.category", projections[1].project_expr);
    }

    /// S6 — a reverse-direction edge renders with a `~` prefix in the query, but the bare
    /// predicate as the mutation key, and its variable is prefixed with the victim type.
    #[test]
    fn reverse_edge_projects_with_tilde() {
        let field = FieldDef::new_edge(
            "director".to_string(),
            "Director".to_string(),
            false,
            EdgeDef::new(
                EdgeDirection::Reverse,
                "directed.movies".to_string(),
                "directed.movies".to_string(),
                Cardinality::Many,
            ),
        );
        let type_def = TypeDef::new("Movie".to_string(), TypeKind::Object, vec![field]);
        let mut counter = VarCounter::new();
        let projections = plan(&type_def, &mut counter);

        assert_eq!("MovieDirector2 as ~directed.movies", projections[0].project_expr);
        assert_eq!(
            json!({"uid": "uid(MovieDirector2)", "directed.movies": [{"uid": "uid(x)"}]}),
            projections[0].mutation_object
        );
    }

    /// S4 — singular vs. list inverse cardinality controls the mutation value shape.
    #[test]
    fn singular_inverse_uses_object_not_array() {
        let field = FieldDef::new_edge(
            "country".to_string(),
            "Country".to_string(),
            false,
            EdgeDef::new(
                EdgeDirection::Forward,
                "State.country".to_string(),
                "Country.states".to_string(),
                Cardinality::Many,
            ),
        );
        let type_def = TypeDef::new("State".to_string(), TypeKind::Object, vec![field]);
        let mut counter = VarCounter::new();
        let projections = plan(&type_def, &mut counter);

        assert_eq!("Country2", projections[0].var);
        assert_eq!(
            json!({"uid": "uid(Country2)", "Country.states": [{"uid": "uid(x)"}]}),
            projections[0].mutation_object
        );
    }

    #[test]
    fn scalar_fields_do_not_plan_an_inverse() {
        let mut counter = VarCounter::new();
        let type_def = TypeDef::new(
            "Widget".to_string(),
            TypeKind::Object,
            vec![FieldDef::new_scalar(
                "name".to_string(),
                "String".to_string(),
                ScalarKind::String,
            )],
        );
        assert!(plan(&type_def, &mut counter).is_empty());
    }
}
