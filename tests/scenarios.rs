//! Black-box integration tests exercising the delete rewriter end to end through
//! `graphscribe::rewrite::rewrite`, covering the literal corpus scenarios.

use graphscribe::filter::Filter;
use graphscribe::operation::{Operation, Selection, SelectionField};
use graphscribe::rewrite;
use graphscribe::schema::{
    Cardinality, Claims, EdgeDef, EdgeDirection, FieldDef, ScalarKind, Schema, TypeDef, TypeKind,
};
use graphscribe::value::Value;
use std::collections::HashMap;

fn schema_with_author_post_category() -> Schema {
    let author = TypeDef::new(
        "Author".to_string(),
        TypeKind::Object,
        vec![
            FieldDef::new_scalar("name".to_string(), "String".to_string(), ScalarKind::String),
            FieldDef::new_scalar("dob".to_string(), "DateTime".to_string(), ScalarKind::DateTime),
            FieldDef::new_edge(
                "posts".to_string(),
                "Post".to_string(),
                true,
                EdgeDef::new(
                    EdgeDirection::Forward,
                    "Author.posts".to_string(),
                    "Post.author".to_string(),
                    Cardinality::One,
                ),
            ),
        ],
    );
    let post = TypeDef::new(
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
    );
    let category = TypeDef::new(
        "Category".to_string(),
        TypeKind::Object,
        vec![FieldDef::new_scalar(
            "name".to_string(),
            "String".to_string(),
            ScalarKind::String,
        )],
    );
    let mut defs = HashMap::new();
    defs.insert("Author".to_string(), author);
    defs.insert("Post".to_string(), post);
    defs.insert("Category".to_string(), category);
    Schema::new(defs)
}

/// S2 — an id filter plus a non-id predicate AND-joins the predicate with the type guard.
#[test]
fn s2_id_and_predicate_filter() {
    let schema = schema_with_author_post_category();
    let op = Operation::Delete {
        type_name: "Author".to_string(),
        filter: Filter::And(vec![
            Filter::IdSet(vec!["0x1".to_string(), "0x2".to_string()]),
            Filter::eq("name", Value::String("A.N. Author".to_string())),
        ]),
        selection: None,
    };
    let result = rewrite::rewrite(&op, &schema, &Claims::new()).unwrap();
    assert!(result
        .query
        .contains("x as deleteAuthor(func: uid(0x1, 0x2)) @filter((eq(Author.name, \"A.N. Author\") AND type(Author)))"));
}

/// S3 — a non-id-only filter uses `type(T)` as the root func, with lexicographically ordered
/// leaves in the filter clause.
#[test]
fn s3_non_id_filter_uses_type_root_func() {
    let schema = schema_with_author_post_category();
    let op = Operation::Delete {
        type_name: "Author".to_string(),
        filter: Filter::And(vec![
            Filter::eq("name", Value::String("A.N. Author".to_string())),
            Filter::eq("dob", Value::String("2000-01-01".to_string())),
        ]),
        selection: None,
    };
    let result = rewrite::rewrite(&op, &schema, &Claims::new()).unwrap();
    assert!(result.query.contains(
        "x as deleteAuthor(func: type(Author)) @filter((eq(Author.dob, \"2000-01-01\") AND eq(Author.name, \"A.N. Author\")))"
    ));
}

/// S4 — a singular forward edge whose inverse predicate is a list nulls it out as an array.
#[test]
fn s4_list_inverse_cardinality() {
    let country = TypeDef::new(
        "Country".to_string(),
        TypeKind::Object,
        vec![FieldDef::new_scalar(
            "name".to_string(),
            "String".to_string(),
            ScalarKind::String,
        )],
    );
    let state = TypeDef::new(
        "State".to_string(),
        TypeKind::Object,
        vec![
            FieldDef::new_scalar("name".to_string(), "String".to_string(), ScalarKind::String),
            FieldDef::new_edge(
                "country".to_string(),
                "Country".to_string(),
                false,
                EdgeDef::new(
                    EdgeDirection::Forward,
                    "State.country".to_string(),
                    "Country.states".to_string(),
                    Cardinality::Many,
                ),
            ),
        ],
    );
    let mut defs = HashMap::new();
    defs.insert("Country".to_string(), country);
    defs.insert("State".to_string(), state);
    let schema = Schema::new(defs);

    let op = Operation::Delete {
        type_name: "State".to_string(),
        filter: Filter::IdSet(vec!["0x5".to_string()]),
        selection: None,
    };
    let result = rewrite::rewrite(&op, &schema, &Claims::new()).unwrap();
    assert!(result.query.contains("Country2 as State.country"));
    assert_eq!(
        serde_json::json!({"uid": "uid(Country2)", "Country.states": [{"uid": "uid(x)"}]}),
        result.mutations[1]
    );
}

/// S5 — multiple inverse edges number sequentially across the whole delete, not per field.
#[test]
fn s5_multiple_inverses_share_one_counter() {
    let schema = schema_with_author_post_category();
    let op = Operation::Delete {
        type_name: "Post".to_string(),
        filter: Filter::IdSet(vec!["0x9".to_string()]),
        selection: None,
    };
    let result = rewrite::rewrite(&op, &schema, &Claims::new()).unwrap();
    assert!(result.query.contains("Author2 as Post.author"));
    assert!(result.query.contains("Category3 as Post.category"));
    assert_eq!(3, result.mutations.len());
}

/// S6 — a reverse-predicate edge walks with `~` in the query but uses the bare predicate as
/// the mutation key.
#[test]
fn s6_reverse_predicate_edge() {
    let director = TypeDef::new(
        "Director".to_string(),
        TypeKind::Object,
        vec![FieldDef::new_scalar(
            "name".to_string(),
            "String".to_string(),
            ScalarKind::String,
        )],
    );
    let movie = TypeDef::new(
        "Movie".to_string(),
        TypeKind::Object,
        vec![
            FieldDef::new_scalar("title".to_string(), "String".to_string(), ScalarKind::String),
            FieldDef::new_edge(
                "director".to_string(),
                "Director".to_string(),
                false,
                EdgeDef::new(
                    EdgeDirection::Reverse,
                    "directed.movies".to_string(),
                    "directed.movies".to_string(),
                    Cardinality::Many,
                ),
            ),
        ],
    );
    let mut defs = HashMap::new();
    defs.insert("Director".to_string(), director);
    defs.insert("Movie".to_string(), movie);
    let schema = Schema::new(defs);

    let op = Operation::Delete {
        type_name: "Movie".to_string(),
        filter: Filter::IdSet(vec!["0x7".to_string()]),
        selection: None,
    };
    let result = rewrite::rewrite(&op, &schema, &Claims::new()).unwrap();
    assert!(result.query.contains("MovieDirector2 as ~directed.movies"));
    assert_eq!(
        serde_json::json!({"uid": "uid(MovieDirector2)", "directed.movies": [{"uid": "uid(x)"}]}),
        result.mutations[1]
    );
}

/// S7 — deleting an interface whose implementor carries a delete auth rule always degenerates,
/// regardless of the caller's claims.
#[test]
fn s7_interface_with_auth_gated_implementor_degenerates() {
    let mut rules = HashMap::new();
    rules.insert(
        graphscribe::schema::AuthOperation::Delete,
        graphscribe::schema::AuthExpr::AlwaysAllow,
    );
    let author = TypeDef::new("Author".to_string(), TypeKind::Object, Vec::new())
        .with_auth_rules(rules);
    let node = TypeDef::new(
        "Node".to_string(),
        TypeKind::Interface {
            implementors: vec!["Author".to_string()],
        },
        Vec::new(),
    );
    let mut defs = HashMap::new();
    defs.insert("Author".to_string(), author);
    defs.insert("Node".to_string(), node);
    let schema = Schema::new(defs);

    let op = Operation::Delete {
        type_name: "Node".to_string(),
        filter: Filter::IdSet(vec!["0x1".to_string(), "0x2".to_string()]),
        selection: None,
    };
    let result = rewrite::rewrite(&op, &schema, &Claims::new()).unwrap();
    assert_eq!("query {\n  x as deleteNode()\n}\n", result.query);
    assert_eq!(vec![serde_json::json!({"uid": "uid(x)"})], result.mutations);
}

/// S8 — a read-back selection produces a second aliased block with field projection.
#[test]
fn s8_read_back_selection() {
    let schema = schema_with_author_post_category();
    let op = Operation::Delete {
        type_name: "Author".to_string(),
        filter: Filter::IdSet(vec!["0x1".to_string()]),
        selection: Some(Selection::new(vec![
            SelectionField::scalar("id"),
            SelectionField::scalar("name"),
        ])),
    };
    let result = rewrite::rewrite(&op, &schema, &Claims::new()).unwrap();
    assert!(result.query.contains("author(func: uid(x)) {"));
    assert!(result.query.contains("name : Author.name"));
    assert!(result.query.contains("dgraph.uid : uid"));
}

/// Rewriting is deterministic: the same input produces byte-identical output across calls.
#[test]
fn rewriting_is_deterministic() {
    let schema = schema_with_author_post_category();
    let op = Operation::Delete {
        type_name: "Post".to_string(),
        filter: Filter::IdSet(vec!["0x9".to_string()]),
        selection: None,
    };
    let first = rewrite::rewrite(&op, &schema, &Claims::new()).unwrap();
    let second = rewrite::rewrite(&op, &schema, &Claims::new()).unwrap();
    assert_eq!(first.query, second.query);
    assert_eq!(first.mutations, second.mutations);
}

/// Every mutation object besides the victim removal references a variable bound in the query.
#[test]
fn mutation_variables_are_all_bound_in_the_query() {
    let schema = schema_with_author_post_category();
    let op = Operation::Delete {
        type_name: "Post".to_string(),
        filter: Filter::IdSet(vec!["0x9".to_string()]),
        selection: None,
    };
    let result = rewrite::rewrite(&op, &schema, &Claims::new()).unwrap();
    for mutation in result.mutations.iter().skip(1) {
        let uid_ref = mutation["uid"].as_str().expect("mutation object has a uid key");
        let var = uid_ref
            .strip_prefix("uid(")
            .and_then(|s| s.strip_suffix(')'))
            .expect("uid value is of the form uid(Var)");
        assert!(result.query.contains(&format!("{} as", var)));
    }
}
