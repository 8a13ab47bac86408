//! Graphscribe rewrites a GraphQL delete mutation into the graph-query-language request
//! that identifies the victims and the inverse edges referencing them, and the ordered
//! sequence of graph-database delete-mutation JSON objects that clean them up.
//!
//! The crate is organized the way the rewrite pipeline itself is organized:
//!
//! * [`schema`] — the normalized, read-only view of the caller's GraphQL schema (types,
//!   fields, edges, inverse edges, `@id` markers, and per-type authorization rules) that the
//!   rewriter consumes.
//! * [`operation`] — the plain data shape of an incoming delete operation.
//! * [`filter`] — the abstract filter tree a filter compiler would hand the rewriter.
//! * [`value`] — the scalar value type shared by filter leaves and mutation JSON.
//! * [`rewrite`] — the rewrite pipeline itself: filter translation, authorization
//!   compilation, inverse-edge planning, and query/mutation emission.
//!
//! Schema loading, GraphQL parsing, filter compilation, transport, the graph-database
//! client, and response shaping are all external collaborators and out of scope for this
//! crate; see `SPEC_FULL.md` for the full contract.

pub use error::{Error, ErrorKind};
pub use rewrite::{rewrite, RewrittenRequest};

pub mod filter;
pub mod operation;
pub mod rewrite;
pub mod schema;
pub mod value;

mod error;
