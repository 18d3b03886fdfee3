// crates/core/src/lib.rs
//! queryscope-core — the session metrics engine.
//!
//! Scores an observed query-recommendation session on two orthogonal
//! properties:
//!
//! - **coverage** — how much of the schema's structural surface the
//!   recommended queries touched (tables, columns, aggregation operators,
//!   structural clauses);
//! - **cohesion** — how smoothly each chosen query evolves into the next
//!   (five pairwise-transition indices averaged over the session).
//!
//! The engine is a pure batch computation: [`evaluate::evaluate_session`]
//! maps (session log, schema universe) to a [`evaluate::MetricsReport`]
//! with no shared state, and extraction never fails outward — malformed
//! SQL degrades to empty fragment sets.

pub mod cohesion;
pub mod coverage;
pub mod error;
pub mod evaluate;
pub mod extract;
pub mod fragments;
pub mod normalize;
pub mod schema;
pub mod session;

pub use cohesion::{cohesion, CohesionMetrics};
pub use coverage::{coverage, CoverageMetrics, CoverageRatio};
pub use error::{LogError, SchemaError};
pub use evaluate::{evaluate_session, evaluate_session_file, MetricsReport, METRIC_NAMES};
pub use extract::extract;
pub use fragments::{AggregateOp, ClauseKind, FragmentSet};
pub use normalize::clean_sql;
pub use schema::SchemaUniverse;
pub use session::{SessionLog, Turn};
