//! Query construction for widgets

pub mod builder;
pub mod canonical;
pub mod types;

pub use builder::{QueryBuilder, QueryPlan, DATE_FIELD};
pub use canonical::{canonicalize, to_canonical_string};
pub use types::{AggregationClause, BoolQuery, EsQuery, RangeParams, SearchBody};
