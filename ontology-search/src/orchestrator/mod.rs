//! Search orchestrator: concurrent source queries, curation, response.
//!
//! This module fans a request out to every requested source, combines the
//! harmonised records in resolution order, deduplicates and validates them,
//! and assembles the final response with credentials redacted.

pub mod aggregate;
pub mod context;
pub mod curate;
pub mod response;

pub use aggregate::run;
pub use context::RequestContext;
pub use response::SearchResponse;
