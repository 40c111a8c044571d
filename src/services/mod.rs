//! Service layer for the journal application.
//!
//! This module contains the business logic for:
//! - Catalog search (`search_journals`)
//! - Citation formatting and clipboard export (`generate_citation`)
//! - Per-client request quotas (`FixedWindowLimiter`)
//! - Thesis recommendations (`Recommender`)
//! - The shared hero illustration (`IllustrationService`)

pub mod citation;
pub mod illustration;
pub mod rate_limit;
pub mod recommend;
pub mod search;

pub use citation::{
    Clipboard, MemoryClipboard, SystemClipboard, copy_citation, generate_citation,
    generate_citation_named,
};
pub use illustration::{IllustrationService, decode_data_url};
pub use rate_limit::{
    Clock, FixedWindowLimiter, ManualClock, RateDecision, RateLimitStore, SystemClock,
};
pub use recommend::{Recommender, ThesisQuery, parse_reply, validate_request};
pub use search::search_journals;
