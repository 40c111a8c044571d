//! Client-side behavior of the journal site.
//!
//! Page state (search session, recommendation panel), the hero
//! illustration loader and the HTTP client of the remote functions.

pub mod api;
pub mod cache;
mod card;
mod hero;
mod notification;
mod panel;
mod search;

pub use api::{FunctionsClient, IllustrationSource, RecommendationSource};
pub use cache::{FileCache, KeyValueCache, MemoryCache};
pub use card::copy_citation_for;
pub use hero::{HeroIllustration, HeroLoader};
pub use notification::{Notification, Variant};
pub use panel::{RecommendationPanel, RequestToken};
pub use search::SearchSession;
