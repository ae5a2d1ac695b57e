//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageOutcome`: what is known about one page (pending, loaded, load error)
//! - `PageRecord`: a canonical URL and its outcome
//! - `LinkRef` / `PageDetails`: the references extracted from a loaded page
//! - `CrawlState`: the lifecycle of a crawl engine

mod crawl_state;
mod page;

// Re-export main types
pub use crawl_state::CrawlState;
pub use page::{LinkRef, PageDetails, PageOutcome, PageRecord};
