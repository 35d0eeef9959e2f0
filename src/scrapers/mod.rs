//! Source document retrieval and parsing.
//!
//! Scraping happens in two steps per URL:
//!
//! 1. **Fetching**: [`fetch`] downloads the raw page ([`fetch::Fetch`] is the
//!    injectable transport, [`fetch::HttpFetcher`] the real one)
//! 2. **Extraction**: [`extract`] parses the page into title, summary and
//!    publication date, falling back through several strategies per field
//!
//! Failed fetches are reported to the caller as [`crate::error::FetchError`]
//! and never abort a run. There are no site-specific parsing rules.

pub mod extract;
pub mod fetch;
