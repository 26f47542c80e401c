pub mod client;
pub mod error;
pub mod extract;
pub mod links;
pub mod types;

pub use client::{ContentFetcher, PageFetcher};
pub use error::FetchError;
pub use extract::{extract_page, NO_TITLE};
pub use links::links_from_html;
pub use types::FetchedPage;
