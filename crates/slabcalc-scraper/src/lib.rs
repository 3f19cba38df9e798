pub mod client;
pub mod error;
pub mod html;
pub mod listing;
pub mod price;
pub mod scroll;
pub mod source;
pub mod webdriver;

pub use client::PageClient;
pub use error::ScraperError;
pub use listing::enumerate_card_urls;
pub use price::extract_card_prices;
pub use scroll::{scroll_to_exhaustion, ScrollOutcome, ScrollSurface};
pub use source::{BrowserListing, PageSource};
pub use webdriver::{WebDriverClient, WebDriverSession};
