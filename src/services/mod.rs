pub mod courier;
pub mod droid;
pub mod map_scraper;

pub use courier::*;
pub use droid::*;
pub use map_scraper::*;
