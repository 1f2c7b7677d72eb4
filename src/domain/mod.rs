pub mod coordinates;
pub mod listing;
pub mod rating;

use thiserror::Error;

/// Parse failures are recovered per listing: the listing is skipped and
/// the scrape carries on.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("no /@<lat>,<lon> segment in url: {0}")]
    CoordinatesNotInUrl(String),
    #[error("malformed coordinates segment: {0}")]
    BadCoordinates(String),
    #[error("malformed rating label: {0}")]
    BadRatingLabel(String),
}
