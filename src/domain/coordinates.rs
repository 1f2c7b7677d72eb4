use super::ParseError;

/// Pulls (latitude, longitude) out of a maps detail url, which carries
/// the camera position as `.../@31.5203696,74.3587473,17z/...`.
pub fn coordinates_from_url(url: &str) -> Result<(f64, f64), ParseError> {
    let (_, tail) = url
        .rsplit_once("/@")
        .ok_or_else(|| ParseError::CoordinatesNotInUrl(url.to_string()))?;

    let segment = match tail.split_once('/') {
        Some((coordinates, _)) => coordinates,
        None => tail,
    };

    match segment.split(',').collect::<Vec<&str>>().as_slice() {
        [latitude, longitude, ..] => {
            let latitude = latitude
                .parse::<f64>()
                .map_err(|_| ParseError::BadCoordinates(segment.to_string()))?;
            let longitude = longitude
                .parse::<f64>()
                .map_err(|_| ParseError::BadCoordinates(segment.to_string()))?;
            Ok((latitude, longitude))
        }
        _ => Err(ParseError::BadCoordinates(segment.to_string())),
    }
}
