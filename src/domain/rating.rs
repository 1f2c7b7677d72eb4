use super::ParseError;

/// Review summary as carried by the result card's accessibility label,
/// e.g. `"4,6 stars 1.234 reviews"`. The average uses the page locale's
/// decimal separator and the count may carry thousands separators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rating {
    pub average: f64,
    pub count: u64,
}

pub fn parse_rating_label(label: &str) -> Result<Rating, ParseError> {
    match label.split_whitespace().collect::<Vec<&str>>().as_slice() {
        [average, _, count, ..] => {
            let average = average
                .replace(',', ".")
                .parse::<f64>()
                .map_err(|_| ParseError::BadRatingLabel(label.to_string()))?;
            let count = count
                .replace([',', '.'], "")
                .parse::<u64>()
                .map_err(|_| ParseError::BadRatingLabel(label.to_string()))?;

            Ok(Rating { average, count })
        }
        _ => Err(ParseError::BadRatingLabel(label.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_rating_label, Rating};
    use crate::domain::ParseError;

    #[test]
    fn locale_comma_average_and_dotted_count() {
        let result = parse_rating_label("4,5 stars 1.234 reviews");

        assert_eq!(
            result,
            Ok(Rating {
                average: 4.5,
                count: 1234,
            })
        );
    }

    #[test]
    fn english_locale_label() {
        let result = parse_rating_label("4.8 stars 12,391 reviews");

        assert_eq!(
            result,
            Ok(Rating {
                average: 4.8,
                count: 12391,
            })
        );
    }

    #[test]
    fn small_shop_with_a_handful_of_reviews() {
        let result = parse_rating_label("5,0 stars 7 reviews");

        assert_eq!(
            result,
            Ok(Rating {
                average: 5.0,
                count: 7,
            })
        );
    }

    #[test]
    fn label_without_a_count_is_rejected() {
        let result = parse_rating_label("No reviews");

        assert!(matches!(result, Err(ParseError::BadRatingLabel(_))));
    }

    #[test]
    fn word_salad_is_rejected() {
        let result = parse_rating_label("four stars many reviews");

        assert!(matches!(result, Err(ParseError::BadRatingLabel(_))));
    }
}
