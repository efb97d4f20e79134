//! Aggregation engine — derived restaurant statistics
//!
//! Average rating and review count are never persisted; they are computed
//! fresh on every read from the raw review rows. Both storage backends go
//! through these functions, which is what guarantees backend parity: the
//! SQLite backend never lets `AVG`/`GROUP BY` rounding reach an observable
//! result.

use shared::models::{Restaurant, RestaurantFilter, RestaurantWithStats};

/// Mean of the ratings rounded to one decimal; `0.0` with no reviews.
pub fn average_rating(ratings: &[i64]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let mean = ratings.iter().sum::<i64>() as f64 / ratings.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// Attach computed stats to a restaurant.
pub fn with_stats(restaurant: Restaurant, ratings: &[i64]) -> RestaurantWithStats {
    RestaurantWithStats {
        average_rating: average_rating(ratings),
        review_count: ratings.len() as i64,
        is_bookmarked: None,
        restaurant,
    }
}

/// Genre filter (exact, case-sensitive; `"all"`/empty = no filter)
/// intersected with the free-text search filter.
pub fn matches_filter(restaurant: &Restaurant, filter: &RestaurantFilter) -> bool {
    if let Some(genre) = filter.genre.as_deref()
        && !genre.is_empty()
        && genre != "all"
        && restaurant.genre != genre
    {
        return false;
    }
    if let Some(term) = filter.search.as_deref()
        && !term.trim().is_empty()
        && !matches_search(restaurant, term)
    {
        return false;
    }
    true
}

/// Case-insensitive substring match, OR across name / description / genre
/// ("any field contains the term").
pub fn matches_search(restaurant: &Restaurant, term: &str) -> bool {
    let term = term.to_lowercase();
    let contains = |s: &str| s.to_lowercase().contains(&term);
    contains(&restaurant.name)
        || restaurant.description.as_deref().is_some_and(contains)
        || contains(&restaurant.genre)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restaurant(name: &str, genre: &str, description: Option<&str>) -> Restaurant {
        Restaurant {
            id: 1,
            name: name.to_string(),
            genre: genre.to_string(),
            address: "1-2-3 Ekimae".to_string(),
            phone: None,
            description: description.map(|s| s.to_string()),
            image_url: None,
            latitude: None,
            longitude: None,
            hours: None,
            price_range: None,
            features: vec![],
            is_open: true,
            created_at: 0,
        }
    }

    #[test]
    fn average_of_five_and_four_is_four_point_five() {
        // The MESO scenario: ratings [5, 4] → 4.5
        assert_eq!(average_rating(&[5, 4]), 4.5);
    }

    #[test]
    fn average_defaults_to_zero_without_reviews() {
        assert_eq!(average_rating(&[]), 0.0);
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        assert_eq!(average_rating(&[5, 4, 4]), 4.3); // 13/3 = 4.333…
        assert_eq!(average_rating(&[5, 5, 4]), 4.7); // 14/3 = 4.666…
        assert_eq!(average_rating(&[1]), 1.0);
    }

    #[test]
    fn with_stats_counts_reviews() {
        let s = with_stats(restaurant("MESO", "ramen", None), &[5, 4]);
        assert_eq!(s.review_count, 2);
        assert_eq!(s.average_rating, 4.5);
        assert!(s.is_bookmarked.is_none());
    }

    #[test]
    fn search_is_or_across_fields() {
        // Term matches genre only — must still pass (OR, not AND)
        let r = restaurant("MESO", "ramen", Some("late night counter"));
        assert!(matches_search(&r, "ramen"));
        assert!(matches_search(&r, "meso"));
        assert!(matches_search(&r, "NIGHT"));
        assert!(!matches_search(&r, "sushi"));
    }

    #[test]
    fn search_tolerates_missing_description() {
        let r = restaurant("MESO", "ramen", None);
        assert!(matches_search(&r, "meso"));
        assert!(!matches_search(&r, "counter"));
    }

    #[test]
    fn genre_filter_is_exact_and_case_sensitive() {
        let r = restaurant("MESO", "ramen", None);
        let pass = RestaurantFilter {
            genre: Some("ramen".into()),
            search: None,
        };
        let wrong_case = RestaurantFilter {
            genre: Some("Ramen".into()),
            search: None,
        };
        let all = RestaurantFilter {
            genre: Some("all".into()),
            search: None,
        };
        assert!(matches_filter(&r, &pass));
        assert!(!matches_filter(&r, &wrong_case));
        assert!(matches_filter(&r, &all));
        assert!(matches_filter(&r, &RestaurantFilter::default()));
    }

    #[test]
    fn genre_and_search_intersect() {
        let r = restaurant("MESO", "ramen", None);
        let f = RestaurantFilter {
            genre: Some("ramen".into()),
            search: Some("sushi".into()),
        };
        assert!(!matches_filter(&r, &f));
    }
}
