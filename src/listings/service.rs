use sqlx::PgPool;

use super::dto::{ListingItem, ListingPage};
use super::rank::{paginate, rank_by_distance};
use super::repo::Listing;

/// Load a user's full listing set, rank it against the reference
/// coordinate, and slice out the requested page. Ranking and pagination
/// happen in memory: the sort key is computed, not stored.
pub async fn get_listings(
    db: &PgPool,
    user_id: i64,
    latitude: f64,
    longitude: f64,
    page: i64,
    per_page: i64,
) -> anyhow::Result<ListingPage> {
    let listings = Listing::all_by_user(db, user_id).await?;
    Ok(rank_and_page(listings, latitude, longitude, page, per_page))
}

fn rank_and_page(
    listings: Vec<Listing>,
    latitude: f64,
    longitude: f64,
    page: i64,
    per_page: i64,
) -> ListingPage {
    let ranked = rank_by_distance(listings, latitude, longitude);
    let data = paginate(ranked, page, per_page)
        .into_iter()
        .map(|scored| ListingItem {
            id: scored.listing.id,
            name: scored.listing.name,
            distance: format!("{:.2}", scored.distance_km),
            created_at: scored.listing.created_at,
            updated_at: scored.listing.updated_at,
        })
        .collect();
    ListingPage {
        current_page: page.max(1),
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn listing(id: i64, name: &str, latitude: f64, longitude: f64) -> Listing {
        Listing {
            id,
            name: name.into(),
            description: None,
            latitude,
            longitude,
            user_id: 1,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    // The seed set around Kuala Lumpur.
    fn seed() -> Vec<Listing> {
        vec![
            listing(1, "Starbucks Mid Valley", 3.1189, 101.6767),
            listing(2, "Burger King", 3.1205, 101.6785),
            listing(3, "Pizza Hut", 3.158, 101.7123),
        ]
    }

    #[test]
    fn nearest_listing_comes_first() {
        // Reference point right on top of Burger King.
        let page = rank_and_page(seed(), 3.1205, 101.6785, 1, 10);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.data.len(), 3);
        assert_eq!(page.data[0].id, 2);
        assert_eq!(page.data[0].distance, "0.00");
        assert_eq!(page.data[1].id, 1);
        assert_eq!(page.data[2].id, 3);
    }

    #[test]
    fn distance_is_a_two_decimal_string() {
        let page = rank_and_page(seed(), 3.1189, 101.6767, 1, 10);
        for item in &page.data {
            let parts: Vec<&str> = item.distance.split('.').collect();
            assert_eq!(parts.len(), 2, "distance {:?} is not decimal", item.distance);
            assert_eq!(parts[1].len(), 2, "distance {:?} is not two-decimal", item.distance);
        }
        // Starbucks to Burger King is the sub-kilometer reference pair.
        assert_eq!(page.data[0].distance, "0.00");
        assert_eq!(page.data[1].distance, "0.27");
    }

    #[test]
    fn summary_shape_has_no_coordinates() {
        let page = rank_and_page(seed(), 3.1189, 101.6767, 1, 10);
        let json = serde_json::to_value(&page).unwrap();
        let first = &json["data"][0];
        assert!(first.get("latitude").is_none());
        assert!(first.get("longitude").is_none());
        assert!(first.get("description").is_none());
        assert!(first.get("id").is_some());
        assert!(first.get("distance").is_some());
        assert!(first.get("created_at").is_some());
        assert!(first.get("updated_at").is_some());
        // No totals on the mobile envelope.
        assert!(json.get("total").is_none());
        assert_eq!(json["current_page"], 1);
    }

    #[test]
    fn paging_beyond_the_owned_set_is_empty() {
        let page = rank_and_page(seed(), 3.1189, 101.6767, 3, 10);
        assert_eq!(page.current_page, 3);
        assert!(page.data.is_empty());
    }

    #[test]
    fn second_page_continues_the_ranking() {
        let page1 = rank_and_page(seed(), 3.1205, 101.6785, 1, 2);
        let page2 = rank_and_page(seed(), 3.1205, 101.6785, 2, 2);
        assert_eq!(page1.data.len(), 2);
        assert_eq!(page2.data.len(), 1);
        assert_eq!(page2.data[0].id, 3);
    }
}
