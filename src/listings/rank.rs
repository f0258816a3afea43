use super::repo::Listing;
use crate::geo::distance_km;

/// A listing annotated with its distance from the reference coordinate.
/// Lives only for the duration of one listings query.
#[derive(Debug, Clone)]
pub struct ScoredListing {
    pub listing: Listing,
    pub distance_km: f64,
}

/// Score every listing against the reference coordinate and order by
/// ascending distance. The sort is stable, so equal distances keep their
/// input order and pagination stays consistent across pages.
pub fn rank_by_distance(listings: Vec<Listing>, ref_lat: f64, ref_lon: f64) -> Vec<ScoredListing> {
    let mut scored: Vec<ScoredListing> = listings
        .into_iter()
        .map(|listing| ScoredListing {
            distance_km: distance_km(ref_lat, ref_lon, listing.latitude, listing.longitude),
            listing,
        })
        .collect();
    scored.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    scored
}

/// Slice an ordered sequence into a 1-based page. Pages below 1 clamp to 1;
/// an offset past the end yields an empty page, not an error.
pub fn paginate<T>(items: Vec<T>, page: i64, per_page: i64) -> Vec<T> {
    let page = page.max(1);
    let per_page = per_page.max(0);
    let offset = ((page - 1) * per_page) as usize;
    items
        .into_iter()
        .skip(offset)
        .take(per_page as usize)
        .collect()
}
