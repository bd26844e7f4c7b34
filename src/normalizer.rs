use crate::model::PricePoint;

/// Sorts points ascending by date and keeps one point per calendar day.
/// When a day appears twice the later observation wins.
pub fn normalize_points(points: &mut Vec<PricePoint>) {
    points.sort_by_key(|p| p.date);

    let mut normalized: Vec<PricePoint> = Vec::with_capacity(points.len());
    for point in points.drain(..) {
        match normalized.last_mut() {
            Some(last) if last.date.date_naive() == point.date.date_naive() => {
                *last = point; // same day: keep the latest sample
            }
            _ => normalized.push(point),
        }
    }

    *points = normalized;
}
