use crate::model::ShapePoint;

/// Sort shape points ascending by sequence number.
///
/// The sort is stable, so points sharing a sequence number keep the order the
/// provider delivered them in.
pub fn sort_by_sequence(mut points: Vec<ShapePoint>) -> Vec<ShapePoint> {
    points.sort_by_key(|point| point.shape_pt_sequence);
    points
}

/// Convert shape points to `[lat, lon]` pairs.
pub fn to_polyline(points: &[ShapePoint]) -> Vec<[f64; 2]> {
    points
        .iter()
        .map(|point| [point.shape_pt_lat, point.shape_pt_lon])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_by_sequence_and_keeps_ties_stable() {
        let points = vec![
            ShapePoint::new(3.0, 3.0, 30),
            ShapePoint::new(1.0, 1.0, 10),
            ShapePoint::new(2.0, 2.0, 20),
            ShapePoint::new(2.5, 2.5, 20),
        ];
        let sorted = sort_by_sequence(points);
        let lats: Vec<f64> = sorted.iter().map(|p| p.shape_pt_lat).collect();
        assert_eq!(lats, vec![1.0, 2.0, 2.5, 3.0]);
    }

    #[test]
    fn polyline_is_lat_lon_pairs() {
        let points = vec![ShapePoint::new(44.1, 26.1, 1), ShapePoint::new(44.2, 26.2, 2)];
        assert_eq!(to_polyline(&points), vec![[44.1, 26.1], [44.2, 26.2]]);
    }
}
