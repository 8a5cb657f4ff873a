use serde::{Deserialize, Serialize};

/// A 2D point in frame pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Even-odd (ray casting) point-in-polygon test.
///
/// The polygon is implicitly closed. Each edge runs from vertex `j` to its
/// successor `i`; a horizontal ray cast from `point` towards +x toggles the
/// result every time it crosses an edge. Points exactly on an edge or vertex
/// may land on either side.
pub fn contains(point: Point, polygon: &[Point]) -> bool {
    let Some(&last) = polygon.last() else {
        return false;
    };

    let mut inside = false;
    let mut prev = last;
    for &cur in polygon {
        // The strict inequality guarantees cur.y != prev.y below.
        if (cur.y > point.y) != (prev.y > point.y) {
            let cross_x = prev.x + (cur.x - prev.x) * (point.y - prev.y) / (cur.y - prev.y);
            if point.x < cross_x {
                inside = !inside;
            }
        }
        prev = cur;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn poly(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&c| Point::from(c)).collect()
    }

    fn triangle() -> Vec<Point> {
        poly(&[(0.0, 0.0), (10.0, 0.0), (5.0, 10.0)])
    }

    fn square() -> Vec<Point> {
        poly(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)])
    }

    /// U-shaped polygon: the notch between x=30..70 above y=40 is outside.
    fn concave_u() -> Vec<Point> {
        poly(&[
            (0.0, 0.0),
            (100.0, 0.0),
            (100.0, 100.0),
            (70.0, 100.0),
            (70.0, 40.0),
            (30.0, 40.0),
            (30.0, 100.0),
            (0.0, 100.0),
        ])
    }

    // ── Convex ───────────────────────────────────────────────────────

    #[rstest]
    #[case::center(5.0, 5.0)]
    #[case::near_base(5.0, 0.5)]
    #[case::near_apex(5.0, 9.0)]
    #[case::left_half(3.0, 2.0)]
    fn test_triangle_inside(#[case] x: f64, #[case] y: f64) {
        assert!(contains(Point::new(x, y), &triangle()));
    }

    #[rstest]
    #[case::far_left(-1000.0, 5.0)]
    #[case::far_right(1000.0, 5.0)]
    #[case::far_above(5.0, 1000.0)]
    #[case::far_below(5.0, -1000.0)]
    #[case::beside_apex(1.0, 9.0)]
    fn test_triangle_outside(#[case] x: f64, #[case] y: f64) {
        assert!(!contains(Point::new(x, y), &triangle()));
    }

    #[test]
    fn test_square_inside_and_outside() {
        let sq = square();
        assert!(contains(Point::new(50.0, 50.0), &sq));
        assert!(contains(Point::new(1.0, 99.0), &sq));
        assert!(!contains(Point::new(101.0, 50.0), &sq));
        assert!(!contains(Point::new(50.0, -0.5), &sq));
    }

    // ── Concave ──────────────────────────────────────────────────────

    #[rstest]
    #[case::left_arm(15.0, 80.0, true)]
    #[case::right_arm(85.0, 80.0, true)]
    #[case::base(50.0, 20.0, true)]
    #[case::notch(50.0, 80.0, false)]
    #[case::outside(150.0, 50.0, false)]
    fn test_concave_polygon(#[case] x: f64, #[case] y: f64, #[case] expected: bool) {
        assert_eq!(contains(Point::new(x, y), &concave_u()), expected);
    }

    // ── Orientation and degenerate input ─────────────────────────────

    #[test]
    fn test_winding_direction_does_not_matter() {
        let mut reversed = square();
        reversed.reverse();
        assert!(contains(Point::new(50.0, 50.0), &reversed));
        assert!(!contains(Point::new(150.0, 50.0), &reversed));
    }

    #[test]
    fn test_empty_polygon_contains_nothing() {
        assert!(!contains(Point::new(0.0, 0.0), &[]));
    }

    #[rstest]
    #[case::bottom_edge(5.0, 0.0)]
    #[case::top_edge(5.0, 10.0)]
    fn test_ray_along_horizontal_edge(#[case] x: f64, #[case] y: f64) {
        // Ray lies exactly on a horizontal edge.
        let sq = poly(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let _ = contains(Point::new(x, y), &sq);
        assert!(contains(Point::new(5.0, 5.0), &sq));
    }

    #[test]
    fn test_negative_coordinates() {
        // region-06 in the demo config dips below y=0
        let p = poly(&[
            (1314.0, 8.0),
            (1543.0, -4.0),
            (1518.0, 543.0),
            (1013.0, 530.0),
            (1204.0, 314.0),
            (1289.0, 144.0),
        ]);
        assert!(contains(Point::new(1400.0, 200.0), &p));
        assert!(!contains(Point::new(1100.0, 100.0), &p));
    }

    #[test]
    fn test_point_serde_as_pair() {
        let p: Point = serde_json::from_str("[3.5, -2]").unwrap();
        assert_eq!(p, Point::new(3.5, -2.0));
        assert_eq!(serde_json::to_string(&p).unwrap(), "[3.5,-2.0]");
    }
}
