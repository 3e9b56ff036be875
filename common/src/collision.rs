use crate::Point;

/// Returns true if `point` is outside the arena or lies on any segment of `paths`.
///
/// The arena is inclusive on both ends: `0..=width` by `0..=height`.
pub fn is_collision(point: Point, paths: &[Vec<Point>], width: i32, height: i32) -> bool {
    is_out_of_bounds(point, width, height) || hits_any_segment(point, paths)
}

pub fn is_out_of_bounds(point: Point, width: i32, height: i32) -> bool {
    point.x < 0 || point.x > width || point.y < 0 || point.y > height
}

/// Segment test only. A path with fewer than two points has no segments.
pub fn hits_any_segment(point: Point, paths: &[Vec<Point>]) -> bool {
    paths.iter().any(|path| {
        path.windows(2).any(|pair| on_segment(point, pair[0], pair[1]))
    })
}

/// Segments are axis-aligned since players only ever move in cardinal
/// directions.
fn on_segment(point: Point, start: Point, end: Point) -> bool {
    if start.x == end.x {
        // Vertical (or a degenerate single point)
        point.x == start.x && point.y >= start.y.min(end.y) && point.y <= start.y.max(end.y)
    } else {
        point.y == start.y && point.x >= start.x.min(end.x) && point.x <= start.x.max(end.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_out_of_bounds_always_collides() {
        for point in [p(-10, 50), p(510, 50), p(50, -1), p(50, 301)] {
            assert!(is_collision(point, &[], 500, 300), "{:?} should be out of bounds", point);
        }
        // Border lines themselves are still inside
        assert!(!is_collision(p(0, 0), &[], 500, 300));
        assert!(!is_collision(p(500, 300), &[], 500, 300));
    }

    #[test]
    fn test_vertical_segment_inclusive_range() {
        let paths = vec![vec![p(100, 40), p(100, 10)]];
        assert!(is_collision(p(100, 10), &paths, 500, 500));
        assert!(is_collision(p(100, 25), &paths, 500, 500));
        assert!(is_collision(p(100, 40), &paths, 500, 500));
        assert!(!is_collision(p(100, 50), &paths, 500, 500));
        assert!(!is_collision(p(110, 25), &paths, 500, 500));
    }

    #[test]
    fn test_horizontal_segment_inclusive_range() {
        let paths = vec![vec![p(60, 200), p(20, 200)]];
        assert!(is_collision(p(20, 200), &paths, 500, 500));
        assert!(is_collision(p(40, 200), &paths, 500, 500));
        assert!(is_collision(p(60, 200), &paths, 500, 500));
        assert!(!is_collision(p(70, 200), &paths, 500, 500));
        assert!(!is_collision(p(40, 210), &paths, 500, 500));
    }

    #[test]
    fn test_degenerate_segment_is_point_equality() {
        let paths = vec![vec![p(30, 30), p(30, 30)]];
        assert!(is_collision(p(30, 30), &paths, 100, 100));
        assert!(!is_collision(p(30, 40), &paths, 100, 100));
        assert!(!is_collision(p(40, 30), &paths, 100, 100));
    }

    #[test]
    fn test_single_point_path_cannot_be_hit() {
        let paths = vec![vec![p(30, 30)], Vec::new()];
        assert!(!is_collision(p(30, 30), &paths, 100, 100));
        assert!(!is_collision(p(30, 30), &[], 100, 100));
    }

    #[test]
    fn test_multi_segment_path() {
        // East then South then West
        let paths = vec![vec![p(0, 0), p(50, 0), p(50, 50), p(20, 50)]];
        assert!(is_collision(p(30, 0), &paths, 100, 100));
        assert!(is_collision(p(50, 30), &paths, 100, 100));
        assert!(is_collision(p(20, 50), &paths, 100, 100));
        assert!(!is_collision(p(10, 50), &paths, 100, 100));
        assert!(!is_collision(p(30, 30), &paths, 100, 100));
    }
}
