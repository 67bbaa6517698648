// SPDX-License-Identifier: GPL-3.0-only

//! Outline reduction for detector polygons
//!
//! Detectors that report more than four boundary points can produce
//! non-convex or self-intersecting polygons. Those are replaced by their
//! convex hull before drawing.

use crate::frame_processor::Point;

/// Boundaries longer than this are reduced to their convex hull
const MAX_RAW_OUTLINE_POINTS: usize = 4;

/// Outline to draw for a symbol boundary
pub fn outline_for(boundary: &[Point]) -> Vec<Point> {
    if boundary.len() > MAX_RAW_OUTLINE_POINTS {
        convex_hull(boundary)
    } else {
        boundary.to_vec()
    }
}

/// Convex hull by Andrew's monotone chain
///
/// Vertices are returned counter-clockwise in image coordinates starting from
/// the lowest `(x, y)` point, with collinear points dropped. Degenerate inputs
/// collapse to one or two points.
///
/// The overlay anchors a symbol's label at the first outline vertex, so the
/// start vertex must not depend on the order the decoder reported points in.
/// `imageproc::geometry::convex_hull` makes no promise about its starting
/// vertex and works on its own point type, hence the hand-written chain over
/// [`Point`].
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut sorted = points.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    if sorted.len() < 3 {
        return sorted;
    }

    let mut lower: Vec<Point> = Vec::with_capacity(sorted.len());
    for &p in &sorted {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point> = Vec::with_capacity(sorted.len());
    for &p in sorted.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0 {
            upper.pop();
        }
        upper.push(p);
    }

    // Each chain ends where the other begins
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Z component of `(a - o) x (b - o)`
fn cross(o: Point, a: Point, b: Point) -> i64 {
    let (ox, oy) = (o.x as i64, o.y as i64);
    (a.x as i64 - ox) * (b.y as i64 - oy) - (a.y as i64 - oy) * (b.x as i64 - ox)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(i32, i32)]) -> Vec<Point> {
        raw.iter().copied().map(Point::from).collect()
    }

    #[test]
    fn test_short_boundaries_are_untouched() {
        // Self-intersecting "bow tie" order is kept as given
        let quad = pts(&[(0, 0), (10, 10), (10, 0), (0, 10)]);
        assert_eq!(outline_for(&quad), quad);

        let single = pts(&[(3, 4)]);
        assert_eq!(outline_for(&single), single);
    }

    #[test]
    fn test_interior_points_are_removed() {
        let boundary = pts(&[(0, 0), (5, 5), (10, 0), (10, 10), (2, 3), (0, 10)]);
        let outline = outline_for(&boundary);
        assert_eq!(outline, pts(&[(0, 0), (10, 0), (10, 10), (0, 10)]));
    }

    #[test]
    fn test_hull_is_subset_of_input() {
        let boundary = pts(&[(4, 1), (9, 3), (7, 8), (2, 9), (0, 4), (5, 5), (6, 2)]);
        let outline = outline_for(&boundary);
        assert!(outline.len() <= boundary.len());
        assert!(outline.iter().all(|p| boundary.contains(p)));
        assert!(!outline.contains(&Point::new(5, 5)));
    }

    #[test]
    fn test_duplicates_and_collinear_points() {
        let line = pts(&[(0, 0), (1, 1), (2, 2), (2, 2), (3, 3), (0, 0)]);
        assert_eq!(convex_hull(&line), pts(&[(0, 0), (3, 3)]));

        let same = pts(&[(1, 1), (1, 1), (1, 1), (1, 1), (1, 1)]);
        assert_eq!(outline_for(&same), pts(&[(1, 1)]));
    }

    #[test]
    fn test_start_vertex_ignores_input_order() {
        let mut boundary = pts(&[(9, 3), (7, 8), (2, 9), (0, 4), (5, 5), (4, 1)]);
        for _ in 0..boundary.len() {
            boundary.rotate_left(1);
            let outline = outline_for(&boundary);
            assert_eq!(outline[0], Point::new(0, 4));
        }

        boundary.reverse();
        assert_eq!(outline_for(&boundary)[0], Point::new(0, 4));
    }

    #[test]
    fn test_hull_is_convex() {
        let boundary = pts(&[(0, 0), (8, 1), (3, 3), (9, 9), (1, 7), (4, 12), (-2, 5)]);
        let hull = convex_hull(&boundary);
        let n = hull.len();
        for i in 0..n {
            assert!(cross(hull[i], hull[(i + 1) % n], hull[(i + 2) % n]) > 0);
        }
    }
}
