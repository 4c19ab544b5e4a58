use imageproc::geometry::approximate_polygon_dp;
use imageproc::point::Point;

/// Douglas-Peucker simplification of a closed contour.
///
/// The loop is split at two mutually distant points, each half is simplified
/// as an open chain, and the halves are joined again. The result lists every
/// vertex once. A non-positive `epsilon` leaves the contour as it is.
pub fn approximate_closed(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    if points.len() < 3 || epsilon.is_nan() || epsilon <= 0.0 {
        return points.to_vec();
    }

    // Anchor on two far-apart points so the result does not depend on where
    // border following started.
    let b = farthest_from(points, 0);
    let a = farthest_from(points, b);
    if distance(points[a], points[b]) <= epsilon {
        return vec![points[a]];
    }

    let mut polygon = approximate_polygon_dp(&cyclic_chain(points, a, b), epsilon, false);
    polygon.pop();
    let mut second_half = approximate_polygon_dp(&cyclic_chain(points, b, a), epsilon, false);
    second_half.pop();
    polygon.extend(second_half);
    polygon
}

/// Points from `from` to `to` (both inclusive), wrapping around the end.
fn cyclic_chain(points: &[Point<i32>], from: usize, to: usize) -> Vec<Point<i32>> {
    let n = points.len();
    let mut chain = Vec::with_capacity(n + 1);
    let mut i = from;
    loop {
        chain.push(points[i]);
        if i == to {
            break;
        }
        i = (i + 1) % n;
    }
    chain
}

fn farthest_from(points: &[Point<i32>], origin: usize) -> usize {
    let o = points[origin];
    let mut best = origin;
    let mut best_dist = 0.0;
    for (i, p) in points.iter().enumerate() {
        let d = distance(o, *p);
        if d > best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

fn distance(a: Point<i32>, b: Point<i32>) -> f64 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use imageproc::geometry::arc_length;

    /// Trace a path through the given corners one pixel at a time.
    fn trace(corners: &[(i32, i32)]) -> Vec<Point<i32>> {
        let mut points = Vec::new();
        for (i, &(x0, y0)) in corners.iter().enumerate() {
            let (x1, y1) = corners[(i + 1) % corners.len()];
            let steps = (x1 - x0).abs().max((y1 - y0).abs());
            for s in 0..steps {
                let x = x0 + (x1 - x0) * s / steps;
                let y = y0 + (y1 - y0) * s / steps;
                points.push(Point::new(x, y));
            }
        }
        points
    }

    #[test]
    fn rectangle_simplifies_to_four_corners() {
        let points = trace(&[(10, 10), (110, 10), (110, 50), (10, 50)]);
        let epsilon = 0.01 * arc_length(&points, true);
        let poly = approximate_closed(&points, epsilon);
        assert_eq!(poly.len(), 4);
        for corner in [(10, 10), (110, 10), (110, 50), (10, 50)] {
            assert!(poly.contains(&Point::new(corner.0, corner.1)), "missing {:?}", corner);
        }
    }

    #[test]
    fn rectangle_start_point_does_not_matter() {
        let mut points = trace(&[(0, 0), (80, 0), (80, 30), (0, 30)]);
        points.rotate_left(57);
        let epsilon = 0.01 * arc_length(&points, true);
        assert_eq!(approximate_closed(&points, epsilon).len(), 4);
    }

    #[test]
    fn chamfered_corners_are_absorbed() {
        let points = trace(&[(2, 0), (98, 0), (100, 2), (100, 38), (98, 40), (2, 40), (0, 38), (0, 2)]);
        let epsilon = 0.01 * arc_length(&points, true);
        assert_eq!(approximate_closed(&points, epsilon).len(), 4);
    }

    #[test]
    fn triangle_keeps_three_vertices() {
        let points = trace(&[(0, 0), (60, 0), (30, 50)]);
        let epsilon = 0.01 * arc_length(&points, true);
        assert_eq!(approximate_closed(&points, epsilon).len(), 3);
    }

    #[test]
    fn octagon_is_not_a_quadrilateral() {
        let points = trace(&[(20, 0), (60, 0), (80, 20), (80, 60), (60, 80), (20, 80), (0, 60), (0, 20)]);
        let epsilon = 0.01 * arc_length(&points, true);
        assert_eq!(approximate_closed(&points, epsilon).len(), 8);
    }

    #[test]
    fn degenerate_inputs() {
        assert!(approximate_closed(&[], 1.0).is_empty());
        let single = vec![Point::new(3, 4)];
        assert_eq!(approximate_closed(&single, 1.0), single);
        let cluster = vec![Point::new(3, 4), Point::new(4, 4), Point::new(4, 5)];
        assert_eq!(approximate_closed(&cluster, 5.0).len(), 1);
    }

    #[test]
    fn zero_tolerance_keeps_every_point() {
        let points = trace(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        assert_eq!(approximate_closed(&points, 0.0), points);
    }
}
