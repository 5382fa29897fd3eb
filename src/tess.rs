//! Polygon tessellation for the WEBGL fill path.
//!
//! Ear clipping over simple polygons with optional interior contours as
//! holes. Holes are eliminated first by bridging each one to a visible
//! vertex of the outer ring (turning the polygon-with-holes into a single
//! convex-free ring with duplicated bridge vertices), then the ring is
//! clipped one ear at a time.
//!
//! Input is a list of contours whose vertices are indexed by
//! concatenation order, so the returned triangle indices line up with a
//! vertex buffer that appended the contours in the same order. The
//! tessellation is planar over x/y; z is carried through untouched by the
//! caller. Degenerate input (collinear runs, repeated points, rings with
//! fewer than three vertices) produces fewer or zero triangles, never an
//! error.

use crate::basics::PointD;
use crate::math::{calc_sq_distance, point_in_triangle};

/// Twice the signed area of triangle a, b, c (positive = counter-clockwise).
#[inline]
fn area2(a: PointD, b: PointD, c: PointD) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Signed area of a ring described by indices into `pts`.
fn ring_area(pts: &[PointD], ring: &[u32]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    let mut j = n - 1;
    for i in 0..n {
        let pj = pts[ring[j] as usize];
        let pi = pts[ring[i] as usize];
        sum += pj.x * pi.y - pi.x * pj.y;
        j = i;
    }
    sum * 0.5
}

/// Strict (proper) segment intersection: the open segments cross.
fn segments_cross(a: PointD, b: PointD, c: PointD, d: PointD) -> bool {
    let d1 = area2(c, d, a);
    let d2 = area2(c, d, b);
    let d3 = area2(a, b, c);
    let d4 = area2(a, b, d);
    (d1 > 0.0) != (d2 > 0.0) && (d3 > 0.0) != (d4 > 0.0)
}

/// Even-odd point-in-ring test.
fn point_in_ring(pts: &[PointD], ring: &[u32], p: PointD) -> bool {
    let n = ring.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = pts[ring[i] as usize];
        let b = pts[ring[j] as usize];
        if (a.y > p.y) != (b.y > p.y) {
            let x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Triangulate a simple polygon with optional holes.
///
/// `contours[0]` is the outer boundary; the rest are holes. Returns
/// triangle indices in concatenation order (outer vertices first, then
/// each hole's, in input order).
pub fn triangulate(contours: &[Vec<PointD>]) -> Vec<u32> {
    let Some(outer) = contours.first() else {
        return Vec::new();
    };
    if outer.len() < 3 {
        return Vec::new();
    }

    // flatten to one point table; remember each contour's base index
    let mut pts: Vec<PointD> = Vec::new();
    let mut bases: Vec<u32> = Vec::new();
    for c in contours {
        bases.push(pts.len() as u32);
        pts.extend_from_slice(c);
    }

    // outer ring, forced counter-clockwise
    let mut ring: Vec<u32> = (0..outer.len() as u32).collect();
    if ring_area(&pts, &ring) < 0.0 {
        ring.reverse();
    }

    // hole rings, forced clockwise, bridged rightmost-first
    let mut hole_rings: Vec<Vec<u32>> = Vec::new();
    for (ci, c) in contours.iter().enumerate().skip(1) {
        if c.len() < 3 {
            continue;
        }
        let base = bases[ci];
        let mut hr: Vec<u32> = (base..base + c.len() as u32).collect();
        if ring_area(&pts, &hr) > 0.0 {
            hr.reverse();
        }
        hole_rings.push(hr);
    }
    hole_rings.sort_by(|a, b| {
        let ax = a.iter().map(|&i| pts[i as usize].x).fold(f64::MIN, f64::max);
        let bx = b.iter().map(|&i| pts[i as usize].x).fold(f64::MIN, f64::max);
        bx.partial_cmp(&ax).unwrap_or(std::cmp::Ordering::Equal)
    });
    for hr in &hole_rings {
        bridge_hole(&pts, &mut ring, hr, contours);
    }

    ear_clip(&pts, ring)
}

/// Splice a hole ring into the outer ring through a mutually visible
/// vertex pair.
fn bridge_hole(pts: &[PointD], ring: &mut Vec<u32>, hole: &[u32], contours: &[Vec<PointD>]) {
    // hole vertex with maximum x is guaranteed to see some outer vertex
    let Some((m_pos, _)) = hole.iter().enumerate().max_by(|(_, &a), (_, &b)| {
        pts[a as usize]
            .x
            .partial_cmp(&pts[b as usize].x)
            .unwrap_or(std::cmp::Ordering::Equal)
    }) else {
        return;
    };
    let m = pts[hole[m_pos] as usize];

    // candidate bridge targets, nearest first, visibility-tested against
    // every contour edge
    let mut candidates: Vec<usize> = (0..ring.len()).collect();
    candidates.sort_by(|&i, &j| {
        let di = calc_sq_distance(m.x, m.y, pts[ring[i] as usize].x, pts[ring[i] as usize].y);
        let dj = calc_sq_distance(m.x, m.y, pts[ring[j] as usize].x, pts[ring[j] as usize].y);
        di.partial_cmp(&dj).unwrap_or(std::cmp::Ordering::Equal)
    });

    let target = candidates
        .into_iter()
        .find(|&k| bridge_is_visible(contours, m, pts[ring[k] as usize]))
        .unwrap_or(0);

    // splice: ..target, [hole from m around], m again, target again, rest
    let mut merged: Vec<u32> = Vec::with_capacity(ring.len() + hole.len() + 2);
    merged.extend_from_slice(&ring[..=target]);
    for off in 0..hole.len() {
        merged.push(hole[(m_pos + off) % hole.len()]);
    }
    merged.push(hole[m_pos]);
    merged.extend_from_slice(&ring[target..]);
    *ring = merged;
}

/// A bridge segment is usable when it crosses no contour edge.
fn bridge_is_visible(contours: &[Vec<PointD>], from: PointD, to: PointD) -> bool {
    if from == to {
        return false;
    }
    for c in contours {
        let n = c.len();
        if n < 2 {
            continue;
        }
        let mut j = n - 1;
        for i in 0..n {
            let a = c[j];
            let b = c[i];
            j = i;
            // edges sharing an endpoint with the bridge cannot occlude it
            if a == from || a == to || b == from || b == to {
                continue;
            }
            if segments_cross(from, to, a, b) {
                return false;
            }
        }
    }
    true
}

/// Clip ears off a counter-clockwise ring until only one triangle is left.
fn ear_clip(pts: &[PointD], mut ring: Vec<u32>) -> Vec<u32> {
    let mut triangles = Vec::new();
    // remove immediately repeated vertices left over from degenerate input
    ring.dedup_by(|a, b| pts[*a as usize] == pts[*b as usize]);
    if ring.len() >= 2 && ring.last().map(|&l| pts[l as usize]) == Some(pts[ring[0] as usize]) {
        ring.pop();
    }

    while ring.len() > 3 {
        let n = ring.len();
        let mut clipped = false;
        for i in 0..n {
            let ip = (i + n - 1) % n;
            let inx = (i + 1) % n;
            let (a, b, c) = (
                pts[ring[ip] as usize],
                pts[ring[i] as usize],
                pts[ring[inx] as usize],
            );
            if area2(a, b, c) <= 0.0 {
                continue; // reflex or degenerate corner
            }
            // reject the ear if any other ring vertex lies inside it
            let mut blocked = false;
            for (k, &idx) in ring.iter().enumerate() {
                if k == ip || k == i || k == inx {
                    continue;
                }
                let p = pts[idx as usize];
                if p == a || p == b || p == c {
                    continue; // duplicated bridge vertex
                }
                if point_in_triangle(a.x, a.y, b.x, b.y, c.x, c.y, p.x, p.y) {
                    blocked = true;
                    break;
                }
            }
            if blocked {
                continue;
            }
            triangles.extend([ring[ip], ring[i], ring[inx]]);
            ring.remove(i);
            clipped = true;
            break;
        }
        if !clipped {
            // numerically stuck (degenerate geometry): drop the flattest
            // corner and keep going rather than failing
            let n = ring.len();
            let flattest = (0..n)
                .min_by(|&i, &j| {
                    let ai = area2(
                        pts[ring[(i + n - 1) % n] as usize],
                        pts[ring[i] as usize],
                        pts[ring[(i + 1) % n] as usize],
                    )
                    .abs();
                    let aj = area2(
                        pts[ring[(j + n - 1) % n] as usize],
                        pts[ring[j] as usize],
                        pts[ring[(j + 1) % n] as usize],
                    )
                    .abs();
                    ai.partial_cmp(&aj).unwrap_or(std::cmp::Ordering::Equal)
                })
                .unwrap_or(0);
            ring.remove(flattest);
        }
    }
    if ring.len() == 3 {
        let (a, b, c) = (
            pts[ring[0] as usize],
            pts[ring[1] as usize],
            pts[ring[2] as usize],
        );
        if area2(a, b, c).abs() > 0.0 {
            triangles.extend([ring[0], ring[1], ring[2]]);
        }
    }
    triangles
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, s: f64) -> Vec<PointD> {
        vec![
            PointD::new(x, y),
            PointD::new(x + s, y),
            PointD::new(x + s, y + s),
            PointD::new(x, y + s),
        ]
    }

    fn tri_area_sum(pts: &[PointD], tris: &[u32]) -> f64 {
        tris.chunks(3)
            .map(|t| {
                area2(
                    pts[t[0] as usize],
                    pts[t[1] as usize],
                    pts[t[2] as usize],
                )
                .abs()
                    * 0.5
            })
            .sum()
    }

    #[test]
    fn test_triangle_passthrough() {
        let tris = triangulate(&[vec![
            PointD::new(0.0, 0.0),
            PointD::new(4.0, 0.0),
            PointD::new(0.0, 4.0),
        ]]);
        assert_eq!(tris.len(), 3);
    }

    #[test]
    fn test_square_two_triangles() {
        let contour = square(0.0, 0.0, 10.0);
        let tris = triangulate(&[contour.clone()]);
        assert_eq!(tris.len(), 6);
        assert!((tri_area_sum(&contour, &tris) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_clockwise_input_is_normalized() {
        let mut contour = square(0.0, 0.0, 10.0);
        contour.reverse();
        let tris = triangulate(&[contour.clone()]);
        assert_eq!(tris.len(), 6);
        assert!((tri_area_sum(&contour, &tris) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_concave_polygon() {
        // L shape: 6 vertices, 4 triangles
        let contour = vec![
            PointD::new(0.0, 0.0),
            PointD::new(10.0, 0.0),
            PointD::new(10.0, 4.0),
            PointD::new(4.0, 4.0),
            PointD::new(4.0, 10.0),
            PointD::new(0.0, 10.0),
        ];
        let tris = triangulate(&[contour.clone()]);
        assert_eq!(tris.len(), 4 * 3);
        assert!((tri_area_sum(&contour, &tris) - 64.0).abs() < 1e-9);
    }

    #[test]
    fn test_polygon_with_hole() {
        let outer = square(0.0, 0.0, 10.0);
        let hole = square(4.0, 4.0, 2.0);
        let contours = vec![outer.clone(), hole.clone()];
        let tris = triangulate(&contours);
        let mut pts = outer;
        pts.extend(hole);
        // area = 100 - 4, and every index must reference the point table
        assert!((tri_area_sum(&pts, &tris) - 96.0).abs() < 1e-9);
        assert!(tris.iter().all(|&i| (i as usize) < pts.len()));
    }

    #[test]
    fn test_two_holes() {
        let outer = square(0.0, 0.0, 20.0);
        let h1 = square(2.0, 2.0, 3.0);
        let h2 = square(12.0, 12.0, 4.0);
        let contours = vec![outer.clone(), h1.clone(), h2.clone()];
        let tris = triangulate(&contours);
        let mut pts = outer;
        pts.extend(h1);
        pts.extend(h2);
        assert!((tri_area_sum(&pts, &tris) - (400.0 - 9.0 - 16.0)).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_inputs_do_not_error() {
        assert!(triangulate(&[]).is_empty());
        assert!(triangulate(&[vec![PointD::new(0.0, 0.0), PointD::new(1.0, 1.0)]]).is_empty());
        // repeated points collapse
        let tris = triangulate(&[vec![
            PointD::new(0.0, 0.0),
            PointD::new(0.0, 0.0),
            PointD::new(5.0, 0.0),
            PointD::new(5.0, 5.0),
        ]]);
        assert_eq!(tris.len(), 3);
    }
}
