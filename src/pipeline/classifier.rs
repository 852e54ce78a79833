//! Stage 5: classify every edge incident to a crossing, and every edge of
//! every non-intersected face, by boundary value relative to the other
//! polygon; then tag boundary-boundary chains with an overlap direction
//! (spec §4.5).

use ahash::AHashSet;

use crate::dcel::{EdgeId, FaceId, Polygon};
use crate::tolerance::{BoundaryValue, Tolerance};

use super::{face_runs, Crossings, CrossingRecord};

pub fn classify(a: &mut Polygon, b: &mut Polygon, crossings: &mut Crossings, tol: &Tolerance) {
    classify_non_intersected_faces(a, b, &crossings.p, tol);
    classify_non_intersected_faces(b, a, &crossings.q, tol);

    classify_incident_edges(a, b, &crossings.p, tol);
    classify_incident_edges(b, a, &crossings.q, tol);

    classify_overlaps(a, b, crossings, tol);
}

/// Step 1: faces with no crossings on them get one `bv` for their whole
/// boundary, from a single representative point.
fn classify_non_intersected_faces(poly: &mut Polygon, other: &Polygon, records: &[CrossingRecord], tol: &Tolerance) {
    let crossed: AHashSet<FaceId> = records.iter().filter_map(|r| r.face).collect();
    let faces: Vec<FaceId> = poly.face_ids().filter(|f| !crossed.contains(f)).collect();
    for face in faces {
        poly.classify_face(face, other, tol);
    }
}

/// Step 2: edges touching a crossing get their boundary endpoints marked
/// and a freshly computed `bv`.
fn classify_incident_edges(poly: &mut Polygon, other: &Polygon, records: &[CrossingRecord], tol: &Tolerance) {
    for r in records {
        for e in [r.edge_before, r.edge_after].into_iter().flatten() {
            poly.edge_mut(e).clear_classification();
        }
        if let Some(eb) = r.edge_before {
            poly.edge_mut(eb).bv_end = BoundaryValue::Boundary;
            poly.classify_edge(eb, other, tol);
        }
        if let Some(ea) = r.edge_after {
            poly.edge_mut(ea).bv_start = BoundaryValue::Boundary;
            poly.classify_edge(ea, other, tol);
        }
    }
}

/// Step 3: for every single-edge boundary-boundary chain between two
/// adjacent crossings on A, find the matching chain on B (trying both
/// pairing directions) and set the direction-comparison overlap flag.
fn classify_overlaps(a: &mut Polygon, b: &mut Polygon, crossings: &mut Crossings, tol: &Tolerance) {
    let runs = face_runs(&crossings.p, &crossings.sorted_p);
    for run in &runs {
        let m = run.len();
        if m < 2 {
            continue;
        }
        for j in 0..m {
            let cur = run[j];
            let next = run[(j + 1) % m];
            let (Some(cur_ea), Some(next_eb)) = (crossings.p[cur].edge_after, crossings.p[next].edge_before) else {
                continue;
            };
            if cur_ea != next_eb {
                continue; // more than one edge lies between the two crossings
            }
            if a.edge(cur_ea).bv != BoundaryValue::Boundary {
                continue;
            }

            let b_edge = single_boundary_chain(b, &crossings.q[cur], &crossings.q[next])
                .or_else(|| single_boundary_chain(b, &crossings.q[next], &crossings.q[cur]));
            let Some(b_edge) = b_edge else {
                log::debug!("overlap conflict: A's boundary chain has no single-edge match on B");
                continue;
            };
            a.set_overlap(cur_ea, b, b_edge, tol);
        }
    }
}

fn single_boundary_chain(poly: &Polygon, from: &CrossingRecord, to: &CrossingRecord) -> Option<EdgeId> {
    let edge = from.edge_after?;
    if to.edge_before? != edge {
        return None;
    }
    (poly.edge(edge).bv == BoundaryValue::Boundary).then_some(edge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use crate::pipeline::{collector, sorter, splitter};

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x0, y1),
            Point::new(x1, y1),
            Point::new(x1, y0),
        ]
    }

    fn prepare(a_ring: Vec<Point>, b_ring: Vec<Point>) -> (Polygon, Polygon, Crossings) {
        let mut a = Polygon::from_point_rings(&[a_ring]).unwrap();
        let mut b = Polygon::from_point_rings(&[b_ring]).unwrap();
        let tol = Tolerance::DEFAULT;
        let mut crossings = collector::collect(&a, &mut b, &tol);
        sorter::sort(&mut crossings, &tol);
        splitter::split(&mut a, &mut crossings.p, &crossings.sorted_p, &tol);
        splitter::split(&mut b, &mut crossings.q, &crossings.sorted_q, &tol);
        (a, b, crossings)
    }

    #[test]
    fn non_crossed_inner_face_is_classified_inside() {
        let (mut a, mut b, mut crossings) = prepare(square(0.0, 0.0, 10.0, 10.0), square(3.0, 3.0, 7.0, 7.0));
        classify(&mut a, &mut b, &mut crossings, &Tolerance::DEFAULT);
        let face = b.face_ids().next().unwrap();
        let first = b.face(face).first.unwrap();
        assert_eq!(b.edge(first).bv, BoundaryValue::Inside);
    }

    #[test]
    fn incident_edges_are_tagged_boundary_at_crossing_endpoints() {
        let (mut a, mut b, mut crossings) = prepare(square(0.0, 0.0, 4.0, 4.0), square(2.0, 2.0, 6.0, 6.0));
        classify(&mut a, &mut b, &mut crossings, &Tolerance::DEFAULT);
        for r in &crossings.p {
            if let Some(eb) = r.edge_before {
                assert_eq!(a.edge(eb).bv_end, BoundaryValue::Boundary);
            }
        }
    }
}
