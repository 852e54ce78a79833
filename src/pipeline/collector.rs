//! Stage 1: walk A's edges against B's spatial index, emitting paired
//! crossing records (spec §4.1).

use crate::dcel::{EdgeId, FaceId, Polygon};
use crate::geom::Point;
use crate::tolerance::Tolerance;

use super::{Crossings, CrossingRecord, END_VERTEX, NOT_VERTEX, START_VERTEX};

pub fn collect(a: &Polygon, b: &mut Polygon, tol: &Tolerance) -> Crossings {
    let mut out = Crossings::new();
    for face in a.face_ids() {
        for e1 in a.face_cycle(face) {
            let shape1 = a.edge(e1).shape;
            let candidates = b.search(&shape1.bbox());
            for e2 in candidates {
                let shape2 = b.edge(e2).shape;
                for pt in shape1.intersect(&shape2, tol) {
                    let face2 = b.edge(e2).face;
                    let rec_a = build_record(a, e1, face, pt, tol);
                    let rec_b = build_record(b, e2, face2, pt, tol);
                    match (rec_a, rec_b) {
                        (Some(ra), Some(rb)) => {
                            out.p.push(ra);
                            out.q.push(rb);
                        }
                        _ => {
                            log::trace!("degenerate crossing at ({}, {}) dropped", pt.x, pt.y);
                        }
                    }
                }
            }
        }
    }
    log::debug!("collected {} crossing pairs", out.p.len());
    out
}

/// Build one half of a crossing record, or `None` if the oracle's split
/// reports that `pt` doesn't really lie on `edge`'s shape (§7's
/// `DegenerateCrossing`, dropped silently rather than surfaced as an
/// error).
fn build_record(poly: &Polygon, edge: EdgeId, face: FaceId, pt: Point, tol: &Tolerance) -> Option<CrossingRecord> {
    let shape = poly.edge(edge).shape;
    if !shape.contains_point(pt, tol) {
        return None;
    }
    let (s0, s1) = shape.split(pt, tol);
    let total = shape.length();
    let len = match (&s0, &s1) {
        (None, _) => 0.0,
        (_, None) => total,
        (Some(before), Some(_)) => before.length(),
    };

    let mut is_vertex = NOT_VERTEX;
    if tol.is_zero(len) {
        is_vertex |= START_VERTEX;
    }
    if tol.eq(len, total) {
        is_vertex |= END_VERTEX;
    }

    let mut arc_length = poly.edge(edge).arc_length + len;
    if is_vertex & END_VERTEX != 0 {
        let next = poly.edge(edge).next;
        if tol.is_zero(poly.edge(next).arc_length) {
            arc_length = 0.0;
        }
    }

    Some(CrossingRecord {
        id: None,
        pt,
        edge_before: Some(edge),
        edge_after: None,
        face: Some(face),
        arc_length,
        is_vertex,
        face_id: 0,
    })
}
