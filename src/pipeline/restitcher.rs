//! Stage 7: merge B's surviving edges into A, rewire the links that
//! `ChainExcisor` left dangling at each crossing, and close the resulting
//! rings back up into faces (spec §4.7).

use ahash::AHashSet;

use crate::dcel::{EdgeId, Polygon};
use crate::error::PolygonError;
use crate::tolerance::Tolerance;

use super::{Crossings, CrossingRecord};

pub fn restitch(a: &mut Polygon, b: &Polygon, crossings: &mut Crossings, tol: &Tolerance) -> Result<(), PolygonError> {
    let remap = a.absorb(b);
    for r in &mut crossings.q {
        r.edge_before = r.edge_before.map(|e| remap.edge(e));
        r.edge_after = r.edge_after.map(|e| remap.edge(e));
        r.face = r.face.map(|f| remap.face(f));
    }

    for i in 0..crossings.p.len() {
        swap_links(a, crossings, i);
    }
    for i in 0..crossings.p.len() {
        resolve_touching_point(a, crossings, i, tol);
    }

    discard_old_faces(a, crossings);
    restore_faces(a, crossings)
}

/// Step 2: at a crossing where exactly one side survived on A and the
/// opposite side survived on B (or vice versa), splice the surviving A
/// link to the surviving B link, and the surviving B link to the
/// surviving A link — the two mirror-image cases of a path handing off
/// from one polygon's boundary to the other's.
fn swap_links(a: &mut Polygon, crossings: &mut Crossings, i: usize) {
    let p = crossings.p[i].clone();
    let q = crossings.q[i].clone();
    match (p.edge_before, p.edge_after, q.edge_before, q.edge_after) {
        (Some(p_eb), None, None, Some(q_ea)) => {
            link(a, p_eb, q_ea);
            crossings.p[i].edge_after = Some(q_ea);
            crossings.q[i].edge_before = Some(p_eb);
        }
        (None, Some(p_ea), Some(q_eb), None) => {
            link(a, q_eb, p_ea);
            crossings.q[i].edge_after = Some(p_ea);
            crossings.p[i].edge_before = Some(q_eb);
        }
        // Neither side lost a link: Excise never touched this crossing
        // because both the A-side and B-side chains around it survived
        // whole, which only happens at a point the two boundaries merely
        // touch rather than cross (spec §4.6 scenario 5's pinch point).
        // Splice both rings through each other here so the result is one
        // face passing through the point twice instead of two untouched,
        // separate faces.
        (Some(p_eb), Some(p_ea), Some(q_eb), Some(q_ea)) => {
            link(a, p_eb, q_ea);
            link(a, q_eb, p_ea);
            crossings.p[i].edge_after = Some(q_ea);
            crossings.q[i].edge_after = Some(p_ea);
        }
        _ => {}
    }
}

fn link(a: &mut Polygon, before: EdgeId, after: EdgeId) {
    a.edge_mut(before).next = after;
    a.edge_mut(after).prev = before;
}

/// Step 3: a crossing where BOTH sides on A and B lost one of their two
/// links (a touching point untouched by excision on either polygon) is
/// resolved by finding the other crossing record at the same point that
/// still has the link this one is missing, and splicing through it.
fn resolve_touching_point(a: &mut Polygon, crossings: &mut Crossings, i: usize, tol: &Tolerance) {
    fix_side(a, &mut crossings.p, &mut crossings.q, i, tol);
}

fn fix_side(a: &mut Polygon, own: &mut [CrossingRecord], other: &mut [CrossingRecord], i: usize, tol: &Tolerance) {
    let (eb, ea, pt) = (own[i].edge_before, own[i].edge_after, own[i].pt);
    if eb.is_some() || ea.is_none() {
        return;
    }
    // This record lost edge_before; find a record at the same point (on
    // either list) that still has edge_after set to give to, or
    // edge_before set to receive from.
    for cand in other.iter_mut() {
        if cand.edge_before.is_some() && cand.pt.eq_within(&pt, tol) {
            let donor = cand.edge_before.unwrap();
            link(a, donor, ea.unwrap());
            cand.edge_after = ea;
            own[i].edge_before = Some(donor);
            return;
        }
    }
}

/// Step 3 continued: every old face referenced by a crossing record is
/// gone once its boundary has been cut up and rewired; null it out so
/// step 4 knows which crossings still need a fresh face assigned.
fn discard_old_faces(a: &mut Polygon, crossings: &mut Crossings) {
    let old_faces: AHashSet<_> = crossings
        .p
        .iter()
        .chain(crossings.q.iter())
        .filter_map(|r| r.face)
        .collect();
    for f in old_faces {
        a.faces[f.0].first = None;
    }
    for r in crossings.p.iter_mut().chain(crossings.q.iter_mut()) {
        r.face = None;
    }
}

/// Step 4: walk every crossing not yet folded into a new face, close its
/// ring, and mark every crossing on that ring as done so it isn't
/// revisited.
fn restore_faces(a: &mut Polygon, crossings: &mut Crossings) -> Result<(), PolygonError> {
    let n = crossings.p.len();
    for side in 0..2 {
        for i in 0..n {
            let already_done = if side == 0 {
                crossings.p[i].face.is_some()
            } else {
                crossings.q[i].face.is_some()
            };
            if already_done {
                continue;
            }
            let (eb, ea) = if side == 0 {
                (crossings.p[i].edge_before, crossings.p[i].edge_after)
            } else {
                (crossings.q[i].edge_before, crossings.q[i].edge_after)
            };
            if eb.is_none() && ea.is_none() {
                // Both of this crossing's chains were excised (e.g. the
                // single touching-point pinch of spec §4.6 scenario 5 under
                // INTERSECT, where the whole face on both sides of the touch
                // is outside the result): nothing to close, nothing to
                // revisit.
                continue;
            }
            let (Some(eb), Some(ea)) = (eb, ea) else {
                return Err(PolygonError::UnresolvedTouching(format!(
                    "crossing record {} ({} side) has no surviving link on either side",
                    i,
                    if side == 0 { "P" } else { "Q" }
                )));
            };

            let new_face = a.add_face(ea, eb);
            let ring: AHashSet<EdgeId> = a.face_cycle(new_face).collect();
            for r in crossings.p.iter_mut().chain(crossings.q.iter_mut()) {
                let on_ring = r.edge_before.is_some_and(|e| ring.contains(&e))
                    || r.edge_after.is_some_and(|e| ring.contains(&e));
                if on_ring {
                    r.face = Some(new_face);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boolean::BooleanOp;
    use crate::geom::Point;
    use crate::pipeline::{classifier, collector, excisor, sorter, splitter};

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x0, y1),
            Point::new(x1, y1),
            Point::new(x1, y0),
        ]
    }

    #[test]
    fn union_of_overlapping_squares_closes_into_one_face() {
        let mut a = Polygon::from_point_rings(&[square(0.0, 0.0, 4.0, 4.0)]).unwrap();
        let mut b = Polygon::from_point_rings(&[square(2.0, 2.0, 6.0, 6.0)]).unwrap();
        let tol = Tolerance::DEFAULT;

        let mut crossings = collector::collect(&a, &mut b, &tol);
        sorter::sort(&mut crossings, &tol);
        splitter::split(&mut a, &mut crossings.p, &crossings.sorted_p, &tol);
        splitter::split(&mut b, &mut crossings.q, &crossings.sorted_q, &tol);
        classifier::classify(&mut a, &mut b, &mut crossings, &tol);
        excisor::excise(&mut a, &mut crossings.p, &crossings.sorted_p, BooleanOp::Union, true, &tol);
        excisor::excise(&mut b, &mut crossings.q, &crossings.sorted_q, BooleanOp::Union, false, &tol);

        restitch(&mut a, &b, &mut crossings, &tol).unwrap();
        assert_eq!(a.num_faces(), 1);
    }
}
