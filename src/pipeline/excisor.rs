//! Stage 6: decide, per chain of edges strictly between two consecutive
//! crossings on a face, whether it survives the Boolean operator; also
//! drops whole faces that were never crossed and are irrelevant to the
//! result (spec §4.6).

use ahash::AHashSet;

use crate::boolean::BooleanOp;
use crate::dcel::{FaceId, Polygon};
use crate::tolerance::{BoundaryValue, Overlap, Tolerance};

use super::{face_runs, pulls_within, CrossingRecord};

/// `crossings`/`sorted` are this polygon's own crossing list — `p` for A,
/// `q` for B. `is_res` is true when this polygon is the result carrier
/// (always A; false for B, the secondary operand). The driver negates B
/// before the pipeline runs for `SUBTRACT`, so the rules below assume that
/// reversal already happened.
pub fn excise(
    poly: &mut Polygon,
    crossings: &mut [CrossingRecord],
    sorted: &[usize],
    op: BooleanOp,
    is_res: bool,
    tol: &Tolerance,
) {
    let runs = face_runs(crossings, sorted);
    for run in &runs {
        let pulls = pulls_within(crossings, run, tol);
        // A run with exactly one pull is a face touched at a single point
        // (spec §4.6's touching-point topology): there is only one chain,
        // running from the crossing's own `edge_after` all the way around
        // the face back to its own `edge_before`. `(k + 1) % n` wraps to
        // the same pull in that case, which is exactly what's wanted.
        let n = pulls.len();
        for k in 0..n {
            let from_pull = pulls[k].clone();
            let to_pull = pulls[(k + 1) % n].clone();
            let rep_from = from_pull[0];
            let rep_to = to_pull[0];
            let (Some(edge_from), Some(edge_to)) = (crossings[rep_from].edge_after, crossings[rep_to].edge_before)
            else {
                continue;
            };

            let bv_from = poly.edge(edge_from).bv;
            let bv_to = poly.edge(edge_to).bv;
            let overlap = poly.edge(edge_from).overlap;

            if should_delete_chain(op, is_res, bv_from, bv_to, overlap) {
                poly.remove_chain(edge_from, edge_to);
                for idx in from_pull {
                    crossings[idx].edge_after = None;
                }
                for idx in to_pull {
                    crossings[idx].edge_before = None;
                }
            }
        }
    }

    let crossed: AHashSet<FaceId> = crossings.iter().filter_map(|r| r.face).collect();
    let candidates: Vec<FaceId> = poly.face_ids().filter(|f| !crossed.contains(f)).collect();
    for face in candidates {
        let Some(first) = poly.face(face).first else { continue };
        let bv = poly.edge(first).bv;
        let overlap = poly.edge(first).overlap;
        if should_delete_whole_face(op, is_res, bv, overlap) {
            poly.delete_face(face);
        }
    }
}

fn should_delete_chain(op: BooleanOp, is_res: bool, bv_from: BoundaryValue, bv_to: BoundaryValue, overlap: Overlap) -> bool {
    use BoundaryValue::*;
    if bv_from == Boundary && bv_to == Boundary {
        return should_delete_boundary_overlap(op, is_res, overlap);
    }
    match op {
        BooleanOp::Union => bv_from == Inside && bv_to == Inside,
        BooleanOp::Intersect => bv_from == Outside && bv_to == Outside,
        BooleanOp::Subtract if is_res => bv_from == Inside || bv_to == Inside,
        BooleanOp::Subtract => bv_from == Outside || bv_to == Outside,
    }
}

fn should_delete_whole_face(op: BooleanOp, is_res: bool, bv: BoundaryValue, overlap: Overlap) -> bool {
    use BoundaryValue::*;
    if bv == Boundary {
        // Mirrors `should_delete_chain`'s Boundary arm: a whole face that
        // coincides with the other polygon but was never crossed (so there
        // is no per-edge chain to excise) still needs a defined fate.
        return should_delete_boundary_overlap(op, is_res, overlap);
    }
    matches!(
        (op, bv, is_res),
        (BooleanOp::Union, Inside, _)
            | (BooleanOp::Subtract, Inside, true)
            | (BooleanOp::Subtract, Outside, false)
            | (BooleanOp::Intersect, Outside, _)
    )
}

/// Shared disposal rule for a boundary-vs-boundary coincidence, whether it's
/// a single excised chain or a whole untouched face (spec §4.6).
///
/// - SUBTRACT already negated B before the pipeline ran, so a chain or face
///   coincident with B's boundary is cancelling that boundary out (e.g.
///   every edge of `subtract(&a, &a, ...)`) — always drop it.
/// - `Overlap::Same` (two copies of the same border, same direction — an
///   exact duplicate polygon is the extreme case) always keeps exactly one
///   copy: drop it on the result-carrying side, keep it on the other.
/// - `Overlap::Opposite` (two polygons meeting at a shared border, each
///   wound consistently so they necessarily cross it in opposite
///   directions — spec.md scenario 4) keeps one copy under UNION (the
///   border becomes a degenerate slit in the merged ring) but drops both
///   under INTERSECT, since the only "overlap" there has zero area.
fn should_delete_boundary_overlap(op: BooleanOp, is_res: bool, overlap: Overlap) -> bool {
    if op == BooleanOp::Subtract {
        return true;
    }
    match overlap {
        Overlap::Same => is_res,
        Overlap::Opposite if op == BooleanOp::Intersect => true,
        Overlap::Opposite => is_res,
        Overlap::None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use crate::pipeline::{classifier, collector, sorter, splitter};

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x0, y1),
            Point::new(x1, y1),
            Point::new(x1, y0),
        ]
    }

    #[test]
    fn union_excises_an_inside_chain() {
        let mut a = Polygon::from_point_rings(&[square(0.0, 0.0, 4.0, 4.0)]).unwrap();
        let mut b = Polygon::from_point_rings(&[square(2.0, 2.0, 6.0, 6.0)]).unwrap();
        let tol = Tolerance::DEFAULT;
        let mut crossings = collector::collect(&a, &mut b, &tol);
        sorter::sort(&mut crossings, &tol);
        splitter::split(&mut a, &mut crossings.p, &crossings.sorted_p, &tol);
        splitter::split(&mut b, &mut crossings.q, &crossings.sorted_q, &tol);
        classifier::classify(&mut a, &mut b, &mut crossings, &tol);

        let edge_count_before = a.edges.len();
        excise(&mut a, &mut crossings.p, &crossings.sorted_p, BooleanOp::Union, true, &tol);
        excise(&mut b, &mut crossings.q, &crossings.sorted_q, BooleanOp::Union, false, &tol);

        assert_eq!(a.edges.len(), edge_count_before); // excision tombstones, never allocates
        assert!(a.edges.iter().any(|e| e.removed));
        assert!(b.edges.iter().any(|e| e.removed));
    }
}
