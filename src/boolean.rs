//! Public entry points: the three Boolean set operations plus the two
//! clip-only and one intersection-only variants that skip Restitch
//! (spec §4.8, §6.1).

use crate::dcel::Polygon;
use crate::error::PolygonError;
use crate::geom::{Point, Shape};
use crate::pipeline::{classifier, collector, dedup, excisor, restitcher, sorter, splitter, Crossings};
use crate::tolerance::Tolerance;

/// Which set operation the driver is carrying out. `Subtract` reverses B's
/// orientation before the pipeline runs, so every downstream stage treats
/// it as "this polygon's outside is now its inside" (§4.6's note on
/// negating B).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Intersect,
    Subtract,
}

/// A ∪ B.
pub fn unify(a: &Polygon, b: &Polygon, tol: &Tolerance) -> Result<Polygon, PolygonError> {
    run(a, b, BooleanOp::Union, tol)
}

/// A ∩ B.
pub fn intersect(a: &Polygon, b: &Polygon, tol: &Tolerance) -> Result<Polygon, PolygonError> {
    run(a, b, BooleanOp::Intersect, tol)
}

/// A − B.
pub fn subtract(a: &Polygon, b: &Polygon, tol: &Tolerance) -> Result<Polygon, PolygonError> {
    run(a, b, BooleanOp::Subtract, tol)
}

fn run(a: &Polygon, b: &Polygon, op: BooleanOp, tol: &Tolerance) -> Result<Polygon, PolygonError> {
    let mut a = a.clone_deep();
    let mut b = b.clone_deep();
    if op == BooleanOp::Subtract {
        b.reverse();
    }
    let mut crossings = pipeline_through_excise(&mut a, &mut b, op, tol);
    restitcher::restitch(&mut a, &b, &mut crossings, tol)?;
    Ok(a)
}

/// A's edges that lie inside B, without rebuilding closed faces. Useful
/// when the caller only needs the clipped boundary geometry.
pub fn inner_clip(a: &Polygon, b: &Polygon, tol: &Tolerance) -> Result<Vec<Shape>, PolygonError> {
    let mut a = a.clone_deep();
    let mut b = b.clone_deep();
    pipeline_through_excise(&mut a, &mut b, BooleanOp::Intersect, tol);
    Ok(a.surviving_shapes())
}

/// A's edges that lie outside B, without rebuilding closed faces.
pub fn outer_clip(a: &Polygon, b: &Polygon, tol: &Tolerance) -> Result<Vec<Shape>, PolygonError> {
    let mut a = a.clone_deep();
    let mut b = b.clone_deep();
    pipeline_through_excise(&mut a, &mut b, BooleanOp::Union, tol);
    Ok(a.surviving_shapes())
}

/// Every crossing point between A and B's boundaries, deduplicated, in
/// arc-sorted order per polygon.
pub fn calculate_intersections(a: &Polygon, b: &Polygon, tol: &Tolerance) -> Result<Vec<Point>, PolygonError> {
    let mut a = a.clone_deep();
    let mut b = b.clone_deep();
    let mut crossings = collector::collect(&a, &mut b, tol);
    sorter::sort(&mut crossings, tol);
    splitter::split(&mut a, &mut crossings.p, &crossings.sorted_p, tol);
    splitter::split(&mut b, &mut crossings.q, &crossings.sorted_q, tol);
    dedup::filter_duplicates(&mut crossings, tol);
    Ok(crossings.sorted_p.iter().map(|&i| crossings.p[i].pt).collect())
}

/// Runs Collect through Excise (spec §4.1–§4.6), leaving both polygons with
/// their irrelevant chains and faces tombstoned but not yet merged.
fn pipeline_through_excise(a: &mut Polygon, b: &mut Polygon, op: BooleanOp, tol: &Tolerance) -> Crossings {
    let mut crossings = collector::collect(a, b, tol);
    sorter::sort(&mut crossings, tol);
    splitter::split(a, &mut crossings.p, &crossings.sorted_p, tol);
    splitter::split(b, &mut crossings.q, &crossings.sorted_q, tol);
    dedup::filter_duplicates(&mut crossings, tol);
    classifier::classify(a, b, &mut crossings, tol);
    excisor::excise(a, &mut crossings.p, &crossings.sorted_p, op, true, tol);
    excisor::excise(b, &mut crossings.q, &crossings.sorted_q, op, false, tol);
    crossings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x0, y1),
            Point::new(x1, y1),
            Point::new(x1, y0),
        ]
    }

    #[test]
    fn disjoint_union_keeps_both_faces() {
        let a = Polygon::from_point_rings(&[square(0.0, 0.0, 2.0, 2.0)]).unwrap();
        let b = Polygon::from_point_rings(&[square(5.0, 0.0, 7.0, 2.0)]).unwrap();
        let result = unify(&a, &b, &Tolerance::DEFAULT).unwrap();
        assert_eq!(result.num_faces(), 2);
    }

    #[test]
    fn overlapping_squares_union_into_one_face() {
        let a = Polygon::from_point_rings(&[square(0.0, 0.0, 4.0, 4.0)]).unwrap();
        let b = Polygon::from_point_rings(&[square(2.0, 2.0, 6.0, 6.0)]).unwrap();
        let result = unify(&a, &b, &Tolerance::DEFAULT).unwrap();
        assert_eq!(result.num_faces(), 1);
    }

    #[test]
    fn disjoint_intersect_yields_no_faces() {
        let a = Polygon::from_point_rings(&[square(0.0, 0.0, 2.0, 2.0)]).unwrap();
        let b = Polygon::from_point_rings(&[square(5.0, 0.0, 7.0, 2.0)]).unwrap();
        let result = intersect(&a, &b, &Tolerance::DEFAULT).unwrap();
        assert_eq!(result.num_faces(), 0);
    }

    #[test]
    fn subtract_disjoint_is_identity() {
        let a = Polygon::from_point_rings(&[square(0.0, 0.0, 2.0, 2.0)]).unwrap();
        let b = Polygon::from_point_rings(&[square(5.0, 0.0, 7.0, 2.0)]).unwrap();
        let result = subtract(&a, &b, &Tolerance::DEFAULT).unwrap();
        assert_eq!(result.num_faces(), 1);
        assert_eq!(result.surviving_shapes().len(), a.surviving_shapes().len());
    }

    #[test]
    fn containment_intersect_matches_the_inner_square() {
        let a = Polygon::from_point_rings(&[square(0.0, 0.0, 10.0, 10.0)]).unwrap();
        let b = Polygon::from_point_rings(&[square(3.0, 3.0, 7.0, 7.0)]).unwrap();
        let result = intersect(&a, &b, &Tolerance::DEFAULT).unwrap();
        assert_eq!(result.num_faces(), 1);
        assert_eq!(result.surviving_shapes().len(), 4);
    }
}
