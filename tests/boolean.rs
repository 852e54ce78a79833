//! End-to-end scenarios from the engine's testable-properties list: disjoint
//! shapes, overlapping squares, containment, a pinch-point touch, and a
//! subtract that crosses the boundary twice.

use polybool_dcel::{intersect, subtract, unify, Point, Polygon, Tolerance};

fn ring(points: &[(f64, f64)]) -> Vec<Point> {
    points.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

fn poly(points: &[(f64, f64)]) -> Polygon {
    Polygon::from_point_rings(&[ring(points)]).unwrap()
}

#[test]
fn disjoint_squares() {
    let a = poly(&[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
    let b = poly(&[(5.0, 0.0), (5.0, 2.0), (7.0, 2.0), (7.0, 0.0)]);
    let tol = Tolerance::DEFAULT;

    let union = unify(&a, &b, &tol).unwrap();
    assert_eq!(union.num_faces(), 2);

    let inter = intersect(&a, &b, &tol).unwrap();
    assert_eq!(inter.num_faces(), 0);
}

#[test]
fn overlapping_squares() {
    let a = poly(&[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0)]);
    let b = poly(&[(2.0, 2.0), (2.0, 6.0), (6.0, 6.0), (6.0, 2.0)]);
    let tol = Tolerance::DEFAULT;

    let union = unify(&a, &b, &tol).unwrap();
    assert_eq!(union.num_faces(), 1);
    assert_eq!(union.surviving_shapes().len(), 8);

    let inter = intersect(&a, &b, &tol).unwrap();
    assert_eq!(inter.num_faces(), 1);
    assert_eq!(inter.surviving_shapes().len(), 4);

    let diff = subtract(&a, &b, &tol).unwrap();
    assert_eq!(diff.num_faces(), 1);
    assert_eq!(diff.surviving_shapes().len(), 6);
}

#[test]
fn containment() {
    let a = poly(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
    let b = poly(&[(3.0, 3.0), (3.0, 7.0), (7.0, 7.0), (7.0, 3.0)]);
    let tol = Tolerance::DEFAULT;

    let union = unify(&a, &b, &tol).unwrap();
    assert_eq!(union.num_faces(), 1);
    assert_eq!(union.surviving_shapes().len(), 4);

    let inter = intersect(&a, &b, &tol).unwrap();
    assert_eq!(inter.num_faces(), 1);
    assert_eq!(inter.surviving_shapes().len(), 4);

    // A with a B-shaped hole: outer ring plus inner, oppositely oriented.
    let diff = subtract(&a, &b, &tol).unwrap();
    assert_eq!(diff.num_faces(), 2);
}

#[test]
fn touching_at_a_point() {
    let a = poly(&[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
    let b = poly(&[(2.0, 2.0), (2.0, 4.0), (4.0, 4.0), (4.0, 2.0)]);
    let tol = Tolerance::DEFAULT;

    let union = unify(&a, &b, &tol).unwrap();
    assert_eq!(union.num_faces(), 1);

    let inter = intersect(&a, &b, &tol).unwrap();
    assert_eq!(inter.num_faces(), 0);
}

#[test]
fn subtract_with_crossing_boundary() {
    let a = poly(&[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0)]);
    let b = poly(&[(-1.0, 1.0), (-1.0, 3.0), (5.0, 3.0), (5.0, 1.0)]);
    let tol = Tolerance::DEFAULT;

    let diff = subtract(&a, &b, &tol).unwrap();
    assert_eq!(diff.num_faces(), 2);
}

#[test]
fn subtract_disjoint_is_identity() {
    let a = poly(&[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
    let b = poly(&[(5.0, 0.0), (5.0, 2.0), (7.0, 2.0), (7.0, 0.0)]);
    let tol = Tolerance::DEFAULT;

    let diff = subtract(&a, &b, &tol).unwrap();
    assert_eq!(diff.num_faces(), 1);
    assert_eq!(diff.surviving_shapes().len(), a.surviving_shapes().len());
}

#[test]
fn subtract_self_is_empty() {
    let a = poly(&[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
    let tol = Tolerance::DEFAULT;

    let diff = subtract(&a, &a, &tol).unwrap();
    assert_eq!(diff.num_faces(), 0);
}

#[test]
fn unify_with_self_is_identity() {
    let a = poly(&[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0)]);
    let tol = Tolerance::DEFAULT;

    let union = unify(&a, &a, &tol).unwrap();
    assert_eq!(union.num_faces(), 1);
    assert_eq!(union.surviving_shapes().len(), a.surviving_shapes().len());
}

#[test]
fn intersect_with_self_is_identity() {
    let a = poly(&[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0)]);
    let tol = Tolerance::DEFAULT;

    let inter = intersect(&a, &a, &tol).unwrap();
    assert_eq!(inter.num_faces(), 1);
    assert_eq!(inter.surviving_shapes().len(), a.surviving_shapes().len());
}

#[test]
fn union_and_intersect_are_commutative_in_face_count() {
    let a = poly(&[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0)]);
    let b = poly(&[(2.0, 2.0), (2.0, 6.0), (6.0, 6.0), (6.0, 2.0)]);
    let tol = Tolerance::DEFAULT;

    assert_eq!(
        unify(&a, &b, &tol).unwrap().num_faces(),
        unify(&b, &a, &tol).unwrap().num_faces()
    );
    assert_eq!(
        intersect(&a, &b, &tol).unwrap().num_faces(),
        intersect(&b, &a, &tol).unwrap().num_faces()
    );
}
