//! Stage 3: insert a vertex into a polygon at every crossing on it, in arc
//! order, then backfill `edge_after` in a second pass (spec §4.3). The two
//! passes are kept separate: fusing them would read `next` pointers that
//! the first pass is still mutating.

use crate::dcel::Polygon;
use crate::tolerance::Tolerance;

use super::{CrossingRecord, END_VERTEX};

pub fn split(poly: &mut Polygon, list: &mut [CrossingRecord], sorted: &[usize], tol: &Tolerance) {
    for &idx in sorted {
        let mut edge_before = list[idx].edge_before.expect("collector always sets edge_before");
        let pt = list[idx].pt;
        let shape = poly.edge(edge_before).shape;

        if pt.eq_within(&shape.start(), tol) {
            edge_before = poly.edge(edge_before).prev;
            list[idx].is_vertex = END_VERTEX;
        } else if pt.eq_within(&shape.end(), tol) {
            list[idx].is_vertex = END_VERTEX;
        } else {
            edge_before = poly.split_edge(edge_before, pt, tol);
        }
        list[idx].edge_before = Some(edge_before);
    }

    for &idx in sorted {
        let edge_before = list[idx].edge_before.unwrap();
        list[idx].edge_after = Some(poly.edge(edge_before).next);
    }
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
    fn split_inserts_vertex_and_fills_edge_after() {
        let mut poly = Polygon::from_point_rings(&[square(0.0, 0.0, 4.0, 4.0)]).unwrap();
        let face = poly.face_ids().next().unwrap();
        let first = poly.face(face).first.unwrap();
        let tol = Tolerance::DEFAULT;
        let mut list = vec![CrossingRecord {
            id: Some(0),
            pt: Point::new(0.0, 2.0),
            edge_before: Some(first),
            edge_after: None,
            face: Some(face),
            arc_length: 2.0,
            is_vertex: 0,
            face_id: 0,
        }];
        split(&mut poly, &mut list, &[0], &tol);
        let eb = list[0].edge_before.unwrap();
        let ea = list[0].edge_after.unwrap();
        assert_eq!(poly.edge(eb).next, ea);
        assert!(poly.edge(eb).shape.end().eq_within(&Point::new(0.0, 2.0), &tol));
    }

    #[test]
    fn split_at_existing_vertex_does_not_insert() {
        let mut poly = Polygon::from_point_rings(&[square(0.0, 0.0, 4.0, 4.0)]).unwrap();
        let face = poly.face_ids().next().unwrap();
        let first = poly.face(face).first.unwrap();
        let before_edge_count = poly.edges.len();
        let tol = Tolerance::DEFAULT;
        let mut list = vec![CrossingRecord {
            id: Some(0),
            pt: Point::new(0.0, 4.0), // the ring's second vertex: edge_before's end
            edge_before: Some(first),
            edge_after: None,
            face: Some(face),
            arc_length: 4.0,
            is_vertex: 0,
            face_id: 0,
        }];
        split(&mut poly, &mut list, &[0], &tol);
        assert_eq!(poly.edges.len(), before_edge_count);
    }
}
