//! Stage 2: assign dense per-list face ids and stable-sort each crossing
//! list by `(face_id asc, arc_length asc)` under epsilon comparison (spec
//! §4.2).

use crate::tolerance::Tolerance;

use super::{Crossings, CrossingRecord};

pub fn sort(crossings: &mut Crossings, tol: &Tolerance) {
    crossings.sorted_p = sort_list(&mut crossings.p, tol);
    crossings.sorted_q = sort_list(&mut crossings.q, tol);
}

/// Stamps `id` and `face_id` on every record (first-seen dense face
/// numbering), then returns a permutation of `0..list.len()` in sorted
/// order. The list itself is left in its original (unsorted) order — the
/// permutation is the only sorted view, so re-indexing by `id` stays valid.
fn sort_list(list: &mut [CrossingRecord], tol: &Tolerance) -> Vec<usize> {
    let mut face_order: Vec<crate::dcel::FaceId> = Vec::new();
    for (i, r) in list.iter_mut().enumerate() {
        r.id = Some(i);
        let face = r.face.expect("collector always sets face before sorting");
        let fid = face_order.iter().position(|f| *f == face).unwrap_or_else(|| {
            face_order.push(face);
            face_order.len() - 1
        });
        r.face_id = fid;
    }

    let mut idx: Vec<usize> = (0..list.len()).collect();
    idx.sort_by(|&a, &b| {
        let ra = &list[a];
        let rb = &list[b];
        ra.face_id.cmp(&rb.face_id).then_with(|| {
            if tol.lt(ra.arc_length, rb.arc_length) {
                std::cmp::Ordering::Less
            } else if tol.gt(ra.arc_length, rb.arc_length) {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
    });
    idx
}
