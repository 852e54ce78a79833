//! The polygon container — a cyclic edge-list arena per face, addressed by
//! integer handles rather than heap-linked nodes (DESIGN.md, "Cyclic edge
//! lists with back-pointers"). This plays the role of the external
//! `PolygonStore` in `spec.md` §6.3: spatial index over edges, face/edge
//! insertion and removal, and the point-in-face test.
//!
//! Structurally this is `geograph::dcel::Dcel<C>`'s half-edge design with the
//! `twin` pairing dropped — a polygon face boundary here is a single
//! directed cyclic list, not one half of a planar subdivision — and `Shape`
//! plus the classification fields of spec §3 folded onto each edge.

use std::fmt;

use rstar::{RTree, RTreeObject, AABB};

use crate::error::PolygonError;
use crate::geom::{Aabb, Point, Shape};
use crate::tolerance::{BoundaryValue, Overlap, Tolerance};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub usize);

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FaceId({})", self.0)
    }
}

/// A directed boundary element carrying one [`Shape`] plus the mutable
/// classification fields of spec §3. `removed` is internal bookkeeping: a
/// tombstone flag set by [`Polygon::remove_chain`] and
/// [`Polygon::delete_face`] so excised edges remain addressable (other
/// crossing records may still reference their `EdgeId`) without being
/// walked by `face_cycle` or the spatial index.
#[derive(Clone, Debug)]
pub struct Edge {
    pub shape: Shape,
    pub prev: EdgeId,
    pub next: EdgeId,
    pub face: FaceId,
    pub bv: BoundaryValue,
    pub bv_start: BoundaryValue,
    pub bv_end: BoundaryValue,
    pub overlap: Overlap,
    pub arc_length: f64,
    pub(crate) removed: bool,
}

impl Edge {
    fn fresh(shape: Shape, face: FaceId) -> Self {
        Edge {
            shape,
            prev: EdgeId(usize::MAX),
            next: EdgeId(usize::MAX),
            face,
            bv: BoundaryValue::Undefined,
            bv_start: BoundaryValue::Undefined,
            bv_end: BoundaryValue::Undefined,
            overlap: Overlap::None,
            arc_length: 0.0,
            removed: false,
        }
    }

    /// Clear classification fields (spec §4.5 step 2's "clear ... on
    /// edge_before and edge_after").
    pub fn clear_classification(&mut self) {
        self.bv = BoundaryValue::Undefined;
        self.bv_start = BoundaryValue::Undefined;
        self.bv_end = BoundaryValue::Undefined;
        self.overlap = Overlap::None;
    }
}

/// A single closed face: a circular list of [`Edge`]s reachable from
/// `first` via `.next`. `first == None` means the face has been deleted.
#[derive(Clone, Debug, Default)]
pub struct Face {
    pub first: Option<EdgeId>,
}

impl Face {
    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }
}

#[derive(Clone, Debug)]
struct EdgeEnvelope {
    edge: EdgeId,
    bbox: Aabb,
}

impl RTreeObject for EdgeEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.bbox.min.x, self.bbox.min.y], [self.bbox.max.x, self.bbox.max.y])
    }
}

/// A polygon: a collection of faces, plus a lazily-built spatial index over
/// its edges for `IntersectionCollector`'s broadphase query.
pub struct Polygon {
    pub(crate) edges: Vec<Edge>,
    pub(crate) faces: Vec<Face>,
    index: Option<RTree<EdgeEnvelope>>,
}

impl Default for Polygon {
    fn default() -> Self {
        Self::new()
    }
}

// The spatial index is a cache, not part of a polygon's identity: clone and
// debug both treat it as absent and let it rebuild lazily.
impl Clone for Polygon {
    fn clone(&self) -> Self {
        Polygon {
            edges: self.edges.clone(),
            faces: self.faces.clone(),
            index: None,
        }
    }
}

impl fmt::Debug for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Polygon")
            .field("edges", &self.edges)
            .field("faces", &self.faces)
            .finish()
    }
}

impl Polygon {
    pub fn new() -> Self {
        Self {
            edges: Vec::new(),
            faces: Vec::new(),
            index: None,
        }
    }

    /// Build a polygon from one ring of points per face, each ring
    /// connected by straight segments and implicitly closed (the last
    /// point links back to the first). Rejects rings with fewer than three
    /// points.
    pub fn from_point_rings(rings: &[Vec<Point>]) -> Result<Self, PolygonError> {
        let mut poly = Self::new();
        for ring in rings {
            if ring.len() < 3 {
                return Err(PolygonError::InvalidInput(format!(
                    "face ring has {} points, need at least 3",
                    ring.len()
                )));
            }
            let shapes: Vec<Shape> = ring
                .iter()
                .zip(ring.iter().cycle().skip(1))
                .map(|(a, b)| Shape::Segment { start: *a, end: *b })
                .collect();
            poly.push_face(&shapes)?;
        }
        Ok(poly)
    }

    /// Add a new face whose boundary is `shapes`, linked in order with the
    /// last shape's end wired back to the first shape's start. Does not
    /// check that consecutive shapes actually meet; callers building from
    /// known-good geometry (e.g. `from_point_rings`) don't need that check.
    pub fn push_face(&mut self, shapes: &[Shape]) -> Result<FaceId, PolygonError> {
        if shapes.is_empty() {
            return Err(PolygonError::InvalidInput("face has no edges".into()));
        }
        let face_id = FaceId(self.faces.len());
        self.faces.push(Face { first: None });

        let start = self.edges.len();
        for &shape in shapes {
            self.edges.push(Edge::fresh(shape, face_id));
        }
        let n = shapes.len();
        for i in 0..n {
            let cur = EdgeId(start + i);
            let nxt = EdgeId(start + (i + 1) % n);
            self.edges[cur.0].next = nxt;
            self.edges[nxt.0].prev = cur;
        }
        self.faces[face_id.0].first = Some(EdgeId(start));
        self.index = None;
        self.recompute_arc_lengths(face_id);
        Ok(face_id)
    }

    fn recompute_arc_lengths(&mut self, face: FaceId) {
        let Some(first) = self.faces[face.0].first else {
            return;
        };
        let mut acc = 0.0;
        let mut cur = first;
        loop {
            self.edges[cur.0].arc_length = acc;
            acc += self.edges[cur.0].shape.length();
            cur = self.edges[cur.0].next;
            if cur == first {
                break;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> &mut Edge {
        &mut self.edges[id.0]
    }

    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.0]
    }

    pub fn num_faces(&self) -> usize {
        self.faces.iter().filter(|f| !f.is_empty()).count()
    }

    /// Iterate all live face ids (faces with `first.is_some()`).
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.faces.len()).map(FaceId).filter(move |f| !self.faces[f.0].is_empty())
    }

    /// Iterate the edges of `face` in boundary order, starting at
    /// `Face::first`.
    pub fn face_cycle(&self, face: FaceId) -> FaceCycle<'_> {
        FaceCycle {
            poly: self,
            start: self.faces[face.0].first,
            current: self.faces[face.0].first,
            done: self.faces[face.0].first.is_none(),
        }
    }

    // -----------------------------------------------------------------------
    // Spatial index (broadphase for IntersectionCollector)
    // -----------------------------------------------------------------------

    fn ensure_index(&mut self) {
        if self.index.is_some() {
            return;
        }
        let items = self
            .edges
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.removed)
            .map(|(i, e)| EdgeEnvelope {
                edge: EdgeId(i),
                bbox: e.shape.bbox(),
            })
            .collect();
        self.index = Some(RTree::bulk_load(items));
    }

    /// All live edges whose bounding box intersects `bbox` (the
    /// `PolygonStore::edges.search` of spec §6.3).
    pub fn search(&mut self, bbox: &Aabb) -> Vec<EdgeId> {
        self.ensure_index();
        let envelope = AABB::from_corners([bbox.min.x, bbox.min.y], [bbox.max.x, bbox.max.y]);
        self.index
            .as_ref()
            .unwrap()
            .locate_in_envelope_intersecting(&envelope)
            .map(|e| e.edge)
            .collect()
    }

    // -----------------------------------------------------------------------
    // Mutators used by EdgeSplitter / ChainExcisor / Restitcher
    // -----------------------------------------------------------------------

    /// Insert a new vertex at `pt` immediately after `edge_before`,
    /// splitting its shape in two. Returns the new edge ending at `pt`
    /// (§4.3 step 4: "produces a new edge whose shape ends at `pt`").
    ///
    /// Panics if `pt` coincides with either endpoint of `edge_before`'s
    /// shape; callers are expected to have already handled that case
    /// (§4.3 steps 2–3).
    pub fn split_edge(&mut self, edge_before: EdgeId, pt: Point, tol: &Tolerance) -> EdgeId {
        let old = self.edges[edge_before.0].clone();
        let (before_shape, after_shape) = old.shape.split(pt, tol);
        let before_shape = before_shape.expect("split_edge called at an endpoint");
        let after_shape = after_shape.expect("split_edge called at an endpoint");

        let new_id = EdgeId(self.edges.len());
        let mut new_edge = Edge::fresh(after_shape, old.face);
        new_edge.next = old.next;
        new_edge.prev = edge_before;
        self.edges.push(new_edge);

        let next_id = old.next;
        self.edges[edge_before.0].shape = before_shape;
        self.edges[edge_before.0].next = new_id;
        self.edges[next_id.0].prev = new_id;

        self.recompute_arc_lengths(old.face);
        self.index = None;
        new_id
    }

    /// Remove the open chain of edges strictly from `from` to `to`
    /// inclusive, walking `.next` (spec §4.6's `removeChain`). The edges
    /// are tombstoned, not physically freed — `Restitcher` rewires
    /// `prev`/`next` around the gap later using the crossing records'
    /// `edge_before`/`edge_after`, so no relinking happens here.
    pub fn remove_chain(&mut self, from: EdgeId, to: EdgeId) {
        let mut cur = from;
        loop {
            let next = self.edges[cur.0].next;
            self.edges[cur.0].removed = true;
            if cur == to {
                break;
            }
            cur = next;
        }
        self.index = None;
    }

    /// Delete an entire face: tombstone all its edges and mark it empty.
    pub fn delete_face(&mut self, face: FaceId) {
        if let Some(first) = self.faces[face.0].first {
            let mut cur = first;
            loop {
                let next = self.edges[cur.0].next;
                self.edges[cur.0].removed = true;
                cur = next;
                if cur == first {
                    break;
                }
            }
        }
        self.faces[face.0].first = None;
        self.index = None;
    }

    /// Close a new face ring running from `first_edge` to `last_edge`
    /// (`last_edge.next == first_edge` must already hold): register it and
    /// assign `.face` to every edge on the ring (spec §4.7 step 4's
    /// `addFace`).
    pub fn add_face(&mut self, first_edge: EdgeId, last_edge: EdgeId) -> FaceId {
        debug_assert_eq!(self.edges[last_edge.0].next, first_edge);
        let face_id = FaceId(self.faces.len());
        self.faces.push(Face {
            first: Some(first_edge),
        });
        let mut cur = first_edge;
        loop {
            self.edges[cur.0].face = face_id;
            if cur == last_edge {
                break;
            }
            cur = self.edges[cur.0].next;
        }
        self.index = None;
        self.recompute_arc_lengths(face_id);
        face_id
    }

    /// Append every live face of `other` into `self`, returning the
    /// `EdgeId`/`FaceId` remapping so that references collected against
    /// `other` (e.g. a crossing list's `edge_before`/`edge_after`/`face`)
    /// can be translated into `self`'s namespace. Used by the Restitcher
    /// to merge B's surviving edges into A's pool (§4.7 step 1).
    pub fn absorb(&mut self, other: &Polygon) -> Remap {
        let edge_offset = self.edges.len();
        let face_offset = self.faces.len();

        for e in &other.edges {
            let mut e = e.clone();
            e.prev = EdgeId(e.prev.0 + edge_offset);
            e.next = EdgeId(e.next.0 + edge_offset);
            e.face = FaceId(e.face.0 + face_offset);
            self.edges.push(e);
        }
        for f in &other.faces {
            self.faces.push(Face {
                first: f.first.map(|e| EdgeId(e.0 + edge_offset)),
            });
        }
        self.index = None;
        Remap {
            edge_offset,
            face_offset,
        }
    }

    // -----------------------------------------------------------------------
    // Whole-polygon operations
    // -----------------------------------------------------------------------

    /// Deep clone (spec §6.3 `clone()`); `Polygon` is already `Clone`, this
    /// exists to name the operation the driver calls explicitly.
    pub fn clone_deep(&self) -> Polygon {
        self.clone()
    }

    /// Flip the orientation of every face: reverse each shape and swap
    /// `prev`/`next` throughout. Used by the driver before `SUBTRACT`
    /// enters the pipeline (§4.6's note on negating B).
    pub fn reverse(&mut self) {
        for e in &mut self.edges {
            e.shape = e.shape.reverse();
            std::mem::swap(&mut e.prev, &mut e.next);
        }
        self.index = None;
        let face_ids: Vec<FaceId> = self.face_ids().collect();
        for f in face_ids {
            self.recompute_arc_lengths(f);
        }
    }

    /// Collect every live (non-removed) edge's shape across all faces, in
    /// no particular cross-face order. Used by `innerClip`/`outerClip`.
    pub fn surviving_shapes(&self) -> Vec<Shape> {
        self.edges.iter().filter(|e| !e.removed).map(|e| e.shape).collect()
    }

    // -----------------------------------------------------------------------
    // Classification (was PolygonStore::setInclusion / setOverlap)
    // -----------------------------------------------------------------------

    /// Ray-cast `pt` against every live face of `self` to decide
    /// inside/outside. Returns `Boundary` only when `pt` lies exactly on
    /// an edge (callers classifying interior sample points should avoid
    /// that by construction).
    pub fn point_in_polygon(&self, pt: Point, tol: &Tolerance) -> BoundaryValue {
        // A long ray with an irrational-ish slope to dodge exact vertex hits.
        let ray_end = Point::new(pt.x + 1.0e7, pt.y + 1.0e-3 * 1.0e7_f64);
        let ray = Shape::Segment { start: pt, end: ray_end };

        let mut crossings = 0usize;
        for face in self.face_ids() {
            for he in self.face_cycle(face) {
                let edge = &self.edges[he.0];
                if edge.shape.contains_point(pt, tol) {
                    return BoundaryValue::Boundary;
                }
                crossings += ray.intersect(&edge.shape, tol).len();
            }
        }
        if crossings % 2 == 1 {
            BoundaryValue::Inside
        } else {
            BoundaryValue::Outside
        }
    }

    /// `setInclusion`: classify a single edge's midpoint against `other`,
    /// consistent with its already-set `bv_start`/`bv_end` (spec §4.5 step
    /// 2's "computes `bv` consistent with `bvStart`/`bvEnd`").
    pub fn classify_edge(&mut self, edge: EdgeId, other: &Polygon, tol: &Tolerance) {
        let shape = self.edges[edge.0].shape;
        let mid_param_pt = midpoint(&shape);
        let bv = other.point_in_polygon(mid_param_pt, tol);
        self.edges[edge.0].bv = bv;
    }

    /// `setInclusion` for a whole non-intersected face: classify every edge
    /// with the face-wide `bv` obtained from one representative point. When
    /// that point lands exactly on `other`'s boundary (the face coincides
    /// with `other` over its whole extent and `IntersectionCollector` never
    /// produced a crossing for it — two identical polygons, say), also tag
    /// the face-wide `Overlap` the same way `set_overlap` would per edge, so
    /// `should_delete_whole_face` has a direction to act on.
    pub fn classify_face(&mut self, face: FaceId, other: &Polygon, tol: &Tolerance) {
        let Some(first) = self.faces[face.0].first else {
            return;
        };
        let shape = self.edges[first.0].shape;
        let sample = midpoint(&shape);
        let bv = other.point_in_polygon(sample, tol);
        let overlap = if bv == BoundaryValue::Boundary {
            other
                .find_coincident_edge(&shape, tol)
                .map(|oe| direction_overlap(&shape, &other.edge(oe).shape, tol))
                .unwrap_or(Overlap::None)
        } else {
            Overlap::None
        };
        let mut cur = first;
        loop {
            self.edges[cur.0].bv = bv;
            self.edges[cur.0].overlap = overlap;
            cur = self.edges[cur.0].next;
            if cur == first {
                break;
            }
        }
    }

    /// Find a live edge of `self` whose undirected endpoints match `shape`'s
    /// (in either order), without touching the spatial index. Used by
    /// [`Polygon::classify_face`] to find a direction to compare against for
    /// a whole face that coincides with `other` but was never split against
    /// it (so there is no crossing record to carry that information).
    fn find_coincident_edge(&self, shape: &Shape, tol: &Tolerance) -> Option<EdgeId> {
        let (s, e) = (shape.start(), shape.end());
        self.edges
            .iter()
            .position(|cand| {
                !cand.removed
                    && ((cand.shape.start().eq_within(&s, tol) && cand.shape.end().eq_within(&e, tol))
                        || (cand.shape.start().eq_within(&e, tol) && cand.shape.end().eq_within(&s, tol)))
            })
            .map(EdgeId)
    }

    /// `setOverlap`: compare two coincident edges' directions and flag
    /// `Same` (both traverse the shared line the same way — e.g. two exact
    /// copies of one polygon) or `Opposite` (e.g. two polygons sharing a
    /// border, each wound consistently, necessarily cross it in opposite
    /// directions) on both, per the glossary's "SAME (collinear, same
    /// direction) or OPPOSITE".
    pub fn set_overlap(&mut self, edge: EdgeId, other: &mut Polygon, other_edge: EdgeId, tol: &Tolerance) {
        let a = self.edges[edge.0].shape;
        let b = other.edges[other_edge.0].shape;
        let overlap = direction_overlap(&a, &b, tol);
        self.edges[edge.0].overlap = overlap;
        other.edges[other_edge.0].overlap = overlap;
    }
}

/// Two coincident shapes are `Same` if they're traversed the same way
/// (matching starts) and `Opposite` otherwise (matching start-to-end).
fn direction_overlap(a: &Shape, b: &Shape, tol: &Tolerance) -> Overlap {
    if a.start().eq_within(&b.start(), tol) {
        Overlap::Same
    } else {
        Overlap::Opposite
    }
}

fn midpoint(shape: &Shape) -> Point {
    let s = shape.start();
    let e = shape.end();
    Point::new((s.x + e.x) / 2.0, (s.y + e.y) / 2.0)
}

/// The offsets returned by [`Polygon::absorb`] for translating a foreign
/// `EdgeId`/`FaceId` into the merged polygon's namespace.
#[derive(Clone, Copy, Debug)]
pub struct Remap {
    edge_offset: usize,
    face_offset: usize,
}

impl Remap {
    pub fn edge(&self, id: EdgeId) -> EdgeId {
        EdgeId(id.0 + self.edge_offset)
    }

    pub fn face(&self, id: FaceId) -> FaceId {
        FaceId(id.0 + self.face_offset)
    }
}

/// Iterator over the edges of one face, in boundary order.
pub struct FaceCycle<'a> {
    poly: &'a Polygon,
    start: Option<EdgeId>,
    current: Option<EdgeId>,
    done: bool,
}

impl<'a> Iterator for FaceCycle<'a> {
    type Item = EdgeId;

    fn next(&mut self) -> Option<EdgeId> {
        if self.done {
            return None;
        }
        let he = self.current?;
        let next = self.poly.edges[he.0].next;
        self.current = Some(next);
        if Some(next) == self.start {
            self.done = true;
        }
        Some(he)
    }
}
