use crate::error::{Result, SlicerError};
use boostvoronoi as bv;
use slicer_geom::Point;

/// Mirrors `boostvoronoi::SourceCategory`, naming which input produced a
/// cell: a standalone site point, or one end/the whole of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VdSourceCategory {
    SinglePoint,
    SegmentStart,
    Segment,
    SegmentEnd,
}

impl From<bv::SourceCategory> for VdSourceCategory {
    fn from(c: bv::SourceCategory) -> Self {
        match c {
            bv::SourceCategory::SinglePoint => VdSourceCategory::SinglePoint,
            bv::SourceCategory::SegmentStart => VdSourceCategory::SegmentStart,
            bv::SourceCategory::Segment => VdSourceCategory::Segment,
            bv::SourceCategory::SegmentEnd => VdSourceCategory::SegmentEnd,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VdVertex {
    pub point: Point,
    pub is_site_point: bool,
    /// One edge with this vertex as its start; `rot_next` from here visits
    /// every edge incident to the vertex in rotation order (ROT, spec
    /// §2.1).
    pub incident_edge: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VdEdge {
    pub vertex0: Option<usize>,
    pub vertex1: Option<usize>,
    pub twin: usize,
    pub cell: usize,
    pub rot_next: usize,
    pub is_primary: bool,
    pub is_secondary: bool,
    pub is_curved: bool,
    pub is_infinite: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VdCell {
    pub source_category: VdSourceCategory,
    pub source_index: usize,
    pub contains_point: bool,
    pub contains_segment: bool,
}

/// A materialised segment Voronoi diagram: plain indexed arrays, no
/// lifetime tied to the `boostvoronoi` builder that produced them (spec §3
/// Ownership — "the graph ... holds only indices into the VD arrays").
#[derive(Debug, Clone)]
pub struct SegmentVd {
    pub vertices: Vec<VdVertex>,
    pub edges: Vec<VdEdge>,
    pub cells: Vec<VdCell>,
    pub segments: Vec<(Point, Point)>,
}

impl SegmentVd {
    pub fn twin(&self, edge: usize) -> usize {
        self.edges[edge].twin
    }

    pub fn rot_next(&self, edge: usize) -> usize {
        self.edges[edge].rot_next
    }

    /// The source segment of `cell`, resolved through `source_category`: a
    /// whole-segment or segment-endpoint cell both resolve to the same
    /// generating segment.
    pub fn source_segment(&self, cell: usize) -> (Point, Point) {
        self.segments[self.cells[cell].source_index]
    }

    /// Every edge incident to `vertex`, visited in rotation order starting
    /// from its recorded `incident_edge`.
    pub fn incident_edges(&self, vertex: usize) -> Vec<usize> {
        let Some(start) = self.vertices[vertex].incident_edge else {
            return Vec::new();
        };
        let mut out = vec![start];
        let mut e = self.rot_next(start);
        while e != start {
            out.push(e);
            e = self.rot_next(e);
        }
        out
    }
}

/// Builds a [`SegmentVd`] over `segments` (spec `surface.lines()`). The
/// `boostvoronoi` diagram is scanned once into plain records and then
/// dropped; `f64` is used as the output coordinate type so vertex
/// positions retain full precision across the scaled-integer coordinate
/// range this crate works in (`boostvoronoi`'s own examples use `f32`,
/// adequate for mesh display but too lossy for re-snapping to `Coord`).
pub fn build(segments: &[(Point, Point)]) -> Result<SegmentVd> {
    if segments.len() < 3 {
        return Err(SlicerError::InputGeometryInvalid(
            "voronoi construction needs at least 3 segments".into(),
        ));
    }

    let bv_lines: Vec<bv::Line<i64>> = segments
        .iter()
        .map(|(a, b)| bv::Line::new(bv::Point { x: a.x, y: a.y }, bv::Point { x: b.x, y: b.y }))
        .collect();

    let diagram = bv::Builder::<i64, f64>::default()
        .with_segments(bv_lines.iter())
        .map_err(|_| SlicerError::VoronoiDegenerate { ratio: 0.0 })?
        .build()
        .map_err(|_| SlicerError::VoronoiDegenerate { ratio: 0.0 })?;

    let to_point = |x: f64, y: f64| Point::new(x.round() as i64, y.round() as i64);

    let mut vertices = Vec::with_capacity(diagram.vertices().len());
    for v in diagram.vertices().iter() {
        let v = v.get();
        let incident_edge = v.get_incident_edge().ok().map(|e| e.0);
        vertices.push(VdVertex {
            point: to_point(v.x(), v.y()),
            is_site_point: v.is_site_point(),
            incident_edge,
        });
    }

    let mut edges = Vec::with_capacity(diagram.edges().len());
    for e in diagram.edges().iter() {
        let e = e.get();
        let edge_id = e.id();
        let vertex1 = diagram.edge_get_vertex1(edge_id).ok().flatten().map(|v| v.0);
        let cell = diagram
            .edge_get_cell(edge_id)
            .map(|c| c.0)
            .unwrap_or(usize::MAX);
        let rot_next = diagram.edge_rot_next(edge_id).map(|r| r.0).unwrap_or(edge_id.0);
        let is_infinite = diagram.edge_is_infinite(edge_id).unwrap_or(false);
        edges.push(VdEdge {
            vertex0: e.vertex0().map(|v| v.0),
            vertex1,
            twin: e.twin().map(|t| t.0).unwrap_or(edge_id.0),
            cell,
            rot_next,
            is_primary: e.is_primary(),
            is_secondary: e.is_secondary(),
            is_curved: e.is_curved(),
            is_infinite,
        });
    }

    let mut cells = Vec::with_capacity(diagram.cells().len());
    for c in diagram.cells().iter() {
        let c = c.get();
        let (index, category) = c.source_index_2();
        cells.push(VdCell {
            source_category: category.into(),
            source_index: index,
            contains_point: c.contains_point(),
            contains_segment: c.contains_segment(),
        });
    }

    Ok(SegmentVd {
        vertices,
        edges,
        cells,
        segments: segments.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_segments() -> Vec<(Point, Point)> {
        let p = |x: i64, y: i64| Point::new(x * slicer_geom::SCALE, y * slicer_geom::SCALE);
        vec![
            (p(0, 0), p(10, 0)),
            (p(10, 0), p(10, 10)),
            (p(10, 10), p(0, 10)),
            (p(0, 10), p(0, 0)),
        ]
    }

    #[test]
    fn builds_a_nonempty_diagram_for_a_square() {
        let vd = build(&square_segments()).unwrap();
        assert!(!vd.edges.is_empty());
        assert!(!vd.cells.is_empty());
        assert_eq!(vd.cells.len(), square_segments().len() * 2);
    }

    #[test]
    fn twin_of_twin_is_self() {
        let vd = build(&square_segments()).unwrap();
        for (i, _) in vd.edges.iter().enumerate() {
            assert_eq!(vd.twin(vd.twin(i)), i);
        }
    }

    #[test]
    fn too_few_segments_is_rejected() {
        let result = build(&square_segments()[..2]);
        assert!(result.is_err());
    }
}
