//! 2D polygon set operations for region solving
//!
//! Solid cross-sections are `geo` multipolygons (holes preserved); boolean
//! intersections come from `geo` and inward insets from `cavalier_contours`
//! parallel offsets, converting rings between the two representations.

use cavalier_contours::polyline::{PlineSource, PlineSourceMut, Polyline};
use geo::{Area, BooleanOps, Coord, LineString, MultiPolygon, Polygon};

/// Intersection of two solid sets, dropping result fragments with area
/// below `minimum_area`.
pub fn intersection(
    a: &MultiPolygon<f64>,
    b: &MultiPolygon<f64>,
    minimum_area: f64,
) -> MultiPolygon<f64> {
    filter_area(a.intersection(b), minimum_area)
}

/// Inset `regions` inward by `distance` (outers shrink, holes grow),
/// dropping fragments with area below `minimum_area`.
pub fn inset(regions: &MultiPolygon<f64>, distance: f64, minimum_area: f64) -> MultiPolygon<f64> {
    if distance == 0.0 {
        return filter_area(regions.clone(), minimum_area);
    }

    let mut shrunk: Vec<Polygon<f64>> = Vec::new();
    let mut grown_holes: Vec<Polygon<f64>> = Vec::new();
    for polygon in &regions.0 {
        shrunk.extend(offset_ring(polygon.exterior(), distance));
        for hole in polygon.interiors() {
            grown_holes.extend(offset_ring(hole, -distance));
        }
    }

    let shrunk = MultiPolygon(shrunk);
    let result = if grown_holes.is_empty() {
        shrunk
    } else {
        shrunk.difference(&MultiPolygon(grown_holes))
    };
    filter_area(result, minimum_area)
}

pub(crate) fn filter_area(regions: MultiPolygon<f64>, minimum_area: f64) -> MultiPolygon<f64> {
    if minimum_area <= 0.0 {
        return regions;
    }
    MultiPolygon(
        regions
            .0
            .into_iter()
            .filter(|polygon| polygon.unsigned_area() >= minimum_area)
            .collect(),
    )
}

/// Offset one closed ring; positive distance moves inward.
fn offset_ring(ring: &LineString<f64>, distance: f64) -> Vec<Polygon<f64>> {
    let pline = ring_to_pline(ring);
    if pline.vertex_data.len() < 3 {
        return Vec::new();
    }
    pline
        .parallel_offset(distance)
        .into_iter()
        .filter(|offset| offset.vertex_data.len() >= 3)
        .map(pline_to_polygon)
        .collect()
}

/// Convert a geo ring to a closed CCW polyline. Geo rings repeat the first
/// coordinate at the end; the closing duplicate is dropped.
fn ring_to_pline(ring: &LineString<f64>) -> Polyline<f64> {
    let coords = ring.0.as_slice();
    let open = match coords.split_last() {
        Some((last, rest)) if rest.first() == Some(last) => rest,
        _ => coords,
    };

    let mut signed_area = 0.0;
    for i in 0..open.len() {
        let p1 = open[i];
        let p2 = open[(i + 1) % open.len()];
        signed_area += p1.x * p2.y - p2.x * p1.y;
    }

    let mut pline = Polyline::new_closed();
    if signed_area < 0.0 {
        for c in open.iter().rev() {
            pline.add(c.x, c.y, 0.0);
        }
    } else {
        for c in open {
            pline.add(c.x, c.y, 0.0);
        }
    }
    pline
}

fn pline_to_polygon(pline: Polyline<f64>) -> Polygon<f64> {
    let coords: Vec<Coord<f64>> = pline
        .vertex_data
        .iter()
        .map(|v| Coord { x: v.x, y: v.y })
        .collect();
    Polygon::new(LineString::from(coords), Vec::new())
}
