use foundation::math::GeoPoint;

use crate::geometry::Geometry;

/// Planar centroid in lon/lat space.
///
/// Areal geometry is area-weighted over every ring, so holes (wound the
/// opposite way) pull the centroid out of themselves. Zero-area input falls
/// back to the length-weighted centroid of its edges, then to the vertex mean.
pub fn planar_centroid(geometry: &Geometry) -> Option<GeoPoint> {
    let polygons = geometry.polygons();
    if !polygons.is_empty() {
        let mut acc = AreaAccumulator::default();
        for ring in polygons.iter().flat_map(|p| p.iter()) {
            acc.add_ring(ring);
        }
        if let Some(c) = acc.centroid() {
            return Some(c);
        }

        let mut lines = LineAccumulator::default();
        for ring in polygons.iter().flat_map(|p| p.iter()) {
            lines.add_line(ring);
        }
        if let Some(c) = lines.centroid() {
            return Some(c);
        }
    }

    match geometry {
        Geometry::LineString(line) => {
            let mut lines = LineAccumulator::default();
            lines.add_line(line);
            if let Some(c) = lines.centroid() {
                return Some(c);
            }
        }
        Geometry::MultiLineString(parts) => {
            let mut lines = LineAccumulator::default();
            for line in parts {
                lines.add_line(line);
            }
            if let Some(c) = lines.centroid() {
                return Some(c);
            }
        }
        _ => {}
    }

    vertex_mean(geometry)
}

#[derive(Default)]
struct AreaAccumulator {
    x: f64,
    y: f64,
    z: f64,
}

impl AreaAccumulator {
    fn add_ring(&mut self, ring: &[GeoPoint]) {
        for pair in ring.windows(2) {
            let (x0, y0) = (pair[0].lon_deg, pair[0].lat_deg);
            let (x1, y1) = (pair[1].lon_deg, pair[1].lat_deg);
            let cross = x0 * y1 - x1 * y0;
            self.x += (x0 + x1) * cross;
            self.y += (y0 + y1) * cross;
            self.z += cross;
        }
    }

    fn centroid(&self) -> Option<GeoPoint> {
        if self.z.abs() < 1e-12 {
            return None;
        }
        let w = 3.0 * self.z;
        Some(GeoPoint::new(self.x / w, self.y / w))
    }
}

#[derive(Default)]
struct LineAccumulator {
    x: f64,
    y: f64,
    length: f64,
}

impl LineAccumulator {
    fn add_line(&mut self, line: &[GeoPoint]) {
        for pair in line.windows(2) {
            let (x0, y0) = (pair[0].lon_deg, pair[0].lat_deg);
            let (x1, y1) = (pair[1].lon_deg, pair[1].lat_deg);
            let len = (x1 - x0).hypot(y1 - y0);
            self.x += len * (x0 + x1) * 0.5;
            self.y += len * (y0 + y1) * 0.5;
            self.length += len;
        }
    }

    fn centroid(&self) -> Option<GeoPoint> {
        (self.length > 0.0).then(|| GeoPoint::new(self.x / self.length, self.y / self.length))
    }
}

fn vertex_mean(geometry: &Geometry) -> Option<GeoPoint> {
    let (mut x, mut y, mut n) = (0.0, 0.0, 0usize);
    geometry.for_each_point(|p| {
        x += p.lon_deg;
        y += p.lat_deg;
        n += 1;
    });
    (n > 0).then(|| GeoPoint::new(x / n as f64, y / n as f64))
}
