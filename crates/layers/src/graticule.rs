use formats::geometry::Geometry;
use foundation::math::GeoPoint;

const EPS: f64 = 1e-6;

/// Meridians and parallels on a regular grid.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Graticule {
    /// `[[lon0, lat0], [lon1, lat1]]`.
    pub extent: [[f64; 2]; 2],
    /// Grid spacing `[dlon, dlat]` in degrees.
    pub step: [f64; 2],
    /// Sample spacing along each line, in degrees.
    pub precision: f64,
}

impl Default for Graticule {
    fn default() -> Self {
        Self {
            extent: [[-180.0, -90.0], [179.9, 89.9]],
            step: [10.0, 10.0],
            precision: 2.5,
        }
    }
}

impl Graticule {
    pub fn meridians(&self) -> Vec<Vec<GeoPoint>> {
        let [[x0, y0], [x1, y1]] = self.extent;
        let ys = samples(y0, y1, self.precision);
        grid(x0, x1, self.step[0])
            .into_iter()
            .map(|x| ys.iter().map(|&y| GeoPoint::new(x, y)).collect())
            .collect()
    }

    /// Parallels strictly between the poles; a pole parallel collapses to a point.
    pub fn parallels(&self) -> Vec<Vec<GeoPoint>> {
        let [[x0, y0], [x1, y1]] = self.extent;
        let xs = samples(x0, x1, self.precision);
        grid(y0, y1, self.step[1])
            .into_iter()
            .filter(|y| y.abs() < 90.0 - EPS)
            .map(|y| xs.iter().map(|&x| GeoPoint::new(x, y)).collect())
            .collect()
    }

    pub fn lines(&self) -> Vec<Vec<GeoPoint>> {
        let mut lines = self.meridians();
        lines.extend(self.parallels());
        lines
    }

    pub fn geometry(&self) -> Geometry {
        Geometry::MultiLineString(self.lines())
    }
}

/// Multiples of `step` in `[start, end)`.
fn grid(start: f64, end: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 {
        return Vec::new();
    }
    let first = (start / step).ceil() as i64;
    (first..)
        .map(|i| i as f64 * step)
        .take_while(|v| *v < end - EPS)
        .collect()
}

/// `start`, `start + step`, ... up to but excluding `end`, then `end` itself.
fn samples(start: f64, end: f64, step: f64) -> Vec<f64> {
    let mut out = Vec::new();
    if step > 0.0 {
        let mut i = 0;
        loop {
            let v = start + i as f64 * step;
            if v >= end - EPS {
                break;
            }
            out.push(v);
            i += 1;
        }
    }
    out.push(end);
    out
}

#[cfg(test)]
mod tests {
    use super::Graticule;

    #[test]
    fn default_grid_line_counts() {
        let g = Graticule::default();
        assert_eq!(g.meridians().len(), 36);
        assert_eq!(g.parallels().len(), 17);
        assert_eq!(g.lines().len(), 53);
    }

    #[test]
    fn meridians_span_the_extent() {
        let g = Graticule::default();
        let first = &g.meridians()[0];
        assert_eq!(first[0].lon_deg, -180.0);
        assert_eq!(first[0].lat_deg, -90.0);
        assert_eq!(first.last().map(|p| p.lat_deg), Some(89.9));
        // -90 .. 87.5 in 2.5 steps, then the end point.
        assert_eq!(first.len(), 73);
    }

    #[test]
    fn parallels_skip_the_poles() {
        let g = Graticule::default();
        let lats: Vec<f64> = g.parallels().iter().map(|l| l[0].lat_deg).collect();
        assert_eq!(lats.first(), Some(&-80.0));
        assert_eq!(lats.last(), Some(&80.0));
    }
}
