//! Great-circle interpolation between two points on the unit sphere.
//!
//! [`GreatArc`] is an immutable value: all trig terms are derived once when it
//! is built, so sampling it every animation frame costs two `sin` calls and two
//! `atan2` calls. [`GreatArcInterpolator`] wraps it behind a reconfigurable
//! source/target pair and rebuilds the arc lazily after either end moves.

use super::{GeoPoint, Vec3};

/// Below this the endpoints are treated as coincident (or exactly opposite).
///
/// `acos` near ±1 turns a rounding error of 1e-16 in its argument into ~1.5e-8
/// radians, so the threshold has to sit well above that.
const EPSILON: f64 = 1e-7;

/// Per-endpoint terms reused by every sample.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Endpoint {
    point: GeoPoint,
    lon_rad: f64,
    /// cos(lat)
    cy: f64,
    /// sin(lat)
    sy: f64,
    /// cos(lat) * cos(lon)
    kx: f64,
    /// cos(lat) * sin(lon)
    ky: f64,
}

impl Endpoint {
    fn new(point: GeoPoint) -> Self {
        let lon_rad = point.lon_deg.to_radians();
        let lat_rad = point.lat_deg.to_radians();
        let cy = lat_rad.cos();
        let sy = lat_rad.sin();
        Self {
            point,
            lon_rad,
            cy,
            sy,
            kx: cy * lon_rad.cos(),
            ky: cy * lon_rad.sin(),
        }
    }

    fn vector(&self) -> Vec3 {
        Vec3::new(self.kx, self.ky, self.sy)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum ArcShape {
    /// Source and target coincide; every sample is the source.
    Point,
    /// The usual case: `k = 1 / sin(d)` is finite.
    Slerp { k: f64 },
    /// Source and target are antipodal, so any great circle through both is
    /// shortest. Rotate about a fixed axis perpendicular to the source.
    Antipodal { axis: Vec3 },
}

/// Shortest great-circle path between two points.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GreatArc {
    p0: Endpoint,
    p1: Endpoint,
    /// Angular distance in radians.
    d: f64,
    shape: ArcShape,
}

impl GreatArc {
    pub fn new(source: GeoPoint, target: GeoPoint) -> Self {
        Self::from_endpoints(Endpoint::new(source), Endpoint::new(target))
    }

    fn from_endpoints(p0: Endpoint, p1: Endpoint) -> Self {
        // Clamped: rounding can push the cosine just past ±1 and acos would NaN.
        let cos_d = (p0.sy * p1.sy + p0.cy * p1.cy * (p1.lon_rad - p0.lon_rad).cos()).clamp(-1.0, 1.0);
        let d = cos_d.acos();
        let sin_d = d.sin();

        if d < EPSILON {
            return Self {
                p0,
                p1,
                d: 0.0,
                shape: ArcShape::Point,
            };
        }

        let shape = if sin_d.abs() < EPSILON {
            ArcShape::Antipodal {
                axis: perpendicular_axis(p0.vector()),
            }
        } else {
            ArcShape::Slerp { k: 1.0 / sin_d }
        };

        Self { p0, p1, d, shape }
    }

    pub fn source(&self) -> GeoPoint {
        self.p0.point
    }

    pub fn target(&self) -> GeoPoint {
        self.p1.point
    }

    /// Angular great-circle distance in radians.
    pub fn distance(&self) -> f64 {
        self.d
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self.shape, ArcShape::Point)
    }

    /// Point at fraction `t` of the way from source to target.
    ///
    /// `t` is clamped into `[0, 1]`; NaN is treated as 0.
    pub fn interpolate(&self, t: f64) -> GeoPoint {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self.shape {
            ArcShape::Point => self.p0.point,
            ArcShape::Slerp { k } => {
                let td = t * self.d;
                let b = td.sin() * k;
                let a = (self.d - td).sin() * k;
                let x = a * self.p0.kx + b * self.p1.kx;
                let y = a * self.p0.ky + b * self.p1.ky;
                let z = a * self.p0.sy + b * self.p1.sy;
                GeoPoint::from_vector(Vec3::new(x, y, z))
            }
            ArcShape::Antipodal { axis } => {
                let v = self.p0.vector();
                let theta = t * self.d;
                // Rodrigues' rotation with axis ⟂ v, so the axis·v term vanishes.
                let rotated = v.scale(theta.cos()) + axis.cross(v).scale(theta.sin());
                GeoPoint::from_vector(rotated)
            }
        }
    }
}

fn perpendicular_axis(v: Vec3) -> Vec3 {
    let axis = v.cross(Vec3::new(0.0, 0.0, 1.0));
    if axis.length() > 1e-6 {
        axis.normalize()
    } else {
        v.cross(Vec3::new(1.0, 0.0, 0.0)).normalize()
    }
}

/// Reconfigurable interpolator with a lazily computed distance.
///
/// Moving either endpoint recomputes that endpoint's trig terms and drops the
/// cached arc; [`GreatArcInterpolator::distance`] or the first sample rebuilds it.
#[derive(Debug, Clone)]
pub struct GreatArcInterpolator {
    p0: Endpoint,
    p1: Endpoint,
    arc: Option<GreatArc>,
}

impl Default for GreatArcInterpolator {
    fn default() -> Self {
        let origin = GeoPoint::new(0.0, 0.0);
        Self::new(origin, origin)
    }
}

impl GreatArcInterpolator {
    pub fn new(source: GeoPoint, target: GeoPoint) -> Self {
        Self {
            p0: Endpoint::new(source),
            p1: Endpoint::new(target),
            arc: None,
        }
    }

    pub fn source(&mut self, point: GeoPoint) -> &mut Self {
        self.p0 = Endpoint::new(point);
        self.arc = None;
        self
    }

    pub fn target(&mut self, point: GeoPoint) -> &mut Self {
        self.p1 = Endpoint::new(point);
        self.arc = None;
        self
    }

    /// Whether the distance is cached for the current endpoints.
    pub fn is_resolved(&self) -> bool {
        self.arc.is_some()
    }

    /// Angular distance in radians; computed once per endpoint configuration.
    pub fn distance(&mut self) -> f64 {
        self.arc().distance()
    }

    pub fn arc(&mut self) -> GreatArc {
        let (p0, p1) = (self.p0, self.p1);
        *self
            .arc
            .get_or_insert_with(|| GreatArc::from_endpoints(p0, p1))
    }

    pub fn interpolate(&mut self, t: f64) -> GeoPoint {
        self.arc().interpolate(t)
    }
}

#[cfg(test)]
mod tests {
    use super::{GreatArc, GreatArcInterpolator};
    use crate::math::{GeoPoint, angular_distance};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn assert_point(p: GeoPoint, lon: f64, lat: f64) {
        assert_close(p.lon_deg, lon, 1e-6);
        assert_close(p.lat_deg, lat, 1e-6);
    }

    #[test]
    fn endpoints_are_reproduced() {
        let pairs = [
            (GeoPoint::new(0.0, 0.0), GeoPoint::new(90.0, 0.0)),
            (GeoPoint::new(-73.9, 40.7), GeoPoint::new(139.7, 35.7)),
            (GeoPoint::new(170.0, -10.0), GeoPoint::new(-170.0, 12.0)),
            (GeoPoint::new(12.5, 89.0), GeoPoint::new(-45.0, -60.0)),
        ];
        for (a, b) in pairs {
            let arc = GreatArc::new(a, b);
            assert_point(arc.interpolate(0.0), a.lon_deg, a.lat_deg);
            assert_point(arc.interpolate(1.0), b.lon_deg, b.lat_deg);
        }
    }

    #[test]
    fn equator_quarter_turn() {
        let arc = GreatArc::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(90.0, 0.0));
        assert_close(arc.distance(), std::f64::consts::FRAC_PI_2, 1e-12);
        assert_point(arc.interpolate(0.5), 45.0, 0.0);
    }

    #[test]
    fn midpoint_is_equidistant() {
        let a = GeoPoint::new(-0.1, 51.5);
        let b = GeoPoint::new(-74.0, 40.7);
        let arc = GreatArc::new(a, b);
        let m = arc.interpolate(0.5);
        assert_close(angular_distance(a, m), angular_distance(m, b), 1e-9);
        assert_close(angular_distance(a, m) * 2.0, arc.distance(), 1e-9);
    }

    #[test]
    fn distance_is_symmetric_and_reverse_path_matches() {
        let a = GeoPoint::new(10.0, 20.0);
        let b = GeoPoint::new(100.0, -30.0);
        let forward = GreatArc::new(a, b);
        let backward = GreatArc::new(b, a);
        assert_close(forward.distance(), backward.distance(), 1e-12);

        for i in 0..=10 {
            let t = i as f64 / 10.0;
            let p = forward.interpolate(t);
            let q = backward.interpolate(1.0 - t);
            assert!(angular_distance(p, q) < 1e-9, "t={t}: {p:?} vs {q:?}");
        }
    }

    #[test]
    fn coincident_points_do_not_produce_nan() {
        let a = GeoPoint::new(33.0, -12.0);
        let arc = GreatArc::new(a, a);
        assert_eq!(arc.distance(), 0.0);
        assert!(arc.is_degenerate());
        for t in [0.0, 0.25, 0.5, 1.0] {
            assert_eq!(arc.interpolate(t), a);
        }
    }

    #[test]
    fn antipodal_points_stay_finite() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(180.0, 0.0);
        let arc = GreatArc::new(a, b);
        assert_close(arc.distance(), std::f64::consts::PI, 1e-9);
        for i in 0..=8 {
            let p = arc.interpolate(i as f64 / 8.0);
            assert!(p.is_finite(), "{p:?}");
        }
        let mid = arc.interpolate(0.5);
        assert_close(angular_distance(a, mid), std::f64::consts::FRAC_PI_2, 1e-9);
        assert!(angular_distance(arc.interpolate(1.0), b) < 1e-9);
    }

    #[test]
    fn t_outside_unit_range_is_clamped() {
        let arc = GreatArc::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(40.0, 0.0));
        assert_point(arc.interpolate(-1.0), 0.0, 0.0);
        assert_point(arc.interpolate(2.0), 40.0, 0.0);
        assert_point(arc.interpolate(f64::NAN), 0.0, 0.0);
    }

    #[test]
    fn reconfiguring_invalidates_cached_distance() {
        let mut interp = GreatArcInterpolator::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(90.0, 0.0));
        assert!(!interp.is_resolved());
        assert_close(interp.distance(), std::f64::consts::FRAC_PI_2, 1e-12);
        assert!(interp.is_resolved());

        interp.target(GeoPoint::new(0.0, 0.0));
        assert!(!interp.is_resolved());
        assert_eq!(interp.distance(), 0.0);

        interp.source(GeoPoint::new(-30.0, 0.0)).target(GeoPoint::new(30.0, 0.0));
        assert_point(interp.interpolate(0.5), 0.0, 0.0);
    }
}
