use serde::{Deserialize, Serialize};

use super::Vec3;

/// Longitude/latitude on the unit sphere, in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    /// `x = cos(lat)cos(lon), y = cos(lat)sin(lon), z = sin(lat)`.
    pub fn to_unit_vector(self) -> Vec3 {
        let lon = self.lon_deg.to_radians();
        let lat = self.lat_deg.to_radians();
        let cos_lat = lat.cos();
        Vec3::new(cos_lat * lon.cos(), cos_lat * lon.sin(), lat.sin())
    }

    /// Inverse of [`GeoPoint::to_unit_vector`]. The vector need not be normalized.
    pub fn from_vector(v: Vec3) -> Self {
        let lon = v.y.atan2(v.x);
        let lat = v.z.atan2(v.x.hypot(v.y));
        Self::new(lon.to_degrees(), lat.to_degrees())
    }

    /// The point a globe must be rotated by to bring `self` to the view centre.
    pub fn negated(self) -> Self {
        Self::new(-self.lon_deg, -self.lat_deg)
    }

    pub fn is_finite(self) -> bool {
        self.lon_deg.is_finite() && self.lat_deg.is_finite()
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

/// Angular distance between two points, in radians.
pub fn angular_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    a.to_unit_vector()
        .dot(b.to_unit_vector())
        .clamp(-1.0, 1.0)
        .acos()
}

/// Spherical area of a ring in steradians, in `[0, 4π)`.
///
/// Rings wound clockwise (interior on the right when seen from outside the
/// sphere) enclose the smaller side and yield less than `2π`. Longitude
/// differences go through `sin`/`cos`, so rings crossing the antimeridian need
/// no unwrapping.
pub fn spherical_ring_area(ring: &[GeoPoint]) -> f64 {
    let Some(first) = ring.first() else {
        return 0.0;
    };

    let half = |lat_deg: f64| lat_deg.to_radians() / 2.0 + std::f64::consts::FRAC_PI_4;
    let mut lon0 = first.lon_deg.to_radians();
    let (mut sin0, mut cos0) = half(first.lat_deg).sin_cos();
    let mut sum = 0.0;

    for p in ring.iter().skip(1).chain(std::iter::once(first)) {
        let lon = p.lon_deg.to_radians();
        let (sin1, cos1) = half(p.lat_deg).sin_cos();
        let dlon = lon - lon0;
        let sign = if dlon >= 0.0 { 1.0 } else { -1.0 };
        let adlon = sign * dlon;
        let k = sin0 * sin1;
        let u = cos0 * cos1 + k * adlon.cos();
        let v = k * sign * adlon.sin();
        sum += v.atan2(u);
        lon0 = lon;
        sin0 = sin1;
        cos0 = cos1;
    }

    let area = 2.0 * sum;
    if area < 0.0 {
        area + 4.0 * std::f64::consts::PI
    } else {
        area
    }
}

/// Whether a ring is wound with its interior on the right (the exterior-ring
/// convention of world topologies).
pub fn is_clockwise_ring(ring: &[GeoPoint]) -> bool {
    spherical_ring_area(ring) < 2.0 * std::f64::consts::PI
}
