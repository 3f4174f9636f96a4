use serde::{Deserialize, Serialize};

use super::{GeoPoint, Vec3};

/// Sphere rotation in degrees: a longitude shift by `lambda`, then a tilt by
/// `phi` about the y axis and a roll by `gamma` about the x axis.
///
/// A rotation of `(-lon, -lat)` brings `(lon, lat)` to the view centre.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub lambda_deg: f64,
    pub phi_deg: f64,
    #[serde(default)]
    pub gamma_deg: f64,
}

impl Rotation {
    pub fn new(lambda_deg: f64, phi_deg: f64) -> Self {
        Self {
            lambda_deg,
            phi_deg,
            gamma_deg: 0.0,
        }
    }

    pub fn with_gamma(mut self, gamma_deg: f64) -> Self {
        self.gamma_deg = gamma_deg;
        self
    }

    /// Reads `[lambda, phi]` as a point so rotations can be interpolated on the sphere.
    pub fn as_point(self) -> GeoPoint {
        GeoPoint::new(self.lambda_deg, self.phi_deg)
    }

    pub fn from_point(point: GeoPoint) -> Self {
        Self::new(point.lon_deg, point.lat_deg)
    }

    pub fn is_finite(self) -> bool {
        self.lambda_deg.is_finite() && self.phi_deg.is_finite() && self.gamma_deg.is_finite()
    }

    pub fn rotator(self) -> Rotator {
        Rotator::new(self)
    }
}

/// Precomputed trig for applying a [`Rotation`] to many points.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rotator {
    cos_lambda: f64,
    sin_lambda: f64,
    cos_phi: f64,
    sin_phi: f64,
    cos_gamma: f64,
    sin_gamma: f64,
}

impl Rotator {
    pub fn new(rotation: Rotation) -> Self {
        let lambda = rotation.lambda_deg.to_radians();
        let phi = rotation.phi_deg.to_radians();
        let gamma = rotation.gamma_deg.to_radians();
        Self {
            cos_lambda: lambda.cos(),
            sin_lambda: lambda.sin(),
            cos_phi: phi.cos(),
            sin_phi: phi.sin(),
            cos_gamma: gamma.cos(),
            sin_gamma: gamma.sin(),
        }
    }

    pub fn rotate_vector(&self, v: Vec3) -> Vec3 {
        let x = v.x * self.cos_lambda - v.y * self.sin_lambda;
        let y = v.x * self.sin_lambda + v.y * self.cos_lambda;
        let z = v.z;

        let k = z * self.cos_phi + x * self.sin_phi;
        Vec3::new(
            x * self.cos_phi - z * self.sin_phi,
            y * self.cos_gamma - k * self.sin_gamma,
            k * self.cos_gamma + y * self.sin_gamma,
        )
    }

    pub fn invert_vector(&self, v: Vec3) -> Vec3 {
        let k = v.z * self.cos_gamma - v.y * self.sin_gamma;
        let x = v.x * self.cos_phi + k * self.sin_phi;
        let y = v.y * self.cos_gamma + v.z * self.sin_gamma;
        let z = k * self.cos_phi - v.x * self.sin_phi;

        Vec3::new(
            x * self.cos_lambda + y * self.sin_lambda,
            -x * self.sin_lambda + y * self.cos_lambda,
            z,
        )
    }

    pub fn rotate(&self, point: GeoPoint) -> GeoPoint {
        GeoPoint::from_vector(self.rotate_vector(point.to_unit_vector()))
    }

    pub fn invert(&self, point: GeoPoint) -> GeoPoint {
        GeoPoint::from_vector(self.invert_vector(point.to_unit_vector()))
    }
}
