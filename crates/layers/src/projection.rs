use foundation::math::{GeoPoint, Rotation, Rotator, Vec2, Vec3};

use crate::clip::ClipCircle;

pub const DEFAULT_SCALE: f64 = 250.0;
pub const DEFAULT_CLIP_ANGLE_DEG: f64 = 90.0;
pub const DEFAULT_RESAMPLE_STEP_DEG: f64 = 2.0;

/// Orthographic view of the unit sphere.
///
/// Setters chain so a caller can flip the same projection between the back
/// and front passes without rebuilding it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Orthographic {
    scale: f64,
    translate: Vec2,
    rotation: Rotation,
    clip_angle_deg: f64,
    resample_step_deg: f64,
}

impl Default for Orthographic {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            translate: Vec2::new(250.0, 250.0),
            rotation: Rotation::default(),
            clip_angle_deg: DEFAULT_CLIP_ANGLE_DEG,
            resample_step_deg: DEFAULT_RESAMPLE_STEP_DEG,
        }
    }
}

impl Orthographic {
    /// Globe filling the shorter side of a `width` x `height` surface.
    pub fn for_surface(width: f64, height: f64) -> Self {
        Self {
            scale: 0.5 * width.min(height),
            translate: Vec2::new(0.5 * width, 0.5 * height),
            ..Self::default()
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translate(&self) -> Vec2 {
        self.translate
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn clip_angle_deg(&self) -> f64 {
        self.clip_angle_deg
    }

    pub fn resample_step_deg(&self) -> f64 {
        self.resample_step_deg
    }

    pub fn set_rotation(&mut self, rotation: Rotation) -> &mut Self {
        self.rotation = rotation;
        self
    }

    pub fn set_clip_angle(&mut self, clip_angle_deg: f64) -> &mut Self {
        self.clip_angle_deg = clip_angle_deg;
        self
    }

    pub fn set_resample_step(&mut self, step_deg: f64) -> &mut Self {
        self.resample_step_deg = step_deg;
        self
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_clip_angle(mut self, clip_angle_deg: f64) -> Self {
        self.clip_angle_deg = clip_angle_deg;
        self
    }

    pub fn rotator(&self) -> Rotator {
        self.rotation.rotator()
    }

    pub fn clip(&self) -> ClipCircle {
        ClipCircle::new(self.clip_angle_deg, self.resample_step_deg)
    }

    /// Screen position of an already rotated unit vector. No clipping.
    pub fn project_rotated(&self, v: Vec3) -> Vec2 {
        Vec2::new(
            self.translate.x + self.scale * v.y,
            self.translate.y - self.scale * v.z,
        )
    }

    /// Screen position of a geographic point, or `None` if it is clipped.
    pub fn project(&self, point: GeoPoint) -> Option<Vec2> {
        let v = self.rotator().rotate_vector(point.to_unit_vector());
        self.clip()
            .contains(v)
            .then(|| self.project_rotated(v))
    }

    /// Geographic point under a screen position on the front hemisphere.
    pub fn invert(&self, screen: Vec2) -> Option<GeoPoint> {
        if self.scale <= 0.0 {
            return None;
        }
        let y = (screen.x - self.translate.x) / self.scale;
        let z = (self.translate.y - screen.y) / self.scale;
        let rho2 = y * y + z * z;
        if rho2 > 1.0 {
            return None;
        }
        let v = Vec3::new((1.0 - rho2).sqrt(), y, z);
        Some(GeoPoint::from_vector(self.rotator().invert_vector(v)))
    }

    /// Centre and radius of the globe's silhouette.
    pub fn outline(&self) -> (Vec2, f64) {
        (self.translate, self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::Orthographic;
    use foundation::math::{GeoPoint, Rotation, Vec2};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn centre_projects_to_translate() {
        let p = Orthographic::default()
            .project(GeoPoint::new(0.0, 0.0))
            .expect("visible");
        assert_close(p.x, 250.0, 1e-9);
        assert_close(p.y, 250.0, 1e-9);
    }

    #[test]
    fn east_and_north_map_right_and_up() {
        let proj = Orthographic::default();
        let east = proj.project(GeoPoint::new(90.0 - 1e-9, 0.0)).expect("visible");
        assert_close(east.x, 500.0, 1e-6);
        let north = proj.project(GeoPoint::new(0.0, 90.0 - 1e-9)).expect("visible");
        assert_close(north.y, 0.0, 1e-6);
    }

    #[test]
    fn far_side_clipped_only_at_ninety() {
        let mut proj = Orthographic::default();
        let far = GeoPoint::new(180.0, 0.0);
        assert!(proj.project(far).is_none());
        proj.set_clip_angle(180.0);
        assert!(proj.project(far).is_some());
    }

    #[test]
    fn rotation_brings_target_to_centre() {
        let proj = Orthographic::default().with_rotation(Rotation::new(-40.0, -30.0));
        let p = proj.project(GeoPoint::new(40.0, 30.0)).expect("visible");
        assert_close(p.x, 250.0, 1e-9);
        assert_close(p.y, 250.0, 1e-9);
    }

    #[test]
    fn invert_undoes_project() {
        let proj = Orthographic::default().with_rotation(Rotation::new(20.0, -10.0));
        let geo = GeoPoint::new(-15.0, 25.0);
        let screen = proj.project(geo).expect("visible");
        let back = proj.invert(screen).expect("on globe");
        assert_close(back.lon_deg, geo.lon_deg, 1e-9);
        assert_close(back.lat_deg, geo.lat_deg, 1e-9);
        assert!(proj.invert(Vec2::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn surface_sizing_fits_shorter_side() {
        let proj = Orthographic::for_surface(800.0, 500.0);
        assert_eq!(proj.outline(), (Vec2::new(400.0, 250.0), 250.0));
    }
}
