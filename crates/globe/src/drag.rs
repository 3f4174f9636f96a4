use foundation::math::{Rotation, Vec2};
use serde::{Deserialize, Serialize};

/// Degrees of rotation per pixel of pointer travel.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragSettings {
    pub lambda_per_px: f64,
    pub phi_per_px: f64,
}

impl Default for DragSettings {
    fn default() -> Self {
        Self {
            lambda_per_px: 0.5,
            phi_per_px: 0.3,
        }
    }
}

/// Applies one pointer delta: longitude wraps into `[0, 360)`, latitude
/// clamps to `[-90, 90]`.
pub fn apply_drag(rotation: Rotation, dx: f64, dy: f64, settings: DragSettings) -> Rotation {
    Rotation {
        lambda_deg: (rotation.lambda_deg + dx * settings.lambda_per_px).rem_euclid(360.0),
        phi_deg: (rotation.phi_deg - dy * settings.phi_per_px).clamp(-90.0, 90.0),
        gamma_deg: rotation.gamma_deg,
    }
}

/// Pointer/touch drag state. Rotation itself lives with the caller.
#[derive(Debug, Default, Clone)]
pub struct DragController {
    settings: DragSettings,
    last_pos: Option<Vec2>,
}

impl DragController {
    pub fn new(settings: DragSettings) -> Self {
        Self {
            settings,
            last_pos: None,
        }
    }

    pub fn settings(&self) -> DragSettings {
        self.settings
    }

    pub fn is_dragging(&self) -> bool {
        self.last_pos.is_some()
    }

    pub fn pointer_down(&mut self, pos: Vec2) {
        self.last_pos = Some(pos);
    }

    /// Rotates `rotation` by the travel since the last event. Returns whether
    /// a drag was in progress.
    pub fn pointer_move(&mut self, pos: Vec2, rotation: &mut Rotation) -> bool {
        let Some(last) = self.last_pos else {
            return false;
        };
        let delta = pos - last;
        *rotation = apply_drag(*rotation, delta.x, delta.y, self.settings);
        self.last_pos = Some(pos);
        true
    }

    pub fn pointer_up(&mut self) {
        self.last_pos = None;
    }

    pub fn pointer_leave(&mut self) {
        self.last_pos = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{DragController, DragSettings, apply_drag};
    use foundation::math::{Rotation, Vec2};

    #[test]
    fn latitude_is_clamped() {
        let s = DragSettings::default();
        let r = apply_drag(Rotation::new(0.0, 80.0), 0.0, -1000.0, s);
        assert_eq!(r.phi_deg, 90.0);
        let r = apply_drag(Rotation::new(0.0, -80.0), 0.0, 1000.0, s);
        assert_eq!(r.phi_deg, -90.0);
    }

    #[test]
    fn repeated_large_deltas_stay_in_range() {
        let s = DragSettings::default();
        let mut r = Rotation::default();
        for _ in 0..50 {
            // 400 px * 0.5 = 200 degrees per step.
            r = apply_drag(r, 400.0, 0.0, s);
            assert!((0.0..360.0).contains(&r.lambda_deg), "{}", r.lambda_deg);
        }
        let r = apply_drag(Rotation::new(10.0, 0.0), -100.0, 0.0, s);
        assert_eq!(r.lambda_deg, 320.0);
    }

    #[test]
    fn moves_only_while_pressed() {
        let mut drag = DragController::default();
        let mut rotation = Rotation::default();
        assert!(!drag.pointer_move(Vec2::new(10.0, 0.0), &mut rotation));
        assert_eq!(rotation, Rotation::default());

        drag.pointer_down(Vec2::new(100.0, 100.0));
        assert!(drag.pointer_move(Vec2::new(110.0, 90.0), &mut rotation));
        assert_eq!(rotation.lambda_deg, 5.0);
        assert!((rotation.phi_deg - 3.0).abs() < 1e-12);

        drag.pointer_leave();
        assert!(!drag.is_dragging());
        assert!(!drag.pointer_move(Vec2::new(200.0, 0.0), &mut rotation));
        assert_eq!(rotation.lambda_deg, 5.0);
    }
}
