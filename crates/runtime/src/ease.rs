use serde::{Deserialize, Serialize};

/// Easing curve applied to a tween's normalized time.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ease {
    Linear,
    #[default]
    CubicInOut,
}

impl Ease {
    /// Maps `t` in `[0, 1]` onto `[0, 1]`, fixing both ends.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::CubicInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    0.5 * t * t * t
                } else {
                    let t = t - 2.0;
                    0.5 * (t * t * t + 2.0)
                }
            }
        }
    }
}
