//! Small-circle clipping on the rotated sphere.
//!
//! All geometry here is already rotated so the view centre sits on +x. The
//! visible region is the cap `x > cos(radius)`; a radius of 180° or more keeps
//! everything, which is how the back layer shows far-side geometry.

use std::f64::consts::{PI, TAU};

use foundation::math::Vec3;

const BISECT_STEPS: usize = 40;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClipCircle {
    radius_rad: f64,
    cos_radius: f64,
    sin_radius: f64,
    /// Maximum angular step when walking along the clip edge.
    step_rad: f64,
}

impl ClipCircle {
    pub fn new(radius_deg: f64, step_deg: f64) -> Self {
        let radius_rad = radius_deg.to_radians();
        Self {
            radius_rad,
            cos_radius: radius_rad.cos(),
            sin_radius: radius_rad.sin(),
            step_rad: step_deg.to_radians().max(1e-3),
        }
    }

    pub fn radius_deg(&self) -> f64 {
        self.radius_rad.to_degrees()
    }

    pub fn is_unbounded(&self) -> bool {
        self.radius_rad >= PI - 1e-9
    }

    pub fn contains(&self, v: Vec3) -> bool {
        self.is_unbounded() || v.x > self.cos_radius
    }

    /// Splits a polyline into its visible runs, ending and starting each run
    /// exactly on the clip edge.
    pub fn clip_line(&self, points: &[Vec3]) -> Vec<Vec<Vec3>> {
        if self.is_unbounded() {
            return if points.len() >= 2 {
                vec![points.to_vec()]
            } else {
                Vec::new()
            };
        }

        let mut runs = Vec::new();
        let mut current: Vec<Vec3> = Vec::new();
        let mut prev: Option<(Vec3, bool)> = None;

        for &p in points {
            let inside = self.contains(p);
            match prev {
                None => {
                    if inside {
                        current.push(p);
                    }
                }
                Some((a, a_in)) => match (a_in, inside) {
                    (true, true) => current.push(p),
                    (true, false) => {
                        current.push(self.crossing(a, p));
                        runs.push(std::mem::take(&mut current));
                    }
                    (false, true) => {
                        current.push(self.crossing(p, a));
                        current.push(p);
                    }
                    (false, false) => {}
                },
            }
            prev = Some((p, inside));
        }
        runs.push(current);

        runs.retain(|run| run.len() >= 2);
        runs
    }

    /// Clips a closed ring, re-closing each visible piece along the clip edge.
    ///
    /// `clockwise` is the ring's winding as seen from outside the sphere. Each
    /// exit from the cap is joined to the nearest entry reached by walking the
    /// edge in that direction, so clockwise rings follow the circle clockwise
    /// and holes the other way. A ring that cuts the edge several times can
    /// come back as several pieces.
    ///
    /// Returns closed rings (first point repeated last); empty when nothing of
    /// the ring is visible.
    pub fn clip_ring(&self, ring: &[Vec3], clockwise: bool) -> Vec<Vec<Vec3>> {
        let mut pts = ring.to_vec();
        if pts.len() >= 2 && pts.first() == pts.last() {
            pts.pop();
        }
        if pts.len() < 3 {
            return Vec::new();
        }

        let inside: Vec<bool> = pts.iter().map(|&p| self.contains(p)).collect();
        if inside.iter().all(|&i| i) {
            pts.push(pts[0]);
            return vec![pts];
        }
        if inside.iter().all(|&i| !i) {
            return if encircles_centre(&pts, clockwise) {
                vec![self.full_edge(clockwise)]
            } else {
                Vec::new()
            };
        }

        let segments = self.visible_segments(&pts, &inside);
        self.rejoin(&segments, clockwise)
    }

    /// Visible stretches of a ring, each running from an entry crossing to
    /// an exit crossing.
    fn visible_segments(&self, pts: &[Vec3], inside: &[bool]) -> Vec<Segment> {
        let n = pts.len();
        // Begin just before an entry so the walk ends on a hidden vertex.
        let Some(start) = (0..n).find(|&i| !inside[i] && inside[(i + 1) % n]) else {
            return Vec::new();
        };

        let mut segments = Vec::new();
        let mut current: Vec<Vec3> = Vec::new();
        for k in 0..n {
            let (i, j) = ((start + k) % n, (start + k + 1) % n);
            match (inside[i], inside[j]) {
                (true, true) => current.push(pts[j]),
                (true, false) => {
                    let exit = self.crossing(pts[i], pts[j]);
                    current.push(exit);
                    let points = std::mem::take(&mut current);
                    if let Some(&entry) = points.first() {
                        segments.push(Segment {
                            entry: edge_angle(entry),
                            exit: edge_angle(exit),
                            points,
                        });
                    }
                }
                (false, true) => {
                    current.push(self.crossing(pts[j], pts[i]));
                    current.push(pts[j]);
                }
                (false, false) => {}
            }
        }
        segments
    }

    /// Links every exit to the nearest entry along the edge in the winding
    /// direction and closes each cycle of links into one ring.
    fn rejoin(&self, segments: &[Segment], clockwise: bool) -> Vec<Vec<Vec3>> {
        let next: Vec<usize> = segments
            .iter()
            .enumerate()
            .map(|(i, seg)| {
                (0..segments.len())
                    .min_by(|&a, &b| {
                        let da = sweep(seg.exit, segments[a].entry, clockwise);
                        let db = sweep(seg.exit, segments[b].entry, clockwise);
                        da.total_cmp(&db)
                    })
                    .unwrap_or(i)
            })
            .collect();

        let mut used = vec![false; segments.len()];
        let mut rings = Vec::new();
        for first in 0..segments.len() {
            if used[first] {
                continue;
            }
            let mut ring = Vec::new();
            let mut i = first;
            loop {
                used[i] = true;
                ring.extend_from_slice(&segments[i].points);
                let j = next[i];
                if j != first && used[j] {
                    break;
                }
                self.walk_edge(segments[i].exit, segments[j].entry, clockwise, &mut ring);
                if j == first {
                    break;
                }
                i = j;
            }
            if let Some(&head) = ring.first() {
                ring.push(head);
            }
            rings.push(ring);
        }
        rings
    }

    /// The whole clip circle as a closed ring.
    fn full_edge(&self, clockwise: bool) -> Vec<Vec3> {
        let steps = ((TAU / self.step_rad - 1e-9).ceil() as usize).max(3);
        let sign = if clockwise { -1.0 } else { 1.0 };
        let mut ring: Vec<Vec3> = (0..steps)
            .map(|k| self.edge_point(sign * TAU * k as f64 / steps as f64))
            .collect();
        ring.push(self.edge_point(0.0));
        ring
    }

    /// Point where the great arc from `inside` to `outside` meets the clip edge.
    fn crossing(&self, inside: Vec3, outside: Vec3) -> Vec3 {
        let (mut lo, mut hi) = (0.0, 1.0);
        for _ in 0..BISECT_STEPS {
            let mid = 0.5 * (lo + hi);
            if self.contains(slerp(inside, outside, mid)) {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        self.onto_edge(slerp(inside, outside, 0.5 * (lo + hi)))
    }

    fn onto_edge(&self, v: Vec3) -> Vec3 {
        let r = v.y.hypot(v.z);
        if r < 1e-12 {
            return self.edge_point(0.0);
        }
        Vec3::new(
            self.cos_radius,
            self.sin_radius * v.y / r,
            self.sin_radius * v.z / r,
        )
    }

    fn edge_point(&self, angle: f64) -> Vec3 {
        Vec3::new(
            self.cos_radius,
            self.sin_radius * angle.cos(),
            self.sin_radius * angle.sin(),
        )
    }

    /// Appends the edge points strictly between the edge angles `from` and `to`.
    fn walk_edge(&self, from: f64, to: f64, clockwise: bool, out: &mut Vec<Vec3>) {
        let span = sweep(from, to, clockwise);
        let sign = if clockwise { -1.0 } else { 1.0 };
        let steps = (span / self.step_rad - 1e-9).ceil() as usize;
        for k in 1..steps {
            let angle = from + sign * span * (k as f64 / steps as f64);
            out.push(self.edge_point(angle));
        }
    }
}

/// A visible run of a clipped ring, from an entry crossing to an exit crossing.
#[derive(Debug, Clone)]
struct Segment {
    points: Vec<Vec3>,
    entry: f64,
    exit: f64,
}

/// Position of a point around the clip edge; decreasing angles run clockwise
/// on screen.
fn edge_angle(v: Vec3) -> f64 {
    v.z.atan2(v.y)
}

/// Angle covered walking the edge from `from` to `to`, in `[0, 2π)`.
fn sweep(from: f64, to: f64, clockwise: bool) -> f64 {
    if clockwise {
        (from - to).rem_euclid(TAU)
    } else {
        (to - from).rem_euclid(TAU)
    }
}

/// Whether a ring lying wholly outside the cap goes round the view centre in
/// its own winding direction, which puts the whole cap inside it.
fn encircles_centre(pts: &[Vec3], clockwise: bool) -> bool {
    let turn: f64 = pts
        .iter()
        .zip(pts.iter().cycle().skip(1))
        .map(|(&a, &b)| (edge_angle(b) - edge_angle(a) + PI).rem_euclid(TAU) - PI)
        .sum();
    if clockwise { turn < -PI } else { turn > PI }
}

/// Spherical linear interpolation between unit vectors.
pub fn slerp(a: Vec3, b: Vec3, s: f64) -> Vec3 {
    let theta = a.dot(b).clamp(-1.0, 1.0).acos();
    let sin_theta = theta.sin();
    if sin_theta < 1e-9 {
        // Coincident (or opposite) ends: fall back to the normalized chord.
        let chord = a.scale(1.0 - s) + b.scale(s);
        return if chord.length() > 1e-12 {
            chord.normalize()
        } else {
            a
        };
    }
    (a.scale(((1.0 - s) * theta).sin()) + b.scale((s * theta).sin())).scale(1.0 / sin_theta)
}

/// Densifies a polyline so no edge spans more than `step_deg` of arc.
pub fn resample(points: &[Vec3], step_deg: f64) -> Vec<Vec3> {
    let step = step_deg.to_radians().max(1e-3);
    let mut out = Vec::with_capacity(points.len());
    for (i, &b) in points.iter().enumerate() {
        if i > 0 {
            let a = points[i - 1];
            let theta = a.dot(b).clamp(-1.0, 1.0).acos();
            let n = (theta / step - 1e-9).ceil() as usize;
            for k in 1..n {
                out.push(slerp(a, b, k as f64 / n as f64));
            }
        }
        out.push(b);
    }
    out
}
