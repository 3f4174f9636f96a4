use std::fmt::{self, Write as _};

use formats::geometry::Geometry;
use foundation::math::{GeoPoint, Rotator, Vec2, Vec3, is_clockwise_ring};

use crate::clip::{ClipCircle, resample};
use crate::projection::Orthographic;

/// Default radius of rendered point geometry, in pixels.
pub const DEFAULT_POINT_RADIUS: f64 = 4.5;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PathCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
    ClosePath,
    Circle { center: Vec2, radius: f64 },
}

/// Drawing commands for one geometry, in screen space.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: PathCommand) {
        self.commands.push(command);
    }

    pub fn append(&mut self, other: Path) {
        self.commands.extend(other.commands);
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Number of `MoveTo`/`Circle` commands, i.e. separately drawn pieces.
    pub fn subpath_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::MoveTo(_) | PathCommand::Circle { .. }))
            .count()
    }

    /// SVG path data (`d` attribute).
    pub fn to_svg(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) => write!(f, "M{},{}", num(p.x), num(p.y))?,
                PathCommand::LineTo(p) => write!(f, "L{},{}", num(p.x), num(p.y))?,
                PathCommand::ClosePath => f.write_char('Z')?,
                PathCommand::Circle { center, radius } => {
                    let r = num(radius);
                    let d = num(2.0 * radius);
                    write!(
                        f,
                        "M{},{}m0,{r}a{r},{r} 0 1,1 0,-{d}a{r},{r} 0 1,1 0,{d}Z",
                        num(center.x),
                        num(center.y)
                    )?
                }
            }
        }
        Ok(())
    }
}

/// Screen coordinates rounded to three decimals, without trailing zeros.
fn num(v: f64) -> String {
    let r = (v * 1000.0).round() / 1000.0;
    if r == 0.0 { "0".to_string() } else { r.to_string() }
}

/// Turns geometry into clipped, projected paths for one projection state.
#[derive(Debug, Clone)]
pub struct PathGenerator {
    projection: Orthographic,
    rotator: Rotator,
    clip: ClipCircle,
    point_radius: f64,
}

impl PathGenerator {
    pub fn new(projection: &Orthographic) -> Self {
        Self {
            projection: *projection,
            rotator: projection.rotator(),
            clip: projection.clip(),
            point_radius: DEFAULT_POINT_RADIUS,
        }
    }

    pub fn with_point_radius(mut self, radius: f64) -> Self {
        self.point_radius = radius;
        self
    }

    pub fn projection(&self) -> &Orthographic {
        &self.projection
    }

    pub fn commands(&self, geometry: &Geometry) -> Path {
        let mut path = Path::new();
        match geometry {
            Geometry::Point(p) => self.point(*p, &mut path),
            Geometry::MultiPoint(points) => {
                for p in points {
                    self.point(*p, &mut path);
                }
            }
            Geometry::LineString(line) => self.line(line, &mut path),
            Geometry::MultiLineString(lines) => {
                for line in lines {
                    self.line(line, &mut path);
                }
            }
            Geometry::Polygon(rings) => {
                for ring in rings {
                    self.ring(ring, &mut path);
                }
            }
            Geometry::MultiPolygon(polygons) => {
                for ring in polygons.iter().flatten() {
                    self.ring(ring, &mut path);
                }
            }
        }
        path
    }

    pub fn svg(&self, geometry: &Geometry) -> String {
        self.commands(geometry).to_svg()
    }

    /// The globe's silhouette as a single circle command.
    pub fn outline(&self) -> Path {
        let (center, radius) = self.projection.outline();
        Path {
            commands: vec![PathCommand::Circle { center, radius }],
        }
    }

    fn rotated(&self, points: &[GeoPoint]) -> Vec<Vec3> {
        let rotated: Vec<Vec3> = points
            .iter()
            .map(|p| self.rotator.rotate_vector(p.to_unit_vector()))
            .collect();
        resample(&rotated, self.projection.resample_step_deg())
    }

    fn point(&self, p: GeoPoint, path: &mut Path) {
        let v = self.rotator.rotate_vector(p.to_unit_vector());
        if self.clip.contains(v) {
            path.push(PathCommand::Circle {
                center: self.projection.project_rotated(v),
                radius: self.point_radius,
            });
        }
    }

    fn line(&self, line: &[GeoPoint], path: &mut Path) {
        for run in self.clip.clip_line(&self.rotated(line)) {
            self.emit(&run, path);
        }
    }

    fn ring(&self, ring: &[GeoPoint], path: &mut Path) {
        let clockwise = is_clockwise_ring(ring);
        for mut piece in self.clip.clip_ring(&self.rotated(ring), clockwise) {
            piece.pop();
            self.emit(&piece, path);
            path.push(PathCommand::ClosePath);
        }
    }

    fn emit(&self, points: &[Vec3], path: &mut Path) {
        for (i, v) in points.iter().enumerate() {
            let p = self.projection.project_rotated(*v);
            path.push(if i == 0 {
                PathCommand::MoveTo(p)
            } else {
                PathCommand::LineTo(p)
            });
        }
    }
}
