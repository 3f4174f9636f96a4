//! Offline helpers behind the `globe` CLI: load a world file, list its
//! countries, and render transition frames as SVG.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use globe::{GlobeConfig, GlobeFrame, GlobeSession, Mode, paint_frame};
use serde::Serialize;

pub mod svg;

use svg::SvgSurface;

pub fn load_config(path: Option<&Path>) -> anyhow::Result<GlobeConfig> {
    let Some(path) = path else {
        return Ok(GlobeConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    GlobeConfig::from_json_str(&text).with_context(|| format!("parse {}", path.display()))
}

pub fn load_session(world: &Path, config: GlobeConfig) -> anyhow::Result<GlobeSession> {
    let payload = fs::read_to_string(world).with_context(|| format!("read {}", world.display()))?;
    let session = GlobeSession::from_world_json(config, &payload)
        .with_context(|| format!("load world {}", world.display()))?;
    tracing::info!(countries = session.countries().len(), "world loaded");
    Ok(session)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryRow {
    pub index: usize,
    pub name: String,
    pub id: Option<String>,
    /// `[lon, lat]` in degrees.
    pub centroid: [f64; 2],
}

pub fn country_rows(session: &GlobeSession) -> Vec<CountryRow> {
    session
        .countries()
        .iter()
        .map(|c| CountryRow {
            index: c.index,
            name: c.name.clone(),
            id: c.id.clone(),
            centroid: [c.centroid.lon_deg, c.centroid.lat_deg],
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub mode: Mode,
    /// Target country; required in manual mode.
    pub country: Option<usize>,
    pub frames: usize,
    /// Simulated time between frames.
    pub step_ms: f64,
}

/// Replays a transition on a simulated clock and returns one frame per step.
///
/// Manual mode flies to `country`; auto mode runs the cycle from the first
/// country. Steps where nothing moved repeat the current view.
pub fn render_frames(
    session: &mut GlobeSession,
    options: &RenderOptions,
) -> anyhow::Result<Vec<GlobeFrame>> {
    if options.frames == 0 {
        bail!("--frames must be at least 1");
    }
    if !(options.step_ms.is_finite() && options.step_ms > 0.0) {
        bail!("--step-ms must be positive");
    }

    let first = match options.mode {
        Mode::Manual => {
            let Some(country) = options.country else {
                bail!("--country is required in manual mode");
            };
            session.set_mode(Mode::Manual, 0.0);
            session.start(0.0);
            session.select_country(country, 0.0)?
        }
        Mode::Auto => {
            if options.country.is_some() {
                tracing::warn!("--country is ignored in auto mode");
            }
            match session.set_mode(Mode::Auto, 0.0) {
                Some(frame) => frame,
                None => session.start(0.0),
            }
        }
    };

    let mut frames = Vec::with_capacity(options.frames);
    frames.push(first);
    for step in 1..options.frames {
        let now = step as f64 * options.step_ms;
        let frame = match session.tick(now) {
            Some(frame) => frame,
            None => session.render(now),
        };
        frames.push(frame);
    }
    Ok(frames)
}

pub fn frame_to_svg(frame: &GlobeFrame, config: &GlobeConfig) -> anyhow::Result<String> {
    let mut surface = SvgSurface::new(config.width, config.height);
    paint_frame(&mut surface, frame).context("format svg")?;
    Ok(surface.finish())
}

/// Writes `frame_000.svg`, `frame_001.svg`, ... into `dir`.
pub fn write_frames(
    frames: &[GlobeFrame],
    dir: &Path,
    config: &GlobeConfig,
) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let mut written = Vec::with_capacity(frames.len());
    for (i, frame) in frames.iter().enumerate() {
        let path = dir.join(format!("frame_{i:03}.svg"));
        fs::write(&path, frame_to_svg(frame, config)?)
            .with_context(|| format!("write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::{RenderOptions, country_rows, load_config, load_session, render_frames, write_frames};
    use globe::{GlobeConfig, Mode};
    use pretty_assertions::assert_eq;
    use std::fs;

    // Two single-arc squares, the second delta-encoded through a transform.
    const WORLD: &str = r#"{
        "type": "Topology",
        "transform": { "scale": [1, 1], "translate": [0, 0] },
        "objects": {
            "countries": {
                "type": "GeometryCollection",
                "geometries": [
                    { "type": "Polygon", "id": "A", "arcs": [[0]] },
                    { "type": "Polygon", "id": 250, "arcs": [[1]] }
                ]
            }
        },
        "arcs": [
            [[-5, -5], [0, 10], [10, 0], [0, -10], [-10, 0]],
            [[35, 5], [0, 10], [10, 0], [0, -10], [-10, 0]]
        ]
    }"#;

    fn world_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("world.json");
        fs::write(&path, WORLD).unwrap();
        path
    }

    #[test]
    fn lists_countries_from_topology() {
        let dir = tempfile::tempdir().unwrap();
        let session = load_session(&world_file(&dir), GlobeConfig::default()).unwrap();
        let rows = country_rows(&session);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "A");
        assert_eq!(rows[1].name, "250");
        assert_eq!(rows[0].centroid, [0.0, 0.0]);
        assert_eq!(rows[1].centroid, [40.0, 10.0]);
    }

    #[test]
    fn manual_render_ends_on_the_country() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = load_session(&world_file(&dir), GlobeConfig::default()).unwrap();
        let options = RenderOptions {
            mode: Mode::Manual,
            country: Some(1),
            frames: 30,
            step_ms: 50.0,
        };
        let frames = render_frames(&mut session, &options).unwrap();
        assert_eq!(frames.len(), 30);
        let last = frames.last().unwrap();
        assert!((last.rotation.lambda_deg + 40.0).abs() < 1e-6);
        assert!((last.rotation.phi_deg + 10.0).abs() < 1e-6);
        assert_eq!(last.highlight, Some(1));

        let out = dir.path().join("frames");
        let written = write_frames(&frames[..3], &out, session.config()).unwrap();
        assert_eq!(written.len(), 3);
        assert!(written[0].ends_with("frame_000.svg"));
        let svg = fs::read_to_string(&written[2]).unwrap();
        assert!(svg.contains("class=\"back land\""));
        assert!(svg.contains("class=\"front highlight\""));
    }

    #[test]
    fn manual_render_needs_a_country() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = load_session(&world_file(&dir), GlobeConfig::default()).unwrap();
        let options = RenderOptions {
            mode: Mode::Manual,
            country: None,
            frames: 3,
            step_ms: 50.0,
        };
        assert!(render_frames(&mut session, &options).is_err());
    }

    #[test]
    fn config_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("globe.json");
        fs::write(&path, r#"{ "manual_duration_ms": 400 }"#).unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.manual_duration_ms, 400.0);
        assert_eq!(load_config(None).unwrap(), GlobeConfig::default());
    }
}
