//! Two-pass frame assembly.
//!
//! Every frame is drawn twice over the same rotation: first with clipping
//! disabled so far-side land shows through the globe, then clipped to the
//! visible hemisphere. Hosts paint `back` before `front`.

use formats::{Country, Geometry};
use foundation::math::Rotation;
use layers::{GlobeStyle, Graticule, LayerStyle, Orthographic, Path, PathGenerator};
use runtime::Frame;

use crate::config::GlobeConfig;

pub const BACK_CLIP_ANGLE_DEG: f64 = 180.0;
pub const FRONT_CLIP_ANGLE_DEG: f64 = 90.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Pass {
    Back,
    Front,
}

/// One styled path of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub pass: Pass,
    pub name: &'static str,
    pub style: LayerStyle,
    pub path: Path,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlobeFrame {
    pub frame: Frame,
    pub rotation: Rotation,
    pub highlight: Option<usize>,
    pub back: Vec<Layer>,
    pub front: Vec<Layer>,
}

impl GlobeFrame {
    /// Layers in paint order.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.back.iter().chain(self.front.iter())
    }
}

/// A paint target for frames: a browser canvas, an SVG document, a test recorder.
pub trait Surface {
    type Error;

    fn clear(&mut self) -> Result<(), Self::Error>;

    fn paint(&mut self, layer: &Layer) -> Result<(), Self::Error>;
}

/// Clears `surface` and paints every visible, non-empty layer in order.
pub fn paint_frame<S: Surface>(surface: &mut S, frame: &GlobeFrame) -> Result<(), S::Error> {
    surface.clear()?;
    for layer in frame.layers() {
        if layer.style.paints() && !layer.path.is_empty() {
            surface.paint(layer)?;
        }
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct Renderer {
    projection: Orthographic,
    graticule: Option<Geometry>,
    style: GlobeStyle,
    point_radius: f64,
}

impl Renderer {
    pub fn new(config: &GlobeConfig) -> Self {
        let mut projection = Orthographic::for_surface(config.width, config.height);
        projection.set_resample_step(config.resample_step_deg);
        Self {
            projection,
            graticule: config
                .show_graticule
                .then(|| Graticule::default().geometry()),
            style: config.style.clone(),
            point_radius: config.point_radius,
        }
    }

    pub fn projection(&self) -> &Orthographic {
        &self.projection
    }

    pub fn render(
        &self,
        frame: Frame,
        rotation: Rotation,
        countries: &[Country],
        highlight: Option<usize>,
    ) -> GlobeFrame {
        let back = self.generator(rotation, BACK_CLIP_ANGLE_DEG);
        let front = self.generator(rotation, FRONT_CLIP_ANGLE_DEG);

        let mut back_layers = vec![self.layer(
            Pass::Back,
            "land",
            &self.style.back_land,
            countries_path(&back, countries.iter()),
        )];
        let mut front_layers = vec![self.layer(
            Pass::Front,
            "sphere",
            &self.style.sphere,
            front.outline(),
        )];

        if let Some(graticule) = &self.graticule {
            back_layers.push(self.layer(
                Pass::Back,
                "graticule",
                &self.style.back_graticule,
                back.commands(graticule),
            ));
        }

        let (lit, unlit): (Vec<&Country>, Vec<&Country>) = countries
            .iter()
            .partition(|c| Some(c.index) == highlight);
        front_layers.push(self.layer(
            Pass::Front,
            "land",
            &self.style.land,
            countries_path(&front, unlit.into_iter()),
        ));
        front_layers.push(self.layer(
            Pass::Front,
            "highlight",
            &self.style.highlight,
            countries_path(&front, lit.into_iter()),
        ));
        if let Some(graticule) = &self.graticule {
            front_layers.push(self.layer(
                Pass::Front,
                "graticule",
                &self.style.graticule,
                front.commands(graticule),
            ));
        }
        front_layers.push(self.layer(
            Pass::Front,
            "outline",
            &self.style.outline,
            front.outline(),
        ));

        GlobeFrame {
            frame,
            rotation,
            highlight,
            back: back_layers,
            front: front_layers,
        }
    }

    fn generator(&self, rotation: Rotation, clip_angle_deg: f64) -> PathGenerator {
        let projection = self
            .projection
            .with_rotation(rotation)
            .with_clip_angle(clip_angle_deg);
        PathGenerator::new(&projection).with_point_radius(self.point_radius)
    }

    fn layer(&self, pass: Pass, name: &'static str, style: &LayerStyle, path: Path) -> Layer {
        Layer {
            pass,
            name,
            style: style.clone(),
            path,
        }
    }
}

fn countries_path<'a>(
    generator: &PathGenerator,
    countries: impl Iterator<Item = &'a Country>,
) -> Path {
    let mut path = Path::new();
    for country in countries {
        path.append(generator.commands(&country.geometry));
    }
    path
}

#[cfg(test)]
mod tests {
    use super::{GlobeFrame, Layer, Pass, Renderer, Surface, paint_frame};
    use crate::config::GlobeConfig;
    use formats::{Country, Geometry};
    use foundation::math::{GeoPoint, Rotation};
    use pretty_assertions::assert_eq;
    use runtime::Frame;

    fn country(index: usize, lon: f64, lat: f64) -> Country {
        let h = 5.0;
        Country {
            index,
            id: None,
            name: format!("Country {}", index + 1),
            geometry: Geometry::Polygon(vec![vec![
                GeoPoint::new(lon - h, lat - h),
                GeoPoint::new(lon - h, lat + h),
                GeoPoint::new(lon + h, lat + h),
                GeoPoint::new(lon + h, lat - h),
                GeoPoint::new(lon - h, lat - h),
            ]]),
            centroid: GeoPoint::new(lon, lat),
        }
    }

    fn layer<'a>(frame: &'a GlobeFrame, pass: Pass, name: &str) -> &'a Layer {
        frame
            .layers()
            .find(|l| l.pass == pass && l.name == name)
            .unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        painted: Vec<(Pass, &'static str)>,
        clears: usize,
    }

    impl Surface for Recorder {
        type Error = ();

        fn clear(&mut self) -> Result<(), ()> {
            self.clears += 1;
            Ok(())
        }

        fn paint(&mut self, layer: &Layer) -> Result<(), ()> {
            self.painted.push((layer.pass, layer.name));
            Ok(())
        }
    }

    #[test]
    fn back_layers_paint_before_front() {
        let renderer = Renderer::new(&GlobeConfig::default());
        let countries = vec![country(0, 0.0, 0.0), country(1, 170.0, 0.0)];
        let frame = renderer.render(Frame::new(0, 0.0), Rotation::default(), &countries, Some(0));

        let mut recorder = Recorder::default();
        paint_frame(&mut recorder, &frame).unwrap();
        assert_eq!(recorder.clears, 1);
        let first_front = recorder
            .painted
            .iter()
            .position(|(pass, _)| *pass == Pass::Front)
            .unwrap();
        assert!(recorder.painted[..first_front].iter().all(|(p, _)| *p == Pass::Back));
        assert!(recorder.painted[first_front..].iter().all(|(p, _)| *p == Pass::Front));
        assert_eq!(recorder.painted.first(), Some(&(Pass::Back, "land")));
        assert_eq!(recorder.painted.last(), Some(&(Pass::Front, "outline")));
    }

    #[test]
    fn far_country_only_in_back_pass() {
        let renderer = Renderer::new(&GlobeConfig::default());
        let countries = vec![country(0, 170.0, 0.0)];
        let frame = renderer.render(Frame::new(0, 0.0), Rotation::default(), &countries, None);
        assert_eq!(layer(&frame, Pass::Back, "land").path.subpath_count(), 1);
        assert!(layer(&frame, Pass::Front, "land").path.is_empty());
    }

    #[test]
    fn highlight_is_split_from_land() {
        let renderer = Renderer::new(&GlobeConfig::default());
        let countries = vec![country(0, 0.0, 0.0), country(1, 20.0, 10.0)];
        let frame = renderer.render(Frame::new(0, 0.0), Rotation::default(), &countries, Some(1));
        assert_eq!(layer(&frame, Pass::Front, "land").path.subpath_count(), 1);
        assert_eq!(layer(&frame, Pass::Front, "highlight").path.subpath_count(), 1);
        assert_eq!(
            layer(&frame, Pass::Front, "highlight").style.fill.as_deref(),
            Some("red")
        );
    }

    #[test]
    fn graticule_can_be_turned_off() {
        let config = GlobeConfig {
            show_graticule: false,
            ..GlobeConfig::default()
        };
        let frame = Renderer::new(&config).render(
            Frame::new(0, 0.0),
            Rotation::default(),
            &[country(0, 0.0, 0.0)],
            None,
        );
        assert!(frame.layers().all(|l| l.name != "graticule"));
    }
}
