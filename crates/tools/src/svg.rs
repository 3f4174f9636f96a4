use std::fmt::{self, Write as _};

use globe::{Layer, Pass, Surface};

/// Accumulates painted layers into a standalone SVG document.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    body: String,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            body: String::new(),
        }
    }

    pub fn finish(&self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n{body}</svg>\n",
            w = self.width,
            h = self.height,
            body = self.body,
        )
    }
}

impl Surface for SvgSurface {
    type Error = fmt::Error;

    fn clear(&mut self) -> fmt::Result {
        self.body.clear();
        Ok(())
    }

    fn paint(&mut self, layer: &Layer) -> fmt::Result {
        let pass = match layer.pass {
            Pass::Back => "back",
            Pass::Front => "front",
        };
        let style = &layer.style;
        write!(
            self.body,
            "<path class=\"{pass} {}\" d=\"{}\" fill=\"{}\"",
            layer.name,
            layer.path.to_svg(),
            escape(style.fill.as_deref().unwrap_or("none")),
        )?;
        match &style.stroke {
            Some(stroke) => writeln!(
                self.body,
                " stroke=\"{}\" stroke-width=\"{}\"/>",
                escape(stroke),
                style.stroke_width
            ),
            None => writeln!(self.body, " stroke=\"none\"/>"),
        }
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
