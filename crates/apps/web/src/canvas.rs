use std::f64::consts::TAU;

use globe::{Layer, Surface};
use layers::PathCommand;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// Paints globe layers onto a 2-D canvas context.
pub struct CanvasSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl<'a> CanvasSurface<'a> {
    pub fn new(ctx: &'a CanvasRenderingContext2d, width: f64, height: f64) -> Self {
        Self { ctx, width, height }
    }

    fn trace(&self, commands: &[PathCommand]) -> Result<(), JsValue> {
        self.ctx.begin_path();
        for command in commands {
            match *command {
                PathCommand::MoveTo(p) => self.ctx.move_to(p.x, p.y),
                PathCommand::LineTo(p) => self.ctx.line_to(p.x, p.y),
                PathCommand::ClosePath => self.ctx.close_path(),
                PathCommand::Circle { center, radius } => {
                    self.ctx.move_to(center.x + radius, center.y);
                    self.ctx.arc(center.x, center.y, radius, 0.0, TAU)?;
                }
            }
        }
        Ok(())
    }
}

impl Surface for CanvasSurface<'_> {
    type Error = JsValue;

    fn clear(&mut self) -> Result<(), JsValue> {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
        Ok(())
    }

    fn paint(&mut self, layer: &Layer) -> Result<(), JsValue> {
        self.trace(layer.path.commands())?;
        if let Some(fill) = &layer.style.fill {
            set_style(self.ctx, "fillStyle", fill);
            self.ctx.fill();
        }
        if let Some(stroke) = &layer.style.stroke {
            if layer.style.stroke_width > 0.0 {
                set_style(self.ctx, "strokeStyle", stroke);
                self.ctx.set_line_width(layer.style.stroke_width);
                self.ctx.stroke();
            }
        }
        Ok(())
    }
}

fn set_style(ctx: &CanvasRenderingContext2d, property: &str, value: &str) {
    let outcome = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str(property),
        &JsValue::from_str(value),
    )
    .map_err(|err| format!("{err:?}"));
    if let Some(message) = style_failure(property, value, outcome) {
        crate::log(&message);
    }
}

/// Message for a style assignment the context refused, if it did.
fn style_failure(property: &str, value: &str, outcome: Result<bool, String>) -> Option<String> {
    match outcome {
        Ok(true) => None,
        Ok(false) => Some(format!("canvas rejected {property} = {value}")),
        Err(err) => Some(format!("setting {property} = {value} threw: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::style_failure;

    #[test]
    fn only_refused_style_assignments_are_reported() {
        assert_eq!(style_failure("fillStyle", "red", Ok(true)), None);
        assert_eq!(
            style_failure("fillStyle", "red", Ok(false)).as_deref(),
            Some("canvas rejected fillStyle = red")
        );
        assert_eq!(
            style_failure("strokeStyle", "#000", Err("TypeError".to_string())).as_deref(),
            Some("setting strokeStyle = #000 threw: TypeError")
        );
    }
}
