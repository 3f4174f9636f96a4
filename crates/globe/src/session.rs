//! Rotation driver: owns the globe state and turns host ticks and user input
//! into frames.

use std::fmt;
use std::str::FromStr;

use formats::{Country, WorldDocument};
use foundation::math::{GeoPoint, GreatArcInterpolator, Rotation, Vec2};
use runtime::{Ease, EventBus, Frame, Scheduler, Slot, Transition};
use serde::{Deserialize, Serialize};

use crate::config::GlobeConfig;
use crate::drag::DragController;
use crate::error::GlobeError;
use crate::render::{GlobeFrame, Renderer};

/// Scheduler slot for the rotation tween.
pub const ROTATE_SLOT: Slot = "rotate";
/// Scheduler slot for the pause between auto-mode transitions.
pub const DWELL_SLOT: Slot = "dwell";

/// Below this many radians a transition is treated as already arrived.
const ARRIVED_RAD: f64 = 1e-9;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Auto,
    Manual,
}

impl FromStr for Mode {
    type Err = GlobeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Mode::Auto),
            "manual" => Ok(Mode::Manual),
            _ => Err(GlobeError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Auto => "auto",
            Mode::Manual => "manual",
        })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Transitioning,
    Dwelling,
}

/// The globe's mutable state: rotation, mode, countries and pending tweens.
///
/// Single-threaded. The host calls [`GlobeSession::tick`] once per animation
/// frame and forwards pointer input; every call that changes what is on
/// screen returns the frame to paint.
#[derive(Debug)]
pub struct GlobeSession {
    config: GlobeConfig,
    countries: Vec<Country>,
    renderer: Renderer,
    rotation: Rotation,
    mode: Mode,
    phase: Phase,
    interpolator: GreatArcInterpolator,
    scheduler: Scheduler,
    events: EventBus,
    drag: DragController,
    highlight: Option<usize>,
    /// Country the auto cycle is on; `None` before the first step.
    auto_index: Option<usize>,
    frame: Frame,
    transitions_started: u64,
}

impl GlobeSession {
    /// Builds a session over decoded countries. Features the document had to
    /// drop are reported as an error event.
    pub fn new(config: GlobeConfig, world: WorldDocument) -> Self {
        let renderer = Renderer::new(&config);
        let drag = DragController::new(config.drag);
        let mode = config.start_mode;
        let skipped = world.skipped();
        let mut session = Self {
            config,
            countries: world.into_countries(),
            renderer,
            rotation: Rotation::default(),
            mode,
            phase: Phase::Idle,
            interpolator: GreatArcInterpolator::default(),
            scheduler: Scheduler::new(),
            events: EventBus::new(),
            drag,
            highlight: None,
            auto_index: None,
            frame: Frame::new(0, 0.0),
            transitions_started: 0,
        };
        if skipped > 0 {
            session.events.error(
                session.frame,
                "world",
                format!("{skipped} features without drawable geometry were dropped"),
            );
        }
        session
    }

    /// Decodes the world document and builds a session over it.
    ///
    /// A decoding failure is fatal: nothing can be drawn without countries.
    pub fn from_world_json(config: GlobeConfig, payload: &str) -> Result<Self, GlobeError> {
        config.validate()?;
        let world = WorldDocument::from_json_str_with_object(payload, &config.countries_object)
            .inspect_err(|err| tracing::error!(%err, "failed to load world data"))?;
        Ok(Self::new(config, world))
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn country_names(&self) -> Vec<String> {
        self.countries.iter().map(|c| c.name.clone()).collect()
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn transitions_started(&self) -> u64 {
        self.transitions_started
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Draws the initial frame and, in auto mode, starts the cycle at the
    /// first country.
    pub fn start(&mut self, now_ms: f64) -> GlobeFrame {
        self.events.emit(
            self.frame,
            "session.start",
            format!("{} countries, {} mode", self.countries.len(), self.mode),
        );
        if self.mode == Mode::Auto {
            self.auto_index = None;
            self.advance_auto(now_ms);
        }
        self.render(now_ms)
    }

    /// Starts rotating from the current rotation towards `target`.
    ///
    /// Replaces any transition in flight. A target the globe is already at
    /// finishes on the next tick.
    pub fn begin_transition(
        &mut self,
        target: GeoPoint,
        duration_ms: f64,
        delay_ms: f64,
        now_ms: f64,
    ) {
        self.scheduler.cancel(DWELL_SLOT);
        self.interpolator
            .source(self.rotation.as_point())
            .target(target);
        let distance = self.interpolator.distance();

        let transition = if distance < ARRIVED_RAD {
            self.rotation = Rotation::from_point(target);
            Transition::new(0.0)
        } else {
            Transition::new(duration_ms)
                .with_delay(delay_ms)
                .with_ease(self.config.ease)
        };
        self.scheduler.schedule(ROTATE_SLOT, transition, now_ms);
        self.phase = Phase::Transitioning;
        self.transitions_started += 1;

        tracing::debug!(
            lon = target.lon_deg,
            lat = target.lat_deg,
            distance_deg = distance.to_degrees(),
            duration_ms,
            delay_ms,
            "transition started"
        );
        self.events.emit(
            self.frame,
            "transition.start",
            format!("to ({:.3}, {:.3})", target.lon_deg, target.lat_deg),
        );
    }

    /// Advances tweens to `now_ms`. Returns a frame when anything changed.
    pub fn tick(&mut self, now_ms: f64) -> Option<GlobeFrame> {
        let mut redraw = false;
        for sample in self.scheduler.poll(now_ms) {
            match sample.slot {
                ROTATE_SLOT => {
                    self.rotation = Rotation::from_point(self.interpolator.interpolate(sample.t));
                    redraw = true;
                    if sample.finished {
                        self.finish_transition(now_ms);
                    }
                }
                DWELL_SLOT if sample.finished => {
                    redraw |= self.advance_auto(now_ms);
                }
                _ => {}
            }
        }
        redraw.then(|| self.render(now_ms))
    }

    /// Switches mode, stopping every tween of the old one first.
    ///
    /// Entering auto restarts the cycle at the first country; entering manual
    /// leaves the globe where it is.
    pub fn set_mode(&mut self, mode: Mode, now_ms: f64) -> Option<GlobeFrame> {
        if mode == self.mode {
            return None;
        }
        let stopped = self.scheduler.cancel_all();
        self.drag.pointer_up();
        self.phase = Phase::Idle;
        self.mode = mode;
        self.events
            .emit(self.frame, "mode", format!("{mode} ({stopped} tweens stopped)"));

        match mode {
            Mode::Auto => {
                self.auto_index = None;
                self.advance_auto(now_ms);
                Some(self.render(now_ms))
            }
            Mode::Manual => None,
        }
    }

    /// Flies to country `index`, halting the auto cycle.
    ///
    /// An index past the end is ignored and reported as an error event.
    pub fn select_country(&mut self, index: usize, now_ms: f64) -> Result<GlobeFrame, GlobeError> {
        let count = self.countries.len();
        let Some(target) = self.countries.get(index).map(Country::focus_point) else {
            self.events.error(
                self.frame,
                "select",
                format!("no country at index {index} ({count} loaded)"),
            );
            return Err(GlobeError::CountryIndex { index, count });
        };
        self.set_mode(Mode::Manual, now_ms);
        self.highlight = Some(index);
        self.begin_transition(target, self.config.manual_duration_ms, 0.0, now_ms);
        Ok(self.render(now_ms))
    }

    pub fn pointer_down(&mut self, pos: Vec2) {
        if self.mode == Mode::Manual {
            self.drag.pointer_down(pos);
        }
    }

    /// Rotates the globe by the pointer travel. Ignored in auto mode.
    pub fn pointer_move(&mut self, pos: Vec2, now_ms: f64) -> Option<GlobeFrame> {
        if self.mode != Mode::Manual {
            return None;
        }
        if !self.drag.pointer_move(pos, &mut self.rotation) {
            return None;
        }
        if self.scheduler.cancel(ROTATE_SLOT) {
            self.phase = Phase::Idle;
            self.events
                .emit(self.frame, "transition.interrupted", "drag took over");
        }
        Some(self.render(now_ms))
    }

    pub fn pointer_up(&mut self) {
        self.drag.pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.drag.pointer_leave();
    }

    /// Frame for the current state without advancing anything.
    pub fn render(&mut self, now_ms: f64) -> GlobeFrame {
        self.frame = self.frame.next(now_ms);
        self.renderer
            .render(self.frame, self.rotation, &self.countries, self.highlight)
    }

    fn finish_transition(&mut self, now_ms: f64) {
        self.events
            .emit(self.frame, "transition.finish", format!("{:?}", self.rotation));
        match self.mode {
            Mode::Auto => {
                let dwell = Transition::new(self.config.dwell_ms).with_ease(Ease::Linear);
                self.scheduler.schedule(DWELL_SLOT, dwell, now_ms);
                self.phase = Phase::Dwelling;
            }
            Mode::Manual => self.phase = Phase::Idle,
        }
    }

    /// Moves the auto cycle to the next country. Returns whether the
    /// highlight changed.
    fn advance_auto(&mut self, now_ms: f64) -> bool {
        if self.countries.is_empty() {
            return false;
        }
        let next = self
            .auto_index
            .map_or(0, |i| (i + 1) % self.countries.len());
        self.auto_index = Some(next);
        let target = self.countries[next].focus_point();
        let changed = self.highlight != Some(next);
        self.highlight = Some(next);
        self.begin_transition(
            target,
            self.config.auto_duration_ms,
            self.config.auto_delay_ms,
            now_ms,
        );
        changed
    }
}
