//! Input sampling
//!
//! Raw browser events only ever write into [`InputSampler`]; the frame driver
//! reads one [`Intent`] per step. Key identifiers are translated into logical
//! [`Action`]s here so the simulation never sees a key code.

use glam::DVec2;

use crate::sim::tick::IntentSource;
use crate::sim::weapon::WeaponKind;

pub use crate::sim::tick::Intent;

/// Logical player actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Fire,
    SelectWeapon(WeaponKind),
}

impl Action {
    /// Map a `KeyboardEvent.key` value to an action (case-insensitive)
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "w" | "arrowup" => Some(Action::MoveUp),
            "s" | "arrowdown" => Some(Action::MoveDown),
            "a" | "arrowleft" => Some(Action::MoveLeft),
            "d" | "arrowright" => Some(Action::MoveRight),
            "1" => Some(Action::SelectWeapon(WeaponKind::Smg)),
            "2" => Some(Action::SelectWeapon(WeaponKind::Rifle)),
            "3" => Some(Action::SelectWeapon(WeaponKind::Shotgun)),
            _ => None,
        }
    }
}

/// On-screen rectangle of the drawing surface, in display pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceRect {
    /// Map a display-space point into field space.
    ///
    /// The field is drawn letterboxed (uniform scale, centred), so this is
    /// the inverse of that fit; points over the bars land outside the field.
    /// Returns `None` for a degenerate (zero-sized) surface.
    pub fn to_field(&self, client: DVec2, field_size: DVec2) -> Option<DVec2> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let scale = (self.width / field_size.x).min(self.height / field_size.y);
        let bar_x = (self.width - field_size.x * scale) / 2.0;
        let bar_y = (self.height - field_size.y * scale) / 2.0;
        Some(DVec2::new(
            (client.x - self.left - bar_x) / scale,
            (client.y - self.top - bar_y) / scale,
        ))
    }
}

/// Held input state for the current session
#[derive(Debug, Clone)]
pub struct InputSampler {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    fire: bool,
    pointer: DVec2,
    selection: Option<WeaponKind>,
    field_size: DVec2,
}

impl InputSampler {
    pub fn new(field_size: DVec2) -> Self {
        Self {
            up: false,
            down: false,
            left: false,
            right: false,
            fire: false,
            pointer: field_size / 2.0,
            selection: None,
            field_size,
        }
    }

    /// Key pressed; unknown keys are ignored
    pub fn key_down(&mut self, key: &str) {
        if let Some(action) = Action::from_key(key) {
            self.press(action);
        }
    }

    /// Key released; unknown keys are ignored
    pub fn key_up(&mut self, key: &str) {
        if let Some(action) = Action::from_key(key) {
            self.release(action);
        }
    }

    pub fn press(&mut self, action: Action) {
        match action {
            Action::MoveUp => self.up = true,
            Action::MoveDown => self.down = true,
            Action::MoveLeft => self.left = true,
            Action::MoveRight => self.right = true,
            Action::Fire => self.fire = true,
            Action::SelectWeapon(kind) => self.selection = Some(kind),
        }
    }

    pub fn release(&mut self, action: Action) {
        match action {
            Action::MoveUp => self.up = false,
            Action::MoveDown => self.down = false,
            Action::MoveLeft => self.left = false,
            Action::MoveRight => self.right = false,
            Action::Fire => self.fire = false,
            // Selection is a one-shot; releasing the key changes nothing
            Action::SelectWeapon(_) => {}
        }
    }

    /// Pointer moved to `(client_x, client_y)` over a surface at `rect`
    pub fn pointer_move(&mut self, client_x: f64, client_y: f64, rect: SurfaceRect) {
        if let Some(p) = rect.to_field(DVec2::new(client_x, client_y), self.field_size) {
            self.pointer = p;
        }
    }

    pub fn pointer_down(&mut self) {
        self.press(Action::Fire);
    }

    pub fn pointer_up(&mut self) {
        self.release(Action::Fire);
    }

    /// Raw direction from held keys, normalized (zero when nothing or opposing keys are held)
    fn move_dir(&self) -> DVec2 {
        let mut raw = DVec2::ZERO;
        if self.up {
            raw.y -= 1.0;
        }
        if self.down {
            raw.y += 1.0;
        }
        if self.left {
            raw.x -= 1.0;
        }
        if self.right {
            raw.x += 1.0;
        }
        if raw == DVec2::ZERO {
            return raw;
        }
        raw.normalize()
    }

    /// Snapshot the current intent (pure read)
    pub fn sample(&self) -> Intent {
        Intent {
            move_dir: self.move_dir(),
            aim: self.pointer,
            firing: self.fire,
            selected_weapon: self.selection,
        }
    }

    /// Forget the pending weapon selection once a step has consumed it
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Drop all held state (new session, focus loss)
    pub fn reset(&mut self) {
        *self = Self::new(self.field_size);
    }
}

impl IntentSource for InputSampler {
    fn sample(&self) -> Intent {
        InputSampler::sample(self)
    }

    fn consumed(&mut self) {
        self.clear_selection();
    }
}
