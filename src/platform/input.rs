//! Pointer and keyboard input
//!
//! Holding a pointer on the left or right half of the screen turns that way.
//! Keys are a desktop convenience layered on top.

use glam::Vec2;

use crate::settings::Settings;
use crate::sim::state::{GamePhase, TurnDir, Viewport};
use crate::sim::tick::TickInput;
use crate::ui;

/// Which way a press at `x` turns on a surface `width` wide
pub fn turn_for_x(x: f32, width: f32) -> TurnDir {
    if x < width / 2.0 {
        TurnDir::Left
    } else {
        TurnDir::Right
    }
}

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    /// Enter / Space: press the primary button
    Confirm,
    /// Escape: back to the menu from results
    Back,
    /// Toggle autopilot
    Idle,
    /// Q: cycle the quality preset
    Quality,
    /// M: sound on/off
    Mute,
    /// F: FPS counter on/off
    Fps,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            "Enter" | " " => Some(Key::Confirm),
            "Escape" => Some(Key::Back),
            "i" | "I" => Some(Key::Idle),
            "q" | "Q" => Some(Key::Quality),
            "m" | "M" => Some(Key::Mute),
            "f" | "F" => Some(Key::Fps),
            _ => None,
        }
    }
}

/// Accumulated input between frames
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Turn from a held pointer or touch
    pointer_turn: Option<TurnDir>,
    left_key: bool,
    right_key: bool,
    /// Tap waiting for the next tick
    pending_tap: Option<Vec2>,
    pub idle_mode: bool,
}

impl InputState {
    /// Pointer/touch went down at `pos` (CSS pixels). Only a press made
    /// mid-run steers; on menus it is just a tap.
    pub fn pointer_down(&mut self, pos: Vec2, width: f32, phase: GamePhase) {
        if phase == GamePhase::Playing {
            self.pointer_turn = Some(turn_for_x(pos.x, width));
        }
        self.pending_tap = Some(pos);
    }

    /// Pointer moved while held (touch drag across the middle)
    pub fn pointer_move(&mut self, pos: Vec2, width: f32) {
        if self.pointer_turn.is_some() {
            self.pointer_turn = Some(turn_for_x(pos.x, width));
        }
    }

    /// All pointers released
    pub fn pointer_up(&mut self) {
        self.pointer_turn = None;
    }

    /// A key went down; `phase` and `viewport` resolve Confirm/Back to a tap
    pub fn key_down(&mut self, key: Key, phase: GamePhase, viewport: Viewport) {
        match key {
            Key::Left => self.left_key = true,
            Key::Right => self.right_key = true,
            Key::Confirm => self.pending_tap = primary_button(phase, viewport),
            Key::Back => {
                if phase.is_results() {
                    let layout = ui::results_layout(viewport.width, viewport.height);
                    self.pending_tap = Some(layout.menu.center());
                }
            }
            Key::Idle => {
                self.idle_mode = !self.idle_mode;
                log::info!("Idle mode: {}", self.idle_mode);
            }
            Key::Quality | Key::Mute | Key::Fps => {}
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.left_key = false,
            Key::Right => self.right_key = false,
            _ => {}
        }
    }

    /// Drop held state (window blur, tab hidden)
    pub fn release_all(&mut self) {
        self.pointer_turn = None;
        self.left_key = false;
        self.right_key = false;
    }

    /// Current held direction; a held pointer wins over keys
    pub fn turn(&self) -> TurnDir {
        if let Some(turn) = self.pointer_turn {
            return turn;
        }
        match (self.left_key, self.right_key) {
            (true, false) => TurnDir::Left,
            (false, true) => TurnDir::Right,
            _ => TurnDir::Straight,
        }
    }

    /// Input for the next tick; the pending tap is consumed
    pub fn take_tick_input(&mut self) -> TickInput {
        TickInput {
            turn: self.turn(),
            tap: self.pending_tap.take(),
            idle_mode: self.idle_mode,
        }
    }
}

/// Apply a settings key; returns false for keys that aren't settings
pub fn apply_setting_key(settings: &mut Settings, key: Key) -> bool {
    match key {
        Key::Quality => settings.cycle_quality(),
        Key::Mute => settings.toggle_sound(),
        Key::Fps => settings.toggle_fps(),
        _ => return false,
    }
    true
}

/// Centre of the button Enter/Space presses in a phase
fn primary_button(phase: GamePhase, viewport: Viewport) -> Option<Vec2> {
    match phase {
        GamePhase::Menu => Some(ui::menu_layout(viewport.width, viewport.height).start.center()),
        GamePhase::Crashed | GamePhase::Finished => {
            Some(ui::results_layout(viewport.width, viewport.height).retry.center())
        }
        GamePhase::Playing => None,
    }
}
