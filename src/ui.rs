//! Screen layout, tap hit-testing and HUD model
//!
//! Layout is a pure function of the viewport so the renderer (button
//! shapes), the DOM label overlay and the tap handler all agree on where
//! things are.

use glam::Vec2;

use crate::sim::state::{GamePhase, GameState, TurnDir};
use crate::sim::trails::{GameMode, TRAIL_COUNT, TRAILS, TrailDef};
use crate::tuning::DifficultyTier;

/// Axis-aligned rectangle in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Strict containment (edges don't count)
    pub fn contains(&self, p: Vec2) -> bool {
        p.x > self.x && p.x < self.x + self.w && p.y > self.y && p.y < self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

/// What a tap on a button does
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiAction {
    StartEndless,
    StartTrail(&'static TrailDef),
    Retry,
    Menu,
}

/// Title screen
#[derive(Debug, Clone, PartialEq)]
pub struct MenuLayout {
    pub title: Rect,
    /// Baseline of the best-score line
    pub best_y: f32,
    pub start: Rect,
    /// One button per trail, in catalog order
    pub trails: [Rect; TRAIL_COUNT],
    pub instructions: Rect,
}

pub const START_BUTTON_SIZE: Vec2 = Vec2::new(200.0, 58.0);
pub const TRAIL_BUTTON_SIZE: Vec2 = Vec2::new(136.0, 44.0);
const TRAIL_BUTTON_GAP: f32 = 8.0;

pub fn menu_layout(width: f32, height: f32) -> MenuLayout {
    let cx = width / 2.0;
    let title = Rect::new(cx - 140.0, height * 0.13, 280.0, 100.0);
    let start = Rect::new(
        cx - START_BUTTON_SIZE.x / 2.0,
        height * 0.48,
        START_BUTTON_SIZE.x,
        START_BUTTON_SIZE.y,
    );

    let grid_x = cx - TRAIL_BUTTON_SIZE.x - TRAIL_BUTTON_GAP / 2.0;
    let grid_y = start.bottom() + 14.0;
    let trails = std::array::from_fn(|i| {
        let col = (i % 2) as f32;
        let row = (i / 2) as f32;
        Rect::new(
            grid_x + col * (TRAIL_BUTTON_SIZE.x + TRAIL_BUTTON_GAP),
            grid_y + row * (TRAIL_BUTTON_SIZE.y + TRAIL_BUTTON_GAP),
            TRAIL_BUTTON_SIZE.x,
            TRAIL_BUTTON_SIZE.y,
        )
    });
    let grid_bottom = trails.iter().map(Rect::bottom).fold(grid_y, f32::max);

    let instructions = Rect::new(
        cx - 140.0,
        (height * 0.68).max(grid_bottom + 14.0),
        280.0,
        105.0,
    );

    MenuLayout {
        title,
        best_y: height * 0.38,
        start,
        trails,
        instructions,
    }
}

/// Crash / finish screen
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsLayout {
    pub title_y: f32,
    pub score_y: f32,
    pub retry: Rect,
    pub menu: Rect,
}

pub fn results_layout(width: f32, height: f32) -> ResultsLayout {
    let retry = Rect::new(width / 2.0 - 90.0, height * 0.58, 180.0, 54.0);
    let menu = Rect::new(retry.x, retry.y + 68.0, retry.w, retry.h);
    ResultsLayout {
        title_y: height * 0.3,
        score_y: height * 0.39,
        retry,
        menu,
    }
}

/// Resolve a tap to a button action for the current phase
pub fn hit_test(phase: GamePhase, width: f32, height: f32, tap: Vec2) -> Option<UiAction> {
    match phase {
        GamePhase::Menu => {
            let layout = menu_layout(width, height);
            if layout.start.contains(tap) {
                return Some(UiAction::StartEndless);
            }
            layout
                .trails
                .iter()
                .zip(TRAILS.iter())
                .find(|(rect, _)| rect.contains(tap))
                .map(|(_, trail)| UiAction::StartTrail(trail))
        }
        GamePhase::Crashed | GamePhase::Finished => {
            let layout = results_layout(width, height);
            if layout.retry.contains(tap) {
                Some(UiAction::Retry)
            } else if layout.menu.contains(tap) {
                Some(UiAction::Menu)
            } else {
                None
            }
        }
        GamePhase::Playing => None,
    }
}

/// In-run heads-up display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudLayout {
    pub score_panel: Rect,
    pub speed_bar: Rect,
    pub best_panel: Rect,
    pub tier_panel: Rect,
    pub progress_bar: Rect,
}

pub fn hud_layout(width: f32) -> HudLayout {
    HudLayout {
        score_panel: Rect::new(12.0, 12.0, 140.0, 62.0),
        speed_bar: Rect::new(22.0, 64.0, 110.0, 4.0),
        best_panel: Rect::new(width - 110.0, 12.0, 98.0, 30.0),
        tier_panel: Rect::new(width / 2.0 - 50.0, 12.0, 100.0, 22.0),
        progress_bar: Rect::new(width / 2.0 - 60.0, 40.0, 120.0, 6.0),
    }
}

/// Values shown on the HUD
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub score: u64,
    pub best: u64,
    /// Speed as a fraction of the current top speed
    pub speed_frac: f32,
    pub tier: DifficultyTier,
    /// Trail completion, for trail runs
    pub progress: Option<f32>,
    pub turn: TurnDir,
    /// Show the "hold to turn" hint early in a run
    pub show_hint: bool,
}

/// Distance during which the turning hint is shown
pub const HINT_DISTANCE: f32 = 200.0;
/// Speed fraction above which the speed bar turns hot
pub const SPEED_HOT: f32 = 0.85;

impl Hud {
    pub fn from_state(state: &GameState, best: u64) -> Self {
        let speed_frac = if state.difficulty.max_speed > 0.0 {
            (state.skier.speed / state.difficulty.max_speed).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let progress = match state.mode {
            GameMode::Endless => None,
            GameMode::Trail(_) => Some(state.mode.progress(state.distance)),
        };
        Self {
            score: state.score,
            best,
            speed_frac,
            tier: DifficultyTier::from_t(state.difficulty.t),
            progress,
            turn: state.skier.turn,
            show_hint: state.phase == GamePhase::Playing && state.distance < HINT_DISTANCE,
        }
    }
}

/// Group digits in threes: 1234567 -> "1,234,567"
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_menu_hit_testing() {
        let layout = menu_layout(400.0, 800.0);
        assert_eq!(
            hit_test(GamePhase::Menu, 400.0, 800.0, layout.start.center()),
            Some(UiAction::StartEndless)
        );
        for (rect, trail) in layout.trails.iter().zip(TRAILS.iter()) {
            assert_eq!(
                hit_test(GamePhase::Menu, 400.0, 800.0, rect.center()),
                Some(UiAction::StartTrail(trail))
            );
        }
        assert_eq!(
            hit_test(GamePhase::Menu, 400.0, 800.0, Vec2::new(5.0, 5.0)),
            None
        );
        // Edges are outside
        let edge = Vec2::new(layout.start.x, layout.start.center().y);
        assert_eq!(hit_test(GamePhase::Menu, 400.0, 800.0, edge), None);
    }

    #[test]
    fn test_results_hit_testing() {
        let layout = results_layout(400.0, 800.0);
        for phase in [GamePhase::Crashed, GamePhase::Finished] {
            assert_eq!(
                hit_test(phase, 400.0, 800.0, layout.retry.center()),
                Some(UiAction::Retry)
            );
            assert_eq!(
                hit_test(phase, 400.0, 800.0, layout.menu.center()),
                Some(UiAction::Menu)
            );
        }
        // Buttons are not live while skiing
        assert_eq!(
            hit_test(GamePhase::Playing, 400.0, 800.0, layout.retry.center()),
            None
        );
    }

    #[test]
    fn test_menu_buttons_do_not_overlap() {
        let layout = menu_layout(360.0, 640.0);
        let mut rects = vec![layout.start, layout.instructions];
        rects.extend(layout.trails);
        for (i, a) in rects.iter().enumerate() {
            for b in rects.iter().skip(i + 1) {
                let overlap = a.x < b.x + b.w
                    && b.x < a.x + a.w
                    && a.y < b.y + b.h
                    && b.y < a.y + a.h;
                assert!(!overlap, "{:?} overlaps {:?}", a, b);
            }
        }
    }
}
