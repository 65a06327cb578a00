//! Frame composition
//!
//! Builds the whole frame as one triangle list in CSS pixels, painted back
//! to front. Text is not drawn here; the host positions DOM labels from the
//! same `ui` layouts.

use glam::Vec2;

use super::projection::{Camera, road_strips};
use super::shapes;
use super::vertex::{Vertex, colors, with_alpha};
use crate::consts::{DRAW_DIST, HORIZON, SEG_LENGTH};
use crate::sim::state::{GamePhase, GameState, Obstacle, ObstacleKind, TurnDir};
use crate::sim::trails::{GameMode, TRAILS};
use crate::tuning::DifficultyTier;
use crate::ui::{self, Hud, Rect, SPEED_HOT};

/// Per-frame inputs that don't live in the simulation
#[derive(Debug, Clone, Copy)]
pub struct SceneOptions {
    /// Best score for the current mode
    pub best: u64,
    /// Number of horizontal slope strips
    pub road_strips: usize,
    /// Skip the turn-side glow
    pub reduced_motion: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            best: 0,
            road_strips: 120,
            reduced_motion: false,
        }
    }
}

/// HUD colour for a difficulty tier
pub fn tier_color(tier: DifficultyTier) -> [f32; 4] {
    match tier {
        DifficultyTier::Green => colors::TIER_GREEN,
        DifficultyTier::Blue => colors::TIER_BLUE,
        DifficultyTier::Black => colors::TIER_BLACK,
        DifficultyTier::DoubleBlack => colors::TIER_DOUBLE_BLACK,
    }
}

/// Build all vertices for the current frame
pub fn build_scene(state: &GameState, options: &SceneOptions) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(8192);

    if state.phase == GamePhase::Menu {
        draw_menu(&mut out, state);
        return out;
    }

    let (w, h) = (state.viewport.width, state.viewport.height);
    let camera = Camera::from_state(state);

    draw_sky(&mut out, w, h);
    draw_mountains(&mut out, w, h);
    draw_road(&mut out, state, &camera, options.road_strips);
    draw_obstacles(&mut out, state, &camera);
    draw_finish_banner(&mut out, state, &camera);
    draw_snowflakes(&mut out, state);
    draw_particles(&mut out, state);
    draw_skier_pov(&mut out, w, h, state.skier.turn);

    let hud = Hud::from_state(state, options.best);
    draw_hud(&mut out, w, &hud);

    if state.phase == GamePhase::Playing && !options.reduced_motion {
        draw_turn_glow(&mut out, w, h, hud.turn);
    }

    if state.phase.is_results() {
        draw_results(&mut out, w, h);
    }

    out
}

fn draw_sky(out: &mut Vec<Vertex>, w: f32, h: f32) {
    let horizon = h * HORIZON;
    let mid = horizon * 0.5;
    out.extend(shapes::vertical_gradient(0.0, 0.0, w, mid, colors::SKY_TOP, colors::SKY_MID));
    out.extend(shapes::vertical_gradient(
        0.0,
        mid,
        w,
        horizon - mid + 1.0,
        colors::SKY_MID,
        colors::SKY_HORIZON,
    ));
}

/// Ridge line as (fraction of width, height above the horizon)
const RIDGE: [(f32, f32); 10] = [
    (0.0, 0.0),
    (0.1, 40.0),
    (0.2, 15.0),
    (0.35, 65.0),
    (0.5, 25.0),
    (0.65, 70.0),
    (0.8, 30.0),
    (0.9, 50.0),
    (1.0, 20.0),
    (1.0, 0.0),
];

fn draw_mountains(out: &mut Vec<Vertex>, w: f32, h: f32) {
    let horizon = h * HORIZON;
    for pair in RIDGE.windows(2) {
        let (x0, h0) = pair[0];
        let (x1, h1) = pair[1];
        out.extend(shapes::polygon(
            &[
                Vec2::new(x0 * w, horizon - h0),
                Vec2::new(x1 * w, horizon - h1),
                Vec2::new(x1 * w, horizon),
                Vec2::new(x0 * w, horizon),
            ],
            colors::MOUNTAIN,
        ));
    }

    // Snow caps on the two tallest peaks
    for (peak, height, cap) in [(0.35, 65.0, 40.0), (0.65, 70.0, 42.0)] {
        out.extend(shapes::triangle(
            Vec2::new(w * peak, horizon - height),
            Vec2::new(w * (peak - 0.05), horizon - cap),
            Vec2::new(w * (peak + 0.05), horizon - cap),
            colors::MOUNTAIN_SNOW,
        ));
    }
}

fn draw_road(out: &mut Vec<Vertex>, state: &GameState, camera: &Camera, count: usize) {
    let (w, h) = (state.viewport.width, state.viewport.height);
    let horizon = h * HORIZON;
    let strips = road_strips(camera, &state.track, state.difficulty.half_width, count);

    // Far snow between the horizon and the first strip
    if let Some(first) = strips.first() {
        out.extend(shapes::rect(0.0, horizon, w, first.y_top - horizon + 0.5, colors::OFF_PISTE));
    }

    for strip in &strips {
        // Bands scroll with world depth
        let band = (strip.world_z / (SEG_LENGTH * 0.8)).floor() as i64;
        let even = band.rem_euclid(2) == 0;
        let (off_piste, trail) = if even {
            (colors::OFF_PISTE, colors::TRAIL)
        } else {
            (colors::OFF_PISTE_ALT, colors::TRAIL_ALT)
        };
        let height = strip.y_bottom - strip.y_top;

        out.extend(shapes::rect(0.0, strip.y_top, w, height, off_piste));
        out.extend(shapes::trapezoid(
            strip.y_top,
            (strip.center_top - strip.half_top, strip.center_top + strip.half_top),
            strip.y_bottom,
            (
                strip.center_bottom - strip.half_bottom,
                strip.center_bottom + strip.half_bottom,
            ),
            trail,
        ));

        // Edge markers, thicker up close
        let marker_top = 3.0 * strip.half_top / w.max(1.0) * 4.0 + 1.0;
        let marker_bottom = 3.0 * strip.half_bottom / w.max(1.0) * 4.0 + 1.0;
        for side in [-1.0, 1.0] {
            let top = strip.center_top + side * strip.half_top;
            let bottom = strip.center_bottom + side * strip.half_bottom;
            out.extend(shapes::trapezoid(
                strip.y_top,
                (top - marker_top / 2.0, top + marker_top / 2.0),
                strip.y_bottom,
                (bottom - marker_bottom / 2.0, bottom + marker_bottom / 2.0),
                colors::TRAIL_EDGE,
            ));
        }

        // Centre dashes
        let dash = (strip.world_z / 6.0).floor() as i64;
        if dash.rem_euclid(3) == 0 {
            out.extend(shapes::trapezoid(
                strip.y_top,
                (strip.center_top - 1.0, strip.center_top + 1.0),
                strip.y_bottom,
                (strip.center_bottom - 1.0, strip.center_bottom + 1.0),
                colors::CENTRE_DASH,
            ));
        }
    }
}

fn draw_obstacles(out: &mut Vec<Vertex>, state: &GameState, camera: &Camera) {
    let h = state.viewport.height;
    let mut visible: Vec<&Obstacle> = state
        .obstacles
        .iter()
        .filter(|o| o.z > state.distance && o.z < state.distance + DRAW_DIST)
        .collect();
    // Far to near, spawn order breaks ties
    visible.sort_by(|a, b| b.z.total_cmp(&a.z).then(a.id.cmp(&b.id)));

    for obstacle in visible {
        let Some(p) = camera.project_on_track(&state.track, obstacle.lane, obstacle.z) else {
            continue;
        };
        if p.y < 0.0 || p.y > h {
            continue;
        }
        let base = Vec2::new(p.x, p.y);
        let s = p.lane_px * 0.6;
        match obstacle.kind {
            ObstacleKind::Tree => draw_tree(out, base, s),
            ObstacleKind::Rock => draw_rock(out, base, s),
            ObstacleKind::Snowman => draw_snowman(out, base, s),
            ObstacleKind::Gate => draw_gate(out, base, s, obstacle.passed),
        }
    }
}

fn draw_tree(out: &mut Vec<Vertex>, base: Vec2, s: f32) {
    let size = (s * 0.8).max(2.0);
    let (x, y) = (base.x, base.y);

    out.extend(shapes::ellipse(
        Vec2::new(x + size * 0.1, y),
        Vec2::new(size * 0.5, size * 0.15),
        0.0,
        colors::SHADOW,
        shapes::segments_for_radius(size * 0.5),
    ));
    out.extend(shapes::rect(x - size * 0.06, y - size * 0.6, size * 0.12, size * 0.6, colors::TRUNK));

    for (i, green) in colors::FOLIAGE.iter().enumerate() {
        let i = i as f32;
        let top = y - size * (1.3 - i * 0.3);
        let half = size * (0.35 + i * 0.05);
        out.extend(shapes::triangle(
            Vec2::new(x, top),
            Vec2::new(x - half, top + size * 0.4),
            Vec2::new(x + half, top + size * 0.4),
            *green,
        ));
    }

    out.extend(shapes::triangle(
        Vec2::new(x, y - size * 1.35),
        Vec2::new(x - size * 0.18, y - size * 1.1),
        Vec2::new(x + size * 0.18, y - size * 1.1),
        colors::SNOW,
    ));
}

fn draw_rock(out: &mut Vec<Vertex>, base: Vec2, s: f32) {
    let size = (s * 0.5).max(2.0);
    let (x, y) = (base.x, base.y);
    let at = |dx: f32, dy: f32| Vec2::new(x + size * dx, y - size * dy);

    out.extend(shapes::ellipse(
        base,
        Vec2::new(size * 0.5, size * 0.15),
        0.0,
        colors::SHADOW,
        shapes::segments_for_radius(size * 0.5),
    ));
    out.extend(shapes::polygon(
        &[
            at(-0.4, 0.0),
            at(-0.2, 0.45),
            at(0.15, 0.5),
            at(0.4, 0.15),
            at(0.35, 0.0),
        ],
        colors::ROCK,
    ));
    out.extend(shapes::polygon(
        &[at(-0.15, 0.3), at(0.1, 0.48), at(0.3, 0.15), at(0.05, 0.15)],
        colors::ROCK_HIGHLIGHT,
    ));
}

fn draw_snowman(out: &mut Vec<Vertex>, base: Vec2, s: f32) {
    let size = (s * 0.6).max(2.0);
    let (x, y) = (base.x, base.y);

    out.extend(shapes::ellipse(
        base,
        Vec2::new(size * 0.35, size * 0.1),
        0.0,
        with_alpha(colors::SHADOW, 0.08),
        shapes::segments_for_radius(size * 0.35),
    ));

    for ((lift, radius), color) in [(0.2, 0.3), (0.55, 0.22), (0.82, 0.15)]
        .into_iter()
        .zip(colors::SNOWMAN)
    {
        out.extend(shapes::circle(
            Vec2::new(x, y - size * lift),
            size * radius,
            color,
            shapes::segments_for_radius(size * radius),
        ));
    }

    // Hat: crown and brim
    out.extend(shapes::rect(x - size * 0.12, y - size * 1.05, size * 0.24, size * 0.15, colors::HAT));
    out.extend(shapes::rect(x - size * 0.18, y - size * 0.93, size * 0.36, size * 0.04, colors::HAT));

    for side in [-1.0, 1.0] {
        out.extend(shapes::circle(
            Vec2::new(x + side * size * 0.05, y - size * 0.84),
            (size * 0.02).max(0.5),
            colors::EYE,
            6,
        ));
    }

    out.extend(shapes::triangle(
        Vec2::new(x, y - size * 0.8),
        Vec2::new(x + size * 0.12, y - size * 0.78),
        Vec2::new(x, y - size * 0.76),
        colors::CARROT,
    ));
}

fn draw_gate(out: &mut Vec<Vertex>, base: Vec2, s: f32, passed: bool) {
    let size = (s * 0.8).max(2.0);
    let (x, y) = (base.x, base.y);
    let hw = size * 0.5;
    let (pole, banner) = if passed {
        (colors::GATE_PASSED, colors::GATE_PASSED_BANNER)
    } else {
        (colors::GATE, colors::GATE_BANNER)
    };

    for px in [x - hw, x + hw] {
        out.extend(shapes::rect(px - size * 0.03, y - size * 0.9, size * 0.06, size * 0.9, pole));
    }
    out.extend(shapes::rect(x - hw, y - size * 0.8, hw * 2.0, size * 0.15, banner));

    if !passed {
        for i in 0..3 {
            let sy = y - size * 0.85 + i as f32 * size * 0.25;
            for px in [x - hw, x + hw] {
                out.extend(shapes::rect(px - size * 0.03, sy, size * 0.06, size * 0.08, colors::SNOW));
            }
        }
    }
}

/// Checkered banner across the trail at a trail's finish line
fn draw_finish_banner(out: &mut Vec<Vertex>, state: &GameState, camera: &Camera) {
    let GameMode::Trail(trail) = state.mode else {
        return;
    };
    if trail.length - state.distance >= DRAW_DIST {
        return;
    }
    let Some(p) = camera.project_on_track(&state.track, 0.0, trail.length) else {
        return;
    };

    let half = (state.difficulty.half_width + 0.1) * p.lane_px;
    let height = p.lane_px * 0.9;
    let pole_w = (p.lane_px * 0.04).max(1.0);
    for side in [-1.0, 1.0] {
        out.extend(shapes::rect(
            p.x + side * half - pole_w / 2.0,
            p.y - height,
            pole_w,
            height,
            colors::FINISH_POLE,
        ));
    }

    const CHECKS: usize = 12;
    let banner_h = height * 0.2;
    let cell = half * 2.0 / CHECKS as f32;
    for row in 0..2 {
        for col in 0..CHECKS {
            let color = if (row + col) % 2 == 0 {
                colors::SNOW
            } else {
                colors::FINISH_DARK
            };
            out.extend(shapes::rect(
                p.x - half + col as f32 * cell,
                p.y - height + row as f32 * banner_h / 2.0,
                cell,
                banner_h / 2.0,
                color,
            ));
        }
    }
}

fn draw_snowflakes(out: &mut Vec<Vertex>, state: &GameState) {
    for flake in &state.snowflakes {
        out.extend(shapes::circle(
            flake.pos,
            flake.radius,
            with_alpha(colors::SNOW, flake.opacity),
            6,
        ));
    }
}

fn draw_particles(out: &mut Vec<Vertex>, state: &GameState) {
    for particle in &state.particles {
        let alpha = (particle.life / particle.max_life).max(0.0) * 0.9;
        out.extend(shapes::circle(
            particle.pos,
            particle.size,
            with_alpha(colors::SNOW, alpha),
            6,
        ));
    }
}

/// Skis, poles and gloves seen from the skier's eyes
fn draw_skier_pov(out: &mut Vec<Vertex>, w: f32, h: f32, turn: TurnDir) {
    const SPREAD: f32 = 22.0;
    const SKI_LEN: f32 = 55.0;
    let bx = w / 2.0;
    let by = h * 0.92;
    let lean = turn.sign() * 0.15 * 20.0;

    for side in [-1.0, 1.0] {
        let tail = Vec2::new(bx + side * SPREAD, by + 10.0);
        let tip = Vec2::new(bx + side * SPREAD - lean, by - SKI_LEN);
        out.extend(shapes::line(tail, tip, 3.5, colors::SKI));
        out.extend(shapes::quadratic_stroke(
            tip,
            tip - Vec2::new(0.0, 10.0),
            tip + Vec2::new(4.0, -12.0),
            2.5,
            colors::SKI,
        ));
    }

    // Poles: the inside pole digs in on a turn
    for side in [-1.0, 1.0] {
        let grip = Vec2::new(bx + side * 40.0, by - 30.0);
        let (grip, end, basket) = match turn {
            TurnDir::Straight => (
                Vec2::new(bx + side * 40.0, by - 25.0),
                Vec2::new(bx + side * 50.0, by - SKI_LEN - 5.0),
                false,
            ),
            _ if side == turn.sign() => (grip, Vec2::new(bx + side * 80.0, by - SKI_LEN - 30.0), true),
            _ => (grip, Vec2::new(bx + side * 55.0, by - SKI_LEN - 10.0), false),
        };
        out.extend(shapes::line(grip, end, 2.0, colors::POLE));
        if basket {
            out.extend(shapes::circle(end, 3.0, colors::BASKET, 8));
        }
    }

    for side in [-1.0, 1.0] {
        out.extend(shapes::ellipse(
            Vec2::new(bx + side * 40.0, by - 25.0),
            Vec2::new(7.0, 5.0),
            side * 0.3,
            colors::GLOVE,
            12,
        ));
    }
}

fn panel(out: &mut Vec<Vertex>, r: Rect, radius: f32, color: [f32; 4]) {
    out.extend(shapes::rounded_rect(r.x, r.y, r.w, r.h, radius, color));
}

fn draw_hud(out: &mut Vec<Vertex>, w: f32, hud: &Hud) {
    let layout = ui::hud_layout(w);

    panel(out, layout.score_panel, 10.0, colors::PANEL);

    let bar = layout.speed_bar;
    out.extend(shapes::rect(bar.x, bar.y, bar.w, bar.h, colors::BAR_TRACK));
    let speed_color = if hud.speed_frac > SPEED_HOT {
        colors::SPEED_HOT
    } else {
        colors::SPEED
    };
    out.extend(shapes::rect(bar.x, bar.y, bar.w * hud.speed_frac, bar.h, speed_color));

    if hud.best > 0 {
        panel(out, layout.best_panel, 8.0, colors::PANEL_LIGHT);
    }

    panel(out, layout.tier_panel, 6.0, colors::PANEL_LIGHT);
    let tier = layout.tier_panel;
    out.extend(shapes::circle(
        Vec2::new(tier.x + 10.0, tier.y + tier.h / 2.0),
        3.5,
        tier_color(hud.tier),
        10,
    ));

    if let Some(progress) = hud.progress {
        let bar = layout.progress_bar;
        out.extend(shapes::rounded_rect(bar.x, bar.y, bar.w, bar.h, 3.0, colors::PANEL_LIGHT));
        out.extend(shapes::rounded_rect(
            bar.x,
            bar.y,
            bar.w * progress,
            bar.h,
            3.0,
            colors::PROGRESS,
        ));
    }
}

fn draw_turn_glow(out: &mut Vec<Vertex>, w: f32, h: f32, turn: TurnDir) {
    const GLOW_W: f32 = 60.0;
    let clear = with_alpha(colors::TURN_GLOW, 0.0);
    match turn {
        TurnDir::Left => out.extend(shapes::horizontal_gradient(
            0.0,
            0.0,
            GLOW_W,
            h,
            colors::TURN_GLOW,
            clear,
        )),
        TurnDir::Right => out.extend(shapes::horizontal_gradient(
            w - GLOW_W,
            0.0,
            GLOW_W,
            h,
            clear,
            colors::TURN_GLOW,
        )),
        TurnDir::Straight => {}
    }
}

fn draw_results(out: &mut Vec<Vertex>, w: f32, h: f32) {
    let layout = ui::results_layout(w, h);
    out.extend(shapes::rect(0.0, 0.0, w, h, colors::OVERLAY));
    panel(out, layout.retry, layout.retry.h / 2.0, colors::BUTTON);
    panel(out, layout.menu, layout.menu.h / 2.0, colors::BUTTON_SECONDARY);
}

fn draw_menu(out: &mut Vec<Vertex>, state: &GameState) {
    let (w, h) = (state.viewport.width, state.viewport.height);
    let horizon = h * HORIZON;

    out.extend(shapes::vertical_gradient(0.0, 0.0, w, h * 0.4, colors::SKY_TOP, colors::SKY_MID));
    out.extend(shapes::vertical_gradient(
        0.0,
        h * 0.4,
        w,
        h * 0.6,
        colors::SKY_MID,
        colors::MENU_GROUND,
    ));
    draw_mountains(out, w, h);
    out.extend(shapes::rect(0.0, horizon, w, h - horizon, colors::MENU_GROUND));
    draw_snowflakes(out, state);

    let layout = ui::menu_layout(w, h);
    panel(out, layout.title, 16.0, colors::TITLE_CARD);
    panel(out, layout.start, layout.start.h / 2.0, colors::BUTTON);
    for (rect, trail) in layout.trails.iter().zip(TRAILS.iter()) {
        let color = with_alpha(tier_color(DifficultyTier::from_t(trail.t_start)), 0.9);
        panel(out, *rect, 10.0, color);
    }
    panel(out, layout.instructions, 12.0, colors::INSTRUCTIONS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use crate::tuning::Tuning;

    fn state() -> GameState {
        GameState::new(5, Viewport::new(400.0, 800.0), Tuning::default())
    }

    fn in_bounds(vertices: &[Vertex], w: f32, h: f32) -> bool {
        vertices.iter().all(|v| {
            v.position[0].is_finite()
                && v.position[1].is_finite()
                && v.position[1] >= -100.0
                && v.position[1] <= h + 100.0
                && v.position[0] >= -w * 4.0
                && v.position[0] <= w * 5.0
        })
    }

    #[test]
    fn test_every_phase_builds_triangles() {
        let mut state = state();
        let options = SceneOptions::default();
        for phase in [
            GamePhase::Menu,
            GamePhase::Playing,
            GamePhase::Crashed,
            GamePhase::Finished,
        ] {
            if phase != GamePhase::Menu {
                state.start_run(GameMode::Endless);
                state.phase = phase;
            }
            let vertices = build_scene(&state, &options);
            assert!(!vertices.is_empty());
            assert_eq!(vertices.len() % 3, 0);
            assert!(in_bounds(&vertices, 400.0, 800.0), "{:?}", phase);
        }
    }

    #[test]
    fn test_results_overlay_adds_buttons() {
        let mut state = state();
        state.start_run(GameMode::Endless);
        let options = SceneOptions::default();
        let playing = build_scene(&state, &options).len();
        state.phase = GamePhase::Crashed;
        let crashed = build_scene(&state, &options).len();
        assert!(crashed > playing);
    }

    #[test]
    fn test_more_strips_more_geometry() {
        let mut state = state();
        state.start_run(GameMode::Endless);
        let low = build_scene(
            &state,
            &SceneOptions {
                road_strips: 60,
                ..Default::default()
            },
        );
        let high = build_scene(
            &state,
            &SceneOptions {
                road_strips: 180,
                ..Default::default()
            },
        );
        assert!(high.len() > low.len());
    }

    #[test]
    fn test_obstacles_drawn_only_ahead() {
        let mut state = state();
        state.start_run(GameMode::Endless);
        state.next_obstacle_z = f32::MAX;
        let options = SceneOptions::default();
        let empty = build_scene(&state, &options).len();

        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            kind: ObstacleKind::Tree,
            lane: 0.0,
            z: -5.0,
            passed: false,
        });
        assert_eq!(build_scene(&state, &options).len(), empty);

        state.obstacles[0].z = 40.0;
        assert!(build_scene(&state, &options).len() > empty);
    }

    #[test]
    fn test_finish_banner_near_line() {
        let mut state = state();
        state.start_run(GameMode::Trail(&TRAILS[0]));
        state.next_obstacle_z = f32::MAX;

        let mut far = Vec::new();
        draw_finish_banner(&mut far, &state, &Camera::from_state(&state));
        assert!(far.is_empty());

        state.distance = TRAILS[0].length - 50.0;
        state.track.recycle(state.distance, 0.0);
        let mut near = Vec::new();
        draw_finish_banner(&mut near, &state, &Camera::from_state(&state));
        assert!(!near.is_empty());

        // Endless runs have no finish line
        state.start_run(GameMode::Endless);
        state.distance = TRAILS[0].length - 50.0;
        let mut endless = Vec::new();
        draw_finish_banner(&mut endless, &state, &Camera::from_state(&state));
        assert!(endless.is_empty());
    }

    #[test]
    fn test_tier_colors_distinct() {
        let tiers = [
            DifficultyTier::Green,
            DifficultyTier::Blue,
            DifficultyTier::Black,
            DifficultyTier::DoubleBlack,
        ];
        for (i, a) in tiers.iter().enumerate() {
            for b in tiers.iter().skip(i + 1) {
                assert_ne!(tier_color(*a), tier_color(*b));
            }
        }
    }
}
