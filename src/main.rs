//! Ski Run entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use ski_run::audio::{AudioManager, SoundEffect};
    use ski_run::consts::SIM_DT;
    use ski_run::persistence::{KvStore, LocalStore, MemoryStore};
    use ski_run::platform::{FpsCounter, FrameClock, InputState, Key, apply_setting_key};
    use ski_run::renderer::{RenderError, RenderState, SceneOptions, build_scene};
    use ski_run::sim::{GameEvent, GameMode, GamePhase, GameState, TRAILS, Viewport, tick};
    use ski_run::tuning::DifficultyTier;
    use ski_run::ui::{self, Hud, Rect};
    use ski_run::{BestScores, Settings, Tuning};

    /// LocalStorage key for an optional JSON balance override
    const TUNING_KEY: &str = "skiRunTuning";

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        settings: Settings,
        best: BestScores,
        store: Box<dyn KvStore>,
        audio: AudioManager,
        clock: FrameClock,
        fps: FpsCounter,
        input: InputState,
        /// Last finished run set a new best
        new_best: bool,
    }

    impl Game {
        fn new(seed: u64, viewport: Viewport) -> Self {
            let store: Box<dyn KvStore> = match LocalStore::open() {
                Ok(store) => Box::new(store),
                Err(e) => {
                    log::warn!("LocalStorage unavailable ({}), scores will not persist", e);
                    Box::new(MemoryStore::new())
                }
            };

            let settings = Settings::load(store.as_ref());
            let best = BestScores::load(store.as_ref());
            let tuning = load_tuning(store.as_ref());

            let mut game = Self {
                state: GameState::new(seed, viewport, tuning),
                render_state: None,
                settings,
                best,
                store,
                audio: AudioManager::new(),
                clock: FrameClock::new(),
                fps: FpsCounter::default(),
                input: InputState::default(),
                new_best: false,
            };
            game.apply_settings();
            game
        }

        /// Push settings into the audio and effect budgets
        fn apply_settings(&mut self) {
            self.audio.set_volume(self.settings.effective_volume());
            self.state.max_particles = self.settings.max_particles();
            let flakes = self.settings.snowflake_count();
            if self.state.snowflakes.len() != flakes {
                self.state.init_snowflakes(flakes);
            }
        }

        /// Handle a settings key, saving the result; false if `key` isn't one
        fn change_setting(&mut self, key: Key) -> bool {
            if !apply_setting_key(&mut self.settings, key) {
                return false;
            }
            self.apply_settings();
            self.settings.save(self.store.as_mut());
            true
        }

        /// Run simulation ticks for one frame
        fn update(&mut self, time: f64) {
            let dt = self.clock.delta(time);
            let steps = self.clock.advance(dt);
            for _ in 0..steps {
                let input = self.input.take_tick_input();
                tick(&mut self.state, &input, SIM_DT);
            }
            self.fps.record(time);

            for event in self.state.drain_events() {
                self.handle_event(&event);
            }
        }

        fn handle_event(&mut self, event: &GameEvent) {
            match event {
                GameEvent::RunStarted { .. } => self.new_best = false,
                GameEvent::Crashed { mode, score, .. } | GameEvent::Finished { mode, score, .. } => {
                    self.new_best = self.best.record(mode, *score);
                    if self.new_best {
                        self.best.save(self.store.as_mut());
                        self.audio.play(SoundEffect::NewBest);
                    }
                }
                _ => {}
            }

            if let Some(effect) = SoundEffect::for_event(event) {
                self.audio.play(effect);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let options = SceneOptions {
                best: self.best.best_for(&self.state.mode),
                road_strips: self.settings.quality.road_strips(),
                reduced_motion: self.settings.reduced_motion,
            };
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };

            let vertices = build_scene(&self.state, &options);
            match render_state.render(&vertices) {
                Ok(()) => {}
                Err(RenderError::SurfaceLost) => render_state.reconfigure(),
                Err(RenderError::OutOfMemory) => log::error!("Out of memory!"),
                Err(e) => log::warn!("Render error: {}", e),
            }
        }

        /// Resize canvas backing store and everything sized from it
        fn resize(&mut self, canvas: &HtmlCanvasElement, dpr: f64) {
            let client_w = canvas.client_width().max(1);
            let client_h = canvas.client_height().max(1);
            let width = (client_w as f64 * dpr) as u32;
            let height = (client_h as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);

            let viewport = Viewport::new(client_w as f32, client_h as f32);
            self.state.set_viewport(viewport);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height, (viewport.width, viewport.height));
            }
        }

        /// Update DOM text labels
        fn update_hud(&self, document: &Document) {
            let phase = self.state.phase;
            let vp = self.state.viewport;
            let best = self.best.best_for(&self.state.mode);

            // Title screen
            set_visible(document, "menu", phase == GamePhase::Menu);
            if phase == GamePhase::Menu {
                let layout = ui::menu_layout(vp.width, vp.height);
                place(document, "menu-title", &layout.title);
                place_line(document, "menu-best", layout.best_y);
                set_visible(document, "menu-best", self.best.endless > 0);
                set_text(
                    document,
                    "menu-best",
                    &format!("Best: {}", ui::format_thousands(self.best.endless)),
                );
                place(document, "btn-start", &layout.start);
                for (i, (trail, rect)) in TRAILS.iter().zip(layout.trails.iter()).enumerate() {
                    let id = format!("trail-{}", i);
                    place(document, &id, rect);
                    let trail_best = self.best.best_for(&GameMode::Trail(trail));
                    let html = if trail_best > 0 {
                        format!(
                            "<span class=\"trail-name\">{}</span><span class=\"trail-best\">Best {}</span>",
                            trail.name,
                            ui::format_thousands(trail_best)
                        )
                    } else {
                        format!("<span class=\"trail-name\">{}</span>", trail.name)
                    };
                    if let Some(el) = document.get_element_by_id(&id) {
                        if el.inner_html() != html {
                            el.set_inner_html(&html);
                        }
                    }
                }
                place(document, "menu-help", &layout.instructions);
            }

            // In-run HUD, left up behind the results overlay
            set_visible(document, "hud", phase != GamePhase::Menu);
            if phase != GamePhase::Menu {
                let hud = Hud::from_state(&self.state, best);
                let layout = ui::hud_layout(vp.width);
                place(document, "hud-score", &layout.score_panel);
                set_text(document, "hud-score-value", &ui::format_thousands(hud.score));
                place(document, "hud-best", &layout.best_panel);
                set_visible(document, "hud-best", hud.best > 0);
                set_text(
                    document,
                    "hud-best",
                    &format!("BEST {}", ui::format_thousands(hud.best)),
                );
                place(document, "hud-tier", &layout.tier_panel);
                set_text(document, "hud-tier", hud.tier.label());
                set_class(document, "hud-tier", tier_class(hud.tier));
                place_line(document, "hud-hint", vp.height * 0.7);
                set_visible(document, "hud-hint", hud.show_hint);
            }

            set_visible(document, "hud-fps", self.settings.show_fps);
            set_text(document, "hud-fps", &format!("{} FPS", self.fps.fps()));

            // Crash / finish screen
            set_visible(document, "results", phase.is_results());
            if phase.is_results() {
                let layout = ui::results_layout(vp.width, vp.height);
                let title = match phase {
                    GamePhase::Finished => "FINISHED!",
                    _ => "WIPEOUT!",
                };
                place_line(document, "results-title", layout.title_y);
                set_text(document, "results-title", title);
                place_line(document, "results-score", layout.score_y);
                set_text(
                    document,
                    "results-score",
                    &ui::format_thousands(self.state.score),
                );
                place_line(document, "results-score-label", vp.height * 0.43);
                place_line(document, "results-new-best", vp.height * 0.48);
                set_visible(document, "results-new-best", self.new_best);
                place_line(document, "results-distance", vp.height * 0.53);
                set_text(
                    document,
                    "results-distance",
                    &format!("{}m traveled", self.state.distance.floor() as u64),
                );
                place(document, "btn-retry", &layout.retry);
                place(document, "btn-menu", &layout.menu);
            }
        }
    }

    /// Balance override from storage, or defaults
    fn load_tuning(store: &dyn KvStore) -> Tuning {
        match store.get(TUNING_KEY) {
            Ok(Some(json)) => match Tuning::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Using tuning override from {}", TUNING_KEY);
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring tuning override: {}", e);
                    Tuning::default()
                }
            },
            Ok(None) => Tuning::default(),
            Err(e) => {
                log::warn!("Failed to read {}: {}", TUNING_KEY, e);
                Tuning::default()
            }
        }
    }

    fn tier_class(tier: DifficultyTier) -> &'static str {
        match tier {
            DifficultyTier::Green => "label tier green",
            DifficultyTier::Blue => "label tier blue",
            DifficultyTier::Black => "label tier black",
            DifficultyTier::DoubleBlack => "label tier double-black",
        }
    }

    // === DOM helpers ===

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_class(document: &Document, id: &str, class: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", class);
        }
    }

    /// Toggle the `hidden` attribute
    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            if visible {
                let _ = el.remove_attribute("hidden");
            } else {
                let _ = el.set_attribute("hidden", "");
            }
        }
    }

    /// Position a label over a layout rectangle (CSS pixels)
    fn place(document: &Document, id: &str, rect: &Rect) {
        if let Some(el) = document.get_element_by_id(id) {
            let style = format!(
                "left:{:.0}px;top:{:.0}px;width:{:.0}px;height:{:.0}px",
                rect.x, rect.y, rect.w, rect.h
            );
            let _ = el.set_attribute("style", &style);
        }
    }

    /// Position a full-width, centred line of text on a baseline
    fn place_line(document: &Document, id: &str, baseline: f32) {
        if let Some(el) = document.get_element_by_id(id) {
            let style = format!("left:0;width:100%;top:{:.0}px", baseline);
            let _ = el.set_attribute("style", &style);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Ski Run starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let viewport = Viewport::new(client_w as f32, client_h as f32);
        let game = Rc::new(RefCell::new(Game::new(seed, viewport)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        match init_renderer(&instance, &canvas, width, height, viewport).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Renderer unavailable: {}", e);
                set_text(&document, "loading", "This browser cannot run WebGPU or WebGL2.");
                return;
            }
        }

        // Hide loading indicator
        set_visible(&document, "loading", false);

        setup_input_handlers(&canvas, game.clone());
        setup_window_handlers(&canvas, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Ski Run running!");
    }

    async fn init_renderer(
        instance: &wgpu::Instance,
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
        viewport: Viewport,
    ) -> Result<RenderState, RenderError> {
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| RenderError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| RenderError::NoAdapter(e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(
            surface,
            &adapter,
            width,
            height,
            (viewport.width, viewport.height),
        )
        .await
    }

    /// Touch position relative to the canvas (CSS pixels)
    fn touch_pos(canvas: &HtmlCanvasElement, touch: &web_sys::Touch) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        Vec2::new(
            touch.client_x() as f32 - rect.left() as f32,
            touch.client_y() as f32 - rect.top() as f32,
        )
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse down - turn toward the pressed half, and tap buttons
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                let width = canvas_clone.client_width() as f32;
                let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                let phase = g.state.phase;
                g.input.pointer_down(pos, width, phase);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up (on the window, so releasing off-canvas still straightens)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.pointer_up();
            });
            if let Some(window) = web_sys::window() {
                let _ = window
                    .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.audio.resume();
                if let Some(touch) = event.changed_touches().get(0) {
                    let width = canvas_clone.client_width() as f32;
                    let pos = touch_pos(&canvas_clone, &touch);
                    let phase = g.state.phase;
                    g.input.pointer_down(pos, width, phase);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move - follow the finger across the middle
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let width = canvas_clone.client_width() as f32;
                    let pos = touch_pos(&canvas_clone, &touch);
                    game.borrow_mut().input.pointer_move(pos, width);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end - straighten once no finger remains
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if event.touches().length() == 0 {
                    game.borrow_mut().input.pointer_up();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            let _ = canvas
                .add_event_listener_with_callback("touchcancel", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        let Some(window) = web_sys::window() else {
            return;
        };
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                let Some(key) = Key::from_dom(&event.key()) else {
                    return;
                };
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.audio.resume();
                if !g.change_setting(key) {
                    let (phase, viewport) = (g.state.phase, g.state.viewport);
                    g.input.key_down(key, phase, viewport);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_dom(&event.key()) {
                    game.borrow_mut().input.key_up(key);
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_window_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Window resize
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let dpr = web_sys::window()
                    .map(|w| w.device_pixel_ratio())
                    .unwrap_or(1.0);
                game.borrow_mut().resize(&canvas_clone, dpr);
            });
            let _ =
                window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Visibility change (tab switch, minimize): drop held input, skip the gap
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.input.release_all();
                    g.clock.reset();
                    log::info!("Tab hidden, input released");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().input.release_all();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Native build: no window, so run the autopilot down every course headless
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use ski_run::BestScores;
    use ski_run::consts::SIM_DT;
    use ski_run::persistence::MemoryStore;
    use ski_run::sim::{GameMode, GameState, TRAILS, TickInput, Viewport, apply_action, tick};
    use ski_run::tuning::Tuning;
    use ski_run::ui::UiAction;

    /// Give up on a run after ten simulated minutes
    const MAX_STEPS: u32 = 120 * 60 * 10;
    const DEMO_SEED: u64 = 42;

    env_logger::init();
    log::info!("Ski Run (native) starting...");
    log::info!("Native mode is a headless autopilot demo - run with `trunk serve` for the game");

    let mut store = MemoryStore::new();
    let mut best = BestScores::load(&store);
    let mut state = GameState::new(DEMO_SEED, Viewport::new(400.0, 800.0), Tuning::default());
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let runs = std::iter::once(UiAction::StartEndless)
        .chain(TRAILS.iter().map(UiAction::StartTrail));
    for action in runs {
        apply_action(&mut state, action);
        let mut steps = 0;
        while !state.phase.is_results() && steps < MAX_STEPS {
            tick(&mut state, &input, SIM_DT);
            steps += 1;
        }

        let name = match state.mode {
            GameMode::Endless => "Endless",
            GameMode::Trail(trail) => trail.name,
        };
        let new_best = best.record(&state.mode, state.score);
        println!(
            "{:<14} {:?} after {:>7.0}m, score {:>6}{}",
            name,
            state.phase,
            state.distance,
            state.score,
            if new_best { " (new best)" } else { "" }
        );
        state.return_to_menu();
        state.drain_events();
    }

    best.save(&mut store);
    log::info!("Saved {} records", store.len());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
