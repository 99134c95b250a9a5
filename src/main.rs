//! Rusher entry point
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

    use rusher::persistence::{self, KeyValueStore, LocalStorage, MemoryStore};
    use rusher::platform::{Intent, ScreenRect, screen_to_playfield};
    use rusher::renderer::{RenderState, ShapeBatch};
    use rusher::sim::{GameEvent, Playfield, World, fire, spawn_tick, tick};
    use rusher::ui::MenuView;
    use rusher::{Difficulty, HighScore, Settings, Tuning};

    /// Logical playfield size; the canvas is scaled to fit
    const FIELD: Playfield = Playfield::new(800.0, 600.0);

    /// Game instance holding all state
    struct Game {
        world: World,
        render_state: Option<RenderState>,
        batch: ShapeBatch,
        intent: Intent,
        store: Box<dyn KeyValueStore>,
        high: HighScore,
        settings: Settings,
        /// A refresh callback is scheduled
        loop_active: bool,
    }

    impl Game {
        fn new(seed: u64, store: Box<dyn KeyValueStore>) -> Self {
            let settings = Settings::load(&store);
            let tuning: Tuning = persistence::load_or_default(&store, Tuning::STORAGE_KEY);
            let high = HighScore::load(&store);
            log::info!(
                "Loaded high score {} (difficulty {})",
                high.best,
                settings.difficulty.as_str()
            );
            Self {
                world: World::new(seed, FIELD, tuning, &settings, high.best),
                render_state: None,
                batch: ShapeBatch::new(FIELD.width, FIELD.height),
                intent: Intent::default(),
                store,
                high,
                settings,
                loop_active: false,
            }
        }

        /// Run one frame and present it
        fn frame(&mut self) {
            self.batch.clear();
            tick(&mut self.world, &self.intent, &mut self.batch);

            if let Some(render_state) = &mut self.render_state {
                match render_state.render(&self.batch, self.settings.trails) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let (w, h) = render_state.size;
                        render_state.resize(w, h);
                    }
                    Err(e) => log::error!("Render error: {:?}", e),
                }
            }

            self.update_hud();
            self.process_events();
        }

        fn process_events(&mut self) {
            for event in self.world.drain_events() {
                match event {
                    GameEvent::NewHighScore(score) => {
                        if self.high.record(score) {
                            if let Err(e) = self.high.save(&mut self.store) {
                                log::warn!("Failed to save high score: {}", e);
                            }
                        }
                    }
                    GameEvent::GameOver => {
                        log::info!("Game over: {}", self.world.score_text());
                        self.update_menu();
                    }
                    _ => {}
                }
            }
        }

        fn update_hud(&self) {
            let Some(document) = document() else { return };
            if let Some(hud) = document.get_element_by_id("hud") {
                let text = self
                    .batch
                    .labels
                    .iter()
                    .map(|label| label.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n");
                hud.set_text_content(Some(&text));
            }
        }

        fn update_menu(&self) {
            show_menu(&MenuView::for_world(&self.world));
        }

        fn toggle_difficulty(&mut self) {
            let next = match self.settings.difficulty {
                Difficulty::Normal => Difficulty::Hard,
                Difficulty::Hard => Difficulty::Normal,
            };
            self.settings.difficulty = next;
            self.world.difficulty = next;
            if let Err(e) = self.settings.save(&mut self.store) {
                log::warn!("Failed to save settings: {}", e);
            }
            log::info!("Difficulty set to {}", next.as_str());
        }

        fn restart(&mut self) {
            self.world.reset();
            self.intent.clear();
            self.update_menu();
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn show_menu(view: &MenuView) {
        let Some(document) = document() else { return };

        if let Some(menu) = document.get_element_by_id("menu") {
            let _ = if view.visible {
                menu.class_list().remove_1("hidden")
            } else {
                menu.class_list().add_1("hidden")
            };
        }
        if let Some(el) = document.get_element_by_id("menu-title") {
            el.set_text_content(Some(view.title));
        }
        if let Some(el) = document.get_element_by_id("menu-score") {
            el.set_text_content(Some(&view.score_text));
        }
        if let Some(btn) = document.get_element_by_id("play-btn") {
            let _ = if view.play_button_visible {
                btn.class_list().remove_1("hidden")
            } else {
                btn.class_list().add_1("hidden")
            };
        }
    }

    fn open_store() -> Box<dyn KeyValueStore> {
        match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("LocalStorage unavailable ({}), scores won't persist", e);
                Box::new(MemoryStore::default())
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Rusher starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element");
            return;
        };

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, open_store())));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return;
            }
        };
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height, (FIELD.width, FIELD.height)).await
        {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                return;
            }
        }

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        setup_keyboard(game.clone());
        setup_pointer(&canvas, game.clone());
        setup_touch_buttons(game.clone());
        setup_play_button(game.clone());
        setup_difficulty_button(game.clone());
        setup_auto_pause(game.clone());
        setup_spawner(game.clone());

        show_menu(&MenuView::start_screen(&game.borrow().world));

        log::info!("Rusher ready");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if key == "Escape" {
                    let running = {
                        let mut g = game.borrow_mut();
                        g.world.toggle_pause();
                        g.update_menu();
                        g.world.is_running()
                    };
                    if running {
                        start_loop(game.clone());
                    }
                    return;
                }
                game.borrow_mut().intent.apply_key(&key, true);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().intent.apply_key(&event.key(), false);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Map client coordinates to the playfield and fire toward them
    fn fire_at(game: &Rc<RefCell<Game>>, canvas: &HtmlCanvasElement, client_x: f32, client_y: f32) {
        let bounds = canvas.get_bounding_client_rect();
        let rect = ScreenRect {
            left: bounds.left() as f32,
            top: bounds.top() as f32,
            width: bounds.width() as f32,
            height: bounds.height() as f32,
        };
        let target = screen_to_playfield(
            Vec2::new(client_x, client_y),
            rect,
            Vec2::new(FIELD.width, FIELD.height),
        );
        fire(&mut game.borrow_mut().world, target, js_sys::Date::now());
    }

    fn setup_pointer(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse click
        {
            let game = game.clone();
            let target = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                fire_at(&game, &target, event.client_x() as f32, event.client_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let target = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    fire_at(&game, &target, touch.client_x() as f32, touch.client_y() as f32);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// On-screen direction buttons for touch devices
    fn setup_touch_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else { return };

        for (id, key) in [("up-btn", "w"), ("left-btn", "a"), ("right-btn", "d")] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            for (event_name, pressed) in [("touchstart", true), ("touchend", false)] {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                    event.prevent_default();
                    game.borrow_mut().intent.apply_key(key, pressed);
                });
                let _ = btn
                    .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_play_button(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else { return };

        if let Some(btn) = document.get_element_by_id("play-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().restart();
                log::info!("Game started");
                start_loop(game.clone());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Difficulty toggle on the menu; the choice is saved with the other settings
    fn setup_difficulty_button(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else { return };
        let Some(btn) = document.get_element_by_id("difficulty-btn") else {
            return;
        };
        btn.set_text_content(Some(game.borrow().settings.difficulty.as_str()));

        let label = btn.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let mut g = game.borrow_mut();
            g.toggle_difficulty();
            label.set_text_content(Some(g.settings.difficulty.as_str()));
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else { return };

        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut g = game.borrow_mut();
                if g.world.is_running() {
                    g.world.pause();
                    g.update_menu();
                    log::info!("Auto-paused (tab hidden)");
                }
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Obstacle spawner; keeps firing while paused but spawns nothing then
    fn setup_spawner(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        let period = game.borrow().world.tuning.spawn_interval_ms as i32;
        let closure = Closure::<dyn FnMut()>::new(move || {
            spawn_tick(&mut game.borrow_mut().world);
        });
        if let Err(e) = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            period,
        ) {
            log::error!("Failed to start spawner: {:?}", e);
        }
        closure.forget();
    }

    /// Schedule the refresh loop unless it is already scheduled
    fn start_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.loop_active {
                return;
            }
            g.loop_active = true;
        }
        request_animation_frame(game);
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        let running = {
            let mut g = game.borrow_mut();
            g.frame();
            g.loop_active = g.world.is_running();
            g.loop_active
        };

        // Pausing stops the loop here; resume/restart schedule it again
        if running {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Headless run: an autopilot fires at the nearest obstacle until the game
/// ends or the frame limit is reached.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use rusher::persistence::MemoryStore;
    use rusher::platform::Intent;
    use rusher::renderer::ShapeBatch;
    use rusher::sim::{GameEvent, Playfield, SpawnTimer, World, fire, spawn_tick, tick};
    use rusher::{Difficulty, HighScore, Settings, Tuning};

    env_logger::init();

    // rusher [seed] [frames] [normal|hard] [tuning.json]
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42u64);
    let max_frames = args.next().and_then(|s| s.parse().ok()).unwrap_or(60 * 60u64);
    let settings = Settings {
        difficulty: args
            .next()
            .and_then(|s| Difficulty::from_str(&s))
            .unwrap_or_default(),
        ..Settings::default()
    };
    let tuning = match args.next() {
        Some(path) => load_tuning(&path),
        None => Tuning::default(),
    };

    log::info!(
        "Rusher (native) starting with seed {} on {}",
        seed,
        settings.difficulty.as_str()
    );
    log::info!("Rendering requires the web build - run with `trunk serve`");

    let field = Playfield::new(800.0, 600.0);
    let mut store = MemoryStore::default();
    let mut high = HighScore::load(&store);
    let frame_ms = 1000.0 / 60.0;

    let mut spawner = SpawnTimer::new(tuning.spawn_interval_ms as f64);
    let mut world = World::new(seed, field, tuning, &settings, high.best);
    let mut batch = ShapeBatch::new(field.width, field.height);
    let intent = Intent::default();
    world.reset();

    let mut destroyed = 0u32;
    for frame in 0..max_frames {
        let now_ms = frame as f64 * frame_ms;
        for _ in 0..spawner.advance(frame_ms) {
            spawn_tick(&mut world);
        }

        let player = world.player.body.pos;
        let nearest = world
            .obstacles
            .iter()
            .map(|o| o.body.center())
            .min_by(|a, b| a.distance_squared(player).total_cmp(&b.distance_squared(player)));
        if let Some(target) = nearest {
            // Lead the shot a little below the block
            let lead = Vec2::new(0.0, world.tuning.enemy_max_speed);
            fire(&mut world, target + lead, now_ms);
        }

        batch.clear();
        tick(&mut world, &intent, &mut batch);

        for event in world.drain_events() {
            match event {
                GameEvent::ObstacleDestroyed { .. } => destroyed += 1,
                GameEvent::NewHighScore(score) => {
                    if high.record(score) {
                        if let Err(e) = high.save(&mut store) {
                            log::warn!("Failed to save high score: {}", e);
                        }
                    }
                }
                _ => {}
            }
        }

        if world.is_game_over() {
            break;
        }
    }

    println!(
        "{} after {} frames, {} obstacles destroyed, health {:.1}",
        world.score_text(),
        world.frame,
        destroyed,
        world.player.health
    );
}

/// Read a tuning file, falling back to defaults when it can't be used
#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> rusher::Tuning {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| rusher::Tuning::from_json(&json).map_err(|e| e.to_string()));
    match parsed {
        Ok(tuning) => {
            log::info!("Loaded tuning from {}", path);
            tuning
        }
        Err(e) => {
            log::warn!("Ignoring tuning file {}: {}", path, e);
            rusher::Tuning::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
