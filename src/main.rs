//! Curve Defense entry point
//!
//! On the web this wires the canvas, DOM and input to the simulation and runs
//! the game loop. Natively it is a headless simulation runner.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use curve_defense::Tuning;
    use curve_defense::consts::*;
    use curve_defense::renderer::{RenderState, SceneInput, build_scene};
    use curve_defense::sim::{GameEvent, GameState, TowerKind, apply_command, tick};
    use curve_defense::ui::{self, ShopLayout};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        layout: ShopLayout,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        /// Pointer in canvas units
        pointer: Option<Vec2>,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning) -> Self {
            let layout = ShopLayout::new(&tuning);
            Self {
                state: GameState::new(seed, tuning),
                layout,
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                pointer: None,
            }
        }

        /// Map a client-space mouse position into canvas units
        fn to_canvas(&self, canvas: &HtmlCanvasElement, x: i32, y: i32) -> Vec2 {
            let cw = canvas.client_width().max(1) as f32;
            let ch = canvas.client_height().max(1) as f32;
            Vec2::new(
                x as f32 * self.state.tuning.canvas_width / cw,
                y as f32 * self.state.tuning.canvas_height / ch,
            )
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            self.log_events();
        }

        fn log_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::BossSpawned { id, hp } => {
                        log::info!("Boss {} entered with {} HP", id, hp)
                    }
                    GameEvent::Breach { id, damage } => {
                        log::info!("Enemy {} breached for {} damage", id, damage)
                    }
                    GameEvent::GameOver { .. } => {}
                    other => log::trace!("{:?}", other),
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let input = SceneInput {
                pointer: self.pointer,
            };
            let vertices = build_scene(
                &self.state.snapshot(),
                &self.state.tuning,
                &input,
                self.state.time_ticks,
            );
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        fn press(&mut self, p: Vec2) {
            let Some(command) = ui::pointer_command(&self.state, &self.layout, p) else {
                return;
            };
            if let Err(e) = apply_command(&mut self.state, command) {
                log::debug!("{:?} rejected: {}", command, e);
            }
        }

        fn key(&mut self, key: &str) {
            let seed = js_sys::Date::now() as u64;
            if let Some(command) = ui::key_command(&self.state, key, seed) {
                if let Err(e) = apply_command(&mut self.state, command) {
                    log::debug!("{:?} rejected: {}", command, e);
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let hud = self.state.hud();
            set_text(document, "hud-hp", &hud.player_hp.to_string());
            set_text(document, "hud-run-kills", &hud.run_kills.to_string());
            set_text(document, "hud-total-kills", &hud.total_kills.to_string());

            let hint = match hud.placing {
                Some(TowerKind::Shooter) => "Placing shooter tower (Esc to cancel)",
                Some(TowerKind::Slow) => "Placing slow tower (Esc to cancel)",
                None => "1: shooter, 2: slow, click a slow tower to upgrade",
            };
            set_text(document, "shop-hint", hint);

            let hovered = self
                .pointer
                .and_then(|p| ui::hovered_enemies(&self.state.enemies, p).next());
            let hover_text = hovered
                .map(|e| format!("HP: {}", e.hp.max(0)))
                .unwrap_or_default();
            set_text(document, "hover-hp", &hover_text);

            // Show/hide game over
            if let Some(el) = document.get_element_by_id("game-over") {
                if self.state.is_game_over() {
                    let _ = el.set_attribute("class", "");
                    set_text(document, "final-kills", &hud.total_kills.to_string());
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        fn restart(&mut self, seed: u64) {
            self.state.restart(seed);
            self.accumulator = 0.0;
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Curve Defense starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Back the canvas with device pixels
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let tuning = Tuning::load();
        let canvas_size = (tuning.canvas_width, tuning.canvas_height);
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, tuning)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, canvas_size)
            .await
            .expect("Failed to create device");
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_restart_button(&document, game.clone());

        request_animation_frame(game);

        log::info!("Curve Defense running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let p = g.to_canvas(&canvas_clone, event.offset_x(), event.offset_y());
                g.pointer = Some(p);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse leave
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().pointer = None;
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse down: shop, cancel, upgrade or place
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let p = g.to_canvas(&canvas_clone, event.offset_x(), event.offset_y());
                g.pointer = Some(p);
                g.press(p);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().key(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().restart(seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
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

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
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

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::{Parser, ValueEnum};
    use glam::Vec2;

    use curve_defense::Tuning;
    use curve_defense::sim::{Command, GameState, TowerKind, apply_command, tick};

    /// Run the simulation without a window and report the outcome
    #[derive(Parser, Debug)]
    #[command(name = "curve-defense", version, about)]
    pub struct Args {
        /// RNG seed for the run
        #[arg(long, default_value_t = 1)]
        pub seed: u64,
        /// Simulation ticks to run (60 per second)
        #[arg(long, default_value_t = 3600)]
        pub ticks: u64,
        /// JSON tuning override
        #[arg(long)]
        pub tuning: Option<PathBuf>,
        /// Towers placed before the first tick
        #[arg(long, value_enum, default_value_t = Layout::Mixed)]
        pub layout: Layout,
        /// Print the final snapshot as JSON
        #[arg(long)]
        pub snapshot: bool,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    pub enum Layout {
        Shooter,
        Slow,
        Mixed,
    }

    impl Layout {
        /// Fixed tower spots clear of the default path
        pub fn towers(self) -> &'static [(TowerKind, Vec2)] {
            const SHOOTERS: &[(TowerKind, Vec2)] = &[
                (TowerKind::Shooter, Vec2::new(400.0, 310.0)),
                (TowerKind::Shooter, Vec2::new(600.0, 200.0)),
                (TowerKind::Shooter, Vec2::new(150.0, 260.0)),
            ];
            const SLOWS: &[(TowerKind, Vec2)] = &[
                (TowerKind::Slow, Vec2::new(250.0, 150.0)),
                (TowerKind::Slow, Vec2::new(500.0, 330.0)),
            ];
            const MIXED: &[(TowerKind, Vec2)] = &[
                (TowerKind::Shooter, Vec2::new(400.0, 310.0)),
                (TowerKind::Slow, Vec2::new(250.0, 150.0)),
                (TowerKind::Shooter, Vec2::new(600.0, 200.0)),
            ];
            match self {
                Layout::Shooter => SHOOTERS,
                Layout::Slow => SLOWS,
                Layout::Mixed => MIXED,
            }
        }
    }

    pub fn run(args: Args) {
        let tuning = match &args.tuning {
            Some(path) => Tuning::load_file(path),
            None => Tuning::default(),
        };
        let mut state = GameState::new(args.seed, tuning);

        for &(kind, pos) in args.layout.towers() {
            let placed = apply_command(&mut state, Command::SelectTower(kind))
                .and_then(|_| apply_command(&mut state, Command::PlaceTower(pos)));
            if let Err(e) = placed {
                log::warn!("Skipping {:?} tower at ({}, {}): {}", kind, pos.x, pos.y, e);
                let _ = apply_command(&mut state, Command::CancelPlacement);
            }
        }

        let mut ran = 0;
        while ran < args.ticks && !state.is_game_over() {
            tick(&mut state);
            ran += 1;
        }

        let hud = state.hud();
        log::info!(
            "Ran {} ticks: {} kills, {} HP left, {:?}",
            ran,
            hud.total_kills,
            hud.player_hp,
            hud.phase
        );

        if args.snapshot {
            match serde_json::to_string_pretty(&state.snapshot()) {
                Ok(json) => println!("{}", json),
                Err(e) => log::error!("Failed to serialize snapshot: {}", e),
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    headless::run(headless::Args::parse());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
