//! Droppy entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use droppy::audio::{AudioManager, SoundEffect};
    use droppy::consts::*;
    use droppy::renderer::{RenderState, shapes};
    use droppy::sim::{FrameInput, GameEvent, GameState, autopilot_input, tick};
    use droppy::{OrthoCamera, Settings, StartupError};

    /// Keys and pointer as last reported by the browser
    #[derive(Debug, Default)]
    struct InputState {
        left: bool,
        right: bool,
        /// Pointer position in CSS pixels while a button/finger is down
        pointer: Option<(f32, f32)>,
        /// Idle/demo mode - autopilot plays
        idle_mode: bool,
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        audio: AudioManager,
        settings: Settings,
        camera: OrthoCamera,
        input: InputState,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, now: f64, settings: Settings) -> Self {
            Self {
                state: GameState::new(seed, now),
                render_state: None,
                audio: AudioManager::new(&settings),
                settings,
                camera: OrthoCamera::default(),
                input: InputState::default(),
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Sample held keys and pointer into a frame input
        fn frame_input(&self) -> FrameInput {
            if self.input.idle_mode {
                return autopilot_input(&self.state);
            }
            FrameInput {
                pointer_x: self
                    .input
                    .pointer
                    .map(|(x, y)| self.camera.unproject(x, y).x),
                left: self.input.left,
                right: self.input.right,
            }
        }

        /// Run one frame of simulation
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(MAX_FRAME_DELTA);
            let input = self.frame_input();
            tick(&mut self.state, &input, dt, time / 1000.0);

            for event in self.state.drain_events() {
                match event {
                    GameEvent::RaindropCaught { .. } => self.audio.play(SoundEffect::Catch),
                    GameEvent::RaindropMissed { .. } => self.audio.play(SoundEffect::Splash),
                    GameEvent::RaindropSpawned { .. } => {}
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = shapes::scene(&self.state);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices, &self.camera) {
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

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("hud-caught") {
                if self.settings.show_catch_count {
                    let _ = el.set_attribute("class", "hud-item");
                    if let Some(val) = document
                        .query_selector("#hud-caught .hud-value")
                        .ok()
                        .flatten()
                    {
                        val.set_text_content(Some(&format!(
                            "{} / {}",
                            self.state.caught,
                            self.state.caught + self.state.missed
                        )));
                    }
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    if let Some(val) = document.query_selector("#hud-fps .hud-value").ok().flatten()
                    {
                        val.set_text_content(Some(&self.fps.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            if let Some(el) = document.get_element_by_id("pause-overlay") {
                let class = if self.state.is_running() { "hidden" } else { "" };
                let _ = el.set_attribute("class", class);
            }
        }

        /// Host lifecycle: hide/blur
        fn pause(&mut self, reason: &str) {
            if !self.state.is_running() {
                return;
            }
            self.state.pause();
            self.input = InputState {
                idle_mode: self.input.idle_mode,
                ..Default::default()
            };
            self.audio.suspend();
            log::info!("Paused ({})", reason);
        }

        /// Host lifecycle: show/focus
        fn resume(&mut self, reason: &str) {
            if self.state.is_running() {
                return;
            }
            self.state.resume();
            // Don't feed the time spent paused in as one giant frame
            self.last_time = 0.0;
            self.audio.resume();
            log::info!("Resumed ({})", reason);
        }
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    pub async fn run() -> Result<(), StartupError> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger already set: {e}").into());
        }

        log::info!("Droppy starting...");

        let window = web_sys::window().ok_or(StartupError::NoWindow)?;
        let document = window.document().ok_or(StartupError::NoDocument)?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok())
            .ok_or_else(|| StartupError::NoCanvas("canvas".into()))?;

        // Backing store in device pixels, camera in CSS pixels
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, now_ms() / 1000.0, settings)));
        game.borrow_mut()
            .camera
            .resize(client_w as f32, client_h as f32);

        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_lifecycle(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Droppy running!");
        Ok(())
    }

    /// Mouse/touch position relative to the canvas, in CSS pixels
    fn touch_position(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<(f32, f32)> {
        let touch = event.touches().get(0)?;
        let rect = canvas.get_bounding_client_rect();
        Some((
            touch.client_x() as f32 - rect.left() as f32,
            touch.client_y() as f32 - rect.top() as f32,
        ))
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse down - pointer becomes active, audio may start (user gesture)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.input.pointer = Some((event.offset_x() as f32, event.offset_y() as f32));
                g.audio.resume();
                g.audio.start_rain_loop();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move - only tracked while a button is held
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                if g.input.pointer.is_some() {
                    g.input.pointer = Some((event.offset_x() as f32, event.offset_y() as f32));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up / leave - pointer released
        for name in ["mouseup", "mouseleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.pointer = None;
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start / move
        for name in ["touchstart", "touchmove"] {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if let Some(pos) = touch_position(&canvas_clone, &event) {
                    g.input.pointer = Some(pos);
                }
                if event.type_() == "touchstart" {
                    g.audio.resume();
                    g.audio.start_rain_loop();
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end / cancel
        for name in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if event.touches().length() == 0 {
                    game.borrow_mut().input.pointer = None;
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "ArrowLeft" | "KeyA" => g.input.left = true,
                    "ArrowRight" | "KeyD" => g.input.right = true,
                    "KeyI" if !event.repeat() => {
                        g.input.idle_mode = !g.input.idle_mode;
                        log::info!("Idle mode: {}", g.input.idle_mode);
                    }
                    "KeyM" if !event.repeat() => {
                        g.settings.show_fps = !g.settings.show_fps;
                        g.settings.save();
                        let settings = g.settings.clone();
                        g.audio.apply_settings(&settings);
                    }
                    _ => return,
                }
                g.audio.start_rain_loop();
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "ArrowLeft" | "KeyA" => g.input.left = false,
                    "ArrowRight" | "KeyD" => g.input.right = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize - keep backing store and camera in sync with the canvas
        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let dpr = window.device_pixel_ratio();
                let client_w = canvas_clone.client_width();
                let client_h = canvas_clone.client_height();
                let width = (client_w as f64 * dpr) as u32;
                let height = (client_h as f64 * dpr) as u32;
                canvas_clone.set_width(width);
                canvas_clone.set_height(height);

                let mut g = game.borrow_mut();
                g.camera.resize(client_w as f32, client_h as f32);
                if let Some(ref mut render_state) = g.render_state {
                    render_state.resize(width, height);
                }
            });
            let _ =
                window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
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

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                1.0 / 60.0
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    /// Pause/resume on visibility and focus changes
    fn setup_lifecycle(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    g.pause("tab hidden");
                    g.audio.hide();
                } else {
                    g.resume("tab visible");
                    g.audio.show();
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
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
                if g.settings.pause_on_blur {
                    g.pause("window blur");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window focus
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.audio.set_muted(false);
                g.resume("window focus");
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Droppy failed to start: {}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Simulated seconds for the native headless demo
#[cfg(not(target_arch = "wasm32"))]
const DEMO_SECS: u32 = 60;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use droppy::Settings;
    use droppy::sim::{GameEvent, GameState, autopilot_input, tick};

    env_logger::init();
    log::info!("Droppy (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    let settings = Settings::load();
    log::debug!("Settings: {:?}", settings);

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let delta = 1.0 / 60.0;
    let mut now = 0.0f64;
    let mut state = GameState::new(seed, now);
    log::info!("Demo seed: {}", seed);

    for _ in 0..DEMO_SECS * 60 {
        now += delta as f64;
        let input = autopilot_input(&state);
        tick(&mut state, &input, delta, now);

        for event in state.drain_events() {
            match event {
                GameEvent::RaindropCaught { id, x, .. } => {
                    log::info!("{:6.2}s caught raindrop {} at x={}", now, id, x)
                }
                GameEvent::RaindropMissed { id, x } => {
                    log::info!("{:6.2}s missed raindrop {} at x={}", now, id, x)
                }
                GameEvent::RaindropSpawned { .. } => {}
            }
        }
    }

    println!(
        "Demo (seed {}) finished after {}s: caught {}, missed {}, falling {}",
        state.seed,
        DEMO_SECS,
        state.caught,
        state.missed,
        state.raindrops.len()
    );
}
