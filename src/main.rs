//! Bouncing Balls entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PageTransitionEvent};

    use bouncing_balls::playback::HostFrameId;
    use bouncing_balls::renderer::RenderState;
    use bouncing_balls::sim::{Bounds, SimState};
    use bouncing_balls::{Animator, FrameOutcome, FrameToken, PlaybackState, Settings, platform};

    /// User-facing controls
    #[derive(Debug, Clone, Copy)]
    enum Control {
        Toggle,
        Reset,
        Add,
    }

    /// App instance holding all state
    struct App {
        animator: Animator,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        settings: Settings,
    }

    impl App {
        /// Container size in CSS pixels, `None` before layout
        fn measure(&self) -> Option<Bounds> {
            Bounds::new(
                self.canvas.client_width() as f32,
                self.canvas.client_height() as f32,
            )
        }

        /// Match the canvas backing store to its CSS box
        fn resize_surface(&mut self) {
            let dpr = web_sys::window()
                .map(|w| w.device_pixel_ratio())
                .unwrap_or(1.0);
            let width = (self.canvas.client_width() as f64 * dpr) as u32;
            let height = (self.canvas.client_height() as f64 * dpr) as u32;
            if width == 0 || height == 0 {
                return;
            }
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height);
            }
        }

        fn render(&mut self) {
            let Some(bounds) = self.animator.sim().bounds() else {
                return;
            };
            let balls = self.animator.sim().balls();
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(balls, bounds) {
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

            if let Some(el) = document.get_element_by_id("ball-count") {
                if self.settings.show_ball_count {
                    let _ = el.set_attribute("class", "");
                    el.set_text_content(Some(&format!(
                        "Balls: {}",
                        self.animator.sim().balls().len()
                    )));
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            if let Some(el) = document.get_element_by_id("toggle-btn") {
                let label = match self.animator.state() {
                    PlaybackState::Running => "Pause",
                    PlaybackState::Paused => "Play",
                };
                el.set_text_content(Some(label));
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Bouncing Balls starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Defaults, then LocalStorage, then ?balls=..&seed=..&resize=..
        let mut settings = Settings::load();
        if let Ok(search) = window.location().search() {
            settings.apply_query(&search);
        }
        let settings = settings.sanitized();

        let seed = settings.seed.unwrap_or_else(platform::time_seed);
        log::info!(
            "Seed: {}, initial balls: {}, resize: {}",
            seed,
            settings.initial_ball_count,
            settings.resize_policy.as_str()
        );

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize WebGPU (WebGL2 fallback)
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let app = Rc::new(RefCell::new(App {
            animator: Animator::new(SimState::from_settings(&settings, seed)),
            render_state: Some(render_state),
            canvas,
            settings,
        }));

        {
            let mut a = app.borrow_mut();
            let bounds = a.measure();
            a.animator.initialize(bounds);
            a.render();
            a.update_hud();
        }

        setup_controls(&app);
        setup_keyboard(&app);
        setup_resize(&app);
        setup_teardown(&app);

        schedule_frame(&app);

        log::info!("Bouncing Balls running!");
        Ok(())
    }

    /// Ask the browser for the next frame if the animator wants one
    fn schedule_frame(app: &Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(token) = app.borrow_mut().animator.request_frame() else {
            return;
        };

        let app_for_frame = app.clone();
        let callback = Closure::once_into_js(move |_time: f64| {
            on_animation_frame(app_for_frame, token);
        });

        match window.request_animation_frame(callback.unchecked_ref()) {
            Ok(id) => app.borrow_mut().animator.frame_scheduled(token, id),
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                // Next control action retries
                app.borrow_mut().animator.cancel_pending();
            }
        }
    }

    fn cancel_frame(id: HostFrameId) {
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(id);
        }
    }

    fn on_animation_frame(app: Rc<RefCell<App>>, token: FrameToken) {
        let outcome = {
            let mut a = app.borrow_mut();
            let outcome = a.animator.on_frame(token);
            a.render();
            outcome
        };

        if outcome == FrameOutcome::Continue {
            schedule_frame(&app);
        }
    }

    fn apply_control(app: &Rc<RefCell<App>>, control: Control) {
        let cancel = {
            let mut a = app.borrow_mut();
            let cancel = match control {
                Control::Toggle => a.animator.toggle(),
                Control::Reset => {
                    a.animator.reset();
                    None
                }
                Control::Add => {
                    a.animator.add_ball();
                    None
                }
            };
            a.render();
            a.update_hud();
            cancel
        };

        if let Some(id) = cancel {
            cancel_frame(id);
        }
        schedule_frame(app);
    }

    fn setup_controls(app: &Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let buttons = [
            ("toggle-btn", Control::Toggle),
            ("reset-btn", Control::Reset),
            ("add-btn", Control::Add),
        ];

        for (id, control) in buttons {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing #{} button", id);
                continue;
            };
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                apply_control(&app, control);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(app: &Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if event.repeat() {
                return;
            }
            let control = match event.key().as_str() {
                " " => Control::Toggle,
                "r" | "R" => Control::Reset,
                "a" | "A" => Control::Add,
                _ => return,
            };
            // Keep Space from also clicking a focused button
            event.prevent_default();
            apply_control(&app, control);
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(app: &Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            {
                let mut a = app.borrow_mut();
                a.resize_surface();
                let bounds = a.measure();
                a.animator.resize(bounds);
                a.render();
                a.update_hud();
            }
            // First successful measurement may have just spawned the balls
            schedule_frame(&app);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Stop frames while the page is hidden or torn down, resume when it is
    /// restored from the back/forward cache. Running/Paused is left alone.
    fn setup_teardown(app: &Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
                let pending = app.borrow_mut().animator.cancel_pending();
                if let Some(id) = pending {
                    cancel_frame(id);
                }
                log::info!("Page hidden (cached: {})", event.persisted());
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
                if !event.persisted() {
                    return;
                }
                {
                    let mut a = app.borrow_mut();
                    a.render();
                    a.update_hud();
                }
                log::info!("Page restored from cache");
                schedule_frame(&app);
            });
            let _ = window
                .add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless container size and run length for the native build
#[cfg(not(target_arch = "wasm32"))]
const HEADLESS_SIZE: (f32, f32) = (800.0, 600.0);
#[cfg(not(target_arch = "wasm32"))]
const HEADLESS_FRAMES: u32 = 600;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::Duration;

    use bouncing_balls::platform::{self, FrameTicker};
    use bouncing_balls::sim::{Bounds, SimState};
    use bouncing_balls::{Animator, FrameOutcome, Settings};

    env_logger::init();
    log::info!("Bouncing Balls (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the web version");

    let settings = Settings::load();
    let seed = settings.seed.unwrap_or_else(platform::time_seed);
    log::info!("Seed: {}", seed);

    let mut animator = Animator::new(SimState::from_settings(&settings, seed));
    animator.initialize(Bounds::new(HEADLESS_SIZE.0, HEADLESS_SIZE.1));

    let ticker = FrameTicker::start(Duration::from_micros(16_667));
    let mut pending = animator.request_frame();
    let mut frames = 0u32;

    while frames < HEADLESS_FRAMES {
        let Some(token) = pending.take() else {
            break;
        };
        let Some(time_ms) = ticker.next_frame() else {
            break;
        };
        frames += 1;

        if animator.on_frame(token) == FrameOutcome::Continue {
            pending = animator.request_frame();
        }

        if frames % 60 == 0 {
            let balls = animator.sim().balls();
            let mean_y = balls.iter().map(|b| b.pos.y).sum::<f32>() / balls.len().max(1) as f32;
            log::info!(
                "t={:.0}ms tick {} - {} balls, mean height {:.1}",
                time_ms,
                animator.sim().time_ticks,
                balls.len(),
                HEADLESS_SIZE.1 - mean_y
            );
        }
    }

    ticker.cancel();
    animator.cancel_pending();

    println!(
        "Ran {} ticks with {} balls",
        animator.sim().time_ticks,
        animator.sim().balls().len()
    );
    for (i, ball) in animator.sim().balls().iter().enumerate() {
        println!(
            "  ball {}: pos ({:.1}, {:.1}) vel ({:.2}, {:.2}) r {:.1} {}",
            i,
            ball.pos.x,
            ball.pos.y,
            ball.vel.x,
            ball.vel.y,
            ball.radius,
            ball.color.hex()
        );
    }
}
