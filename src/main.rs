//! Sea of Disorder entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlInputElement, MouseEvent, TouchEvent};

    use sea_of_disorder::Settings;
    use sea_of_disorder::consts::RULE_DURATION;
    use sea_of_disorder::narrative;
    use sea_of_disorder::sim::{Fish, FishId, FishKind, FishShape, GamePhase, Viewport, World};

    /// Fish body size before scaling (CSS px)
    const FISH_W: f64 = 60.0;
    const FISH_H: f64 = 40.0;

    /// Game instance holding all state
    struct Game {
        world: World,
        settings: Settings,
        ctx: CanvasRenderingContext2d,
        canvas: HtmlCanvasElement,
        dpr: f64,
        /// Latest animation frame timestamp (ms), the clock for every timer
        last_time: f64,
        /// Cleared when the page is torn down; stops the frame loop
        running: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        last_phase: GamePhase,
    }

    impl Game {
        fn viewport(&self) -> Viewport {
            Viewport::new(
                self.canvas.client_width() as f32,
                self.canvas.client_height() as f32,
            )
        }

        fn fit_canvas(&mut self) {
            let w = self.canvas.client_width();
            let h = self.canvas.client_height();
            self.canvas.set_width((w as f64 * self.dpr) as u32);
            self.canvas.set_height((h as f64 * self.dpr) as u32);
            let viewport = self.viewport();
            self.world.resize(viewport);
        }

        /// Topmost unarchived fish under the pointer
        fn fish_at(&self, x: f32, y: f32) -> Option<FishId> {
            self.world
                .fishes()
                .iter()
                .rev()
                .filter(|f| !f.collected)
                .find(|f| {
                    let reach = (FISH_W as f32 / 2.0) * f.scale;
                    f.pos.distance(glam::Vec2::new(x, y)) <= reach
                })
                .map(|f| f.id)
        }

        fn update(&mut self, time: f64) {
            self.last_time = time;
            self.world.update(time);

            // Track frame times for FPS
            let oldest_time = self.frame_times[self.frame_index];
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            if oldest_time > 0.0 && time > oldest_time {
                self.fps = (60000.0 / (time - oldest_time)).round() as u32;
            }

            let phase = self.world.state().phase;
            if phase != self.last_phase {
                show_screens(phase, &self.world, &self.settings);
                self.last_phase = phase;
            }
        }

        /// Draw the sea
        fn render(&self, time: f64) {
            let ctx = &self.ctx;
            let _ = ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0);
            let viewport = self.world.viewport();
            let (w, h) = (viewport.width as f64, viewport.height as f64);
            ctx.clear_rect(0.0, 0.0, w, h);

            let state = self.world.state();
            if state.phase == GamePhase::Playing {
                ctx.set_fill_style_str("rgba(255,255,255,0.05)");
                ctx.fill_rect(0.0, 0.0, w, viewport.archive_limit() as f64);
                ctx.set_fill_style_str("rgba(255,255,255,0.2)");
                ctx.set_font("bold 32px serif");
                ctx.set_text_align("center");
                let _ = ctx.fill_text(
                    narrative::archive_zone_label(self.settings.locale),
                    w / 2.0,
                    viewport.archive_limit() as f64 / 2.0,
                );
            }

            for fish in self.world.fishes() {
                self.draw_fish(fish, time);
            }
        }

        fn draw_fish(&self, fish: &Fish, time: f64) {
            let ctx = &self.ctx;
            ctx.save();
            let _ = ctx.translate(fish.pos.x as f64, fish.pos.y as f64);

            if fish.collected && self.settings.show_names {
                if let Some(name) = &fish.name {
                    ctx.set_font("10px monospace");
                    ctx.set_text_align("center");
                    ctx.set_fill_style_str("#67e8f9");
                    let _ = ctx.fill_text(name, 0.0, -FISH_H * fish.scale as f64 / 2.0 - 8.0);
                }
            }

            let _ = ctx.rotate((fish.rotation as f64).to_radians());
            let _ = ctx.scale(fish.scale as f64, fish.scale as f64);

            let alpha = if fish.kind == FishKind::Glitch && self.settings.glitch_flicker() {
                0.55 + 0.45 * (time / 120.0).sin().abs()
            } else {
                1.0
            };
            ctx.set_global_alpha(alpha);
            ctx.set_fill_style_str(fish.color.hex());
            ctx.begin_path();
            match fish.shape {
                FishShape::Round => {
                    let _ = ctx.ellipse(0.0, 0.0, FISH_W / 2.0, FISH_H / 3.0, 0.0, 0.0, TAU);
                    // Tail
                    ctx.move_to(-FISH_W / 2.0, 0.0);
                    ctx.line_to(-FISH_W / 2.0 - 12.0, -10.0);
                    ctx.line_to(-FISH_W / 2.0 - 12.0, 10.0);
                }
                FishShape::Sharp => {
                    ctx.move_to(FISH_W / 2.0, 0.0);
                    ctx.line_to(0.0, -FISH_H / 2.0);
                    ctx.line_to(-FISH_W / 2.0, 0.0);
                    ctx.line_to(0.0, FISH_H / 2.0);
                }
            }
            ctx.close_path();
            ctx.fill();

            if fish.is_mirror() {
                ctx.set_stroke_style_str("#ffffff");
                ctx.set_line_width(2.0);
                ctx.stroke();
                ctx.set_fill_style_str("#1e293b");
                ctx.set_font("bold 10px sans-serif");
                ctx.set_text_align("center");
                let _ = ctx.fill_text("???", 0.0, 4.0);
            }
            ctx.restore();
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let state = self.world.state();
            let locale = self.settings.locale;

            set_text(&document, "hud-rule", narrative::rule_text(state.rule, locale));
            set_text(&document, "hud-score", &state.score.to_string());
            set_text(&document, "hud-chaos", &format!("{}%", state.chaos));
            set_text(
                &document,
                "hud-message",
                state.message.map(|m| narrative::message_text(m, locale)).unwrap_or(""),
            );

            if let Some(el) = document.get_element_by_id("hud-chaos") {
                let _ = el.set_attribute("class", narrative::chaos_css_class(state.chaos_band()));
            }
            if let Some(el) = document.get_element_by_id("hud-timer") {
                let pct = (state.rule_timer / RULE_DURATION * 100.0).clamp(0.0, 100.0);
                let _ = el.set_attribute("style", &format!("width: {pct:.1}%"));
            }
            if let Some(el) = document.get_element_by_id("hud-ready") {
                let class = if state.mirror_unlocked() { "ready" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
            if let Some(el) = document.get_element_by_id("overload") {
                let class = if state.overloaded() && self.settings.overload_overlay() {
                    "overlay on"
                } else {
                    "overlay"
                };
                let _ = el.set_attribute("class", class);
            }
            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "");
                    el.set_text_content(Some(&format!("{} fps", self.fps)));
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    fn set_text(document: &web_sys::Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_visible(document: &web_sys::Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "screen" } else { "screen hidden" });
        }
    }

    /// Show the overlay screen for `phase` and fill in its text
    fn show_screens(phase: GamePhase, world: &World, settings: &Settings) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let locale = settings.locale;

        set_visible(&document, "intro", phase == GamePhase::Intro);
        set_visible(&document, "tutorial", phase == GamePhase::Tutorial);
        set_visible(&document, "hud", phase == GamePhase::Playing);
        set_visible(&document, "naming", phase == GamePhase::NamingEnding);
        set_visible(&document, "reflection", phase == GamePhase::FinalReflection);

        match phase {
            GamePhase::Intro => {
                set_text(&document, "intro-title", narrative::title(locale));
                set_text(&document, "intro-text", narrative::intro_text(locale));
            }
            GamePhase::Tutorial => {
                set_text(&document, "tutorial-text", narrative::tutorial_text(locale));
            }
            GamePhase::NamingEnding => {
                let (line, prompt) = narrative::naming_prompt(locale);
                set_text(&document, "naming-line", line);
                set_text(&document, "naming-prompt", prompt);
                if let Some(input) = document
                    .get_element_by_id("name-input")
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                {
                    input.set_value("");
                    let _ = input.focus();
                }
            }
            GamePhase::FinalReflection => {
                if let Some(epilogue) = world.epilogue() {
                    let text = narrative::epilogue_lines(&epilogue, locale).join("\n");
                    set_text(&document, "reflection-text", &text);
                    set_text(
                        &document,
                        "restart-btn",
                        narrative::restart_label(&epilogue, locale),
                    );
                }
            }
            GamePhase::Playing | GamePhase::OverwhelmedEnding => {}
        }
        log::info!("Showing {:?} screen", phase);
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Sea of Disorder starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("context query failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let viewport = Viewport::new(canvas.client_width() as f32, canvas.client_height() as f32);

        let mut game = Game {
            world: World::new(seed, viewport),
            settings,
            ctx,
            canvas: canvas.clone(),
            dpr: window.device_pixel_ratio(),
            last_time: 0.0,
            running: true,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
            last_phase: GamePhase::Intro,
        };
        game.fit_canvas();
        show_screens(GamePhase::Intro, &game.world, &game.settings);
        let game = Rc::new(RefCell::new(game));

        log::info!("Session initialized with seed: {}", seed);

        setup_pointer_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_lifecycle(game.clone());

        request_animation_frame(game);
    }

    /// First touch in canvas coordinates
    fn touch_point(event: &TouchEvent, canvas: &HtmlCanvasElement) -> Option<(f32, f32)> {
        let touch = event.touches().get(0)?;
        let rect = canvas.get_bounding_client_rect();
        Some((
            (touch.client_x() as f64 - rect.left()) as f32,
            (touch.client_y() as f64 - rect.top()) as f32,
        ))
    }

    fn setup_pointer_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse down - grab a fish
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                if let Some(id) = g.fish_at(event.offset_x() as f32, event.offset_y() as f32) {
                    g.world.press(id);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move - drag
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.world.drag_to(event.offset_x() as f32, event.offset_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up - drop (window-wide so releases outside the canvas still count)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                let now = g.last_time;
                g.world.release(now);
            });
            if let Some(window) = web_sys::window() {
                let _ = window
                    .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }

        // Touch start - grab
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some((x, y)) = touch_point(&event, &canvas_clone) {
                    let mut g = game.borrow_mut();
                    if let Some(id) = g.fish_at(x, y) {
                        g.world.press(id);
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move - drag
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some((x, y)) = touch_point(&event, &canvas_clone) {
                    game.borrow_mut().world.drag_to(x, y);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end - drop
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                let mut g = game.borrow_mut();
                let now = g.last_time;
                g.world.release(now);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(id: &str, handler: impl FnMut(web_sys::Event) + 'static) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(handler);
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click("start-btn", move |_| game.borrow_mut().world.begin_tutorial());
        }
        {
            let game = game.clone();
            on_click("dive-btn", move |_| {
                let mut g = game.borrow_mut();
                let now = g.last_time;
                g.world.start_playing(now);
            });
        }
        {
            let game = game.clone();
            on_click("refuse-btn", move |_| {
                let mut g = game.borrow_mut();
                let now = g.last_time;
                g.world.decline_naming(now);
            });
        }
        {
            let game = game.clone();
            on_click("restart-btn", move |_| {
                game.borrow_mut().world.restart();
                log::info!("Session restarted");
            });
        }

        // Name form
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(form) = document.get_element_by_id("name-form") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
                let document = web_sys::window().and_then(|w| w.document());
                let name = document
                    .and_then(|d| d.get_element_by_id("name-input"))
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                    .map(|input| input.value())
                    .unwrap_or_default();
                let mut g = game.borrow_mut();
                let now = g.last_time;
                if !g.world.submit_name(&name, now) {
                    log::debug!("Empty name ignored");
                }
            });
            let _ = form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_lifecycle(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Resize keeps the simulation viewport in step with the canvas
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().fit_canvas();
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Page teardown: stop the frame loop and every pending timer
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                g.running = false;
                g.world.shutdown();
                g.settings.save();
                log::info!("Frame loop stopped");
            });
            let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
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
            if !g.running {
                return;
            }
            g.update(time);
            g.render(time);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Sea of Disorder (native) starting...");
    log::info!("Native mode runs a headless autopilot session - run with `trunk serve` to play");

    autopilot::run(0x5EA);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: a tireless sorter plays until the naming ritual
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use sea_of_disorder::Locale;
    use sea_of_disorder::narrative;
    use sea_of_disorder::sim::{GamePhase, Viewport, World, rule_accepts};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Ten minutes of play
    const MAX_FRAMES: u64 = 60 * 600;
    /// Frames between drops
    const REACTION_FRAMES: u64 = 45;

    pub fn run(seed: u64) {
        let viewport = Viewport::new(1280.0, 720.0);
        let mut world = World::new(seed, viewport);
        world.begin_tutorial();
        world.start_playing(0.0);

        let mut now = 0.0;
        for frame in 0..MAX_FRAMES {
            now += FRAME_MS;
            world.update(now);

            match world.state().phase {
                GamePhase::Playing if frame % REACTION_FRAMES == 0 => sort_one(&mut world, now),
                GamePhase::NamingEnding => {
                    world.submit_name("ECHO", now);
                }
                GamePhase::FinalReflection => break,
                _ => {}
            }
        }

        let state = world.state();
        log::info!(
            "Finished in {:?}: score {}, chaos {}, {} frames simulated",
            state.phase,
            state.score,
            state.chaos,
            world.frame_count()
        );
        if let Some(epilogue) = world.epilogue() {
            for line in narrative::epilogue_lines(&epilogue, Locale::En) {
                println!("{line}");
            }
        }
    }

    /// Drop the mirror fish if it is out, otherwise the first fish the rule accepts
    fn sort_one(world: &mut World, now: f64) {
        let rule = world.state().rule;
        let target = world
            .fishes()
            .iter()
            .filter(|f| !f.collected && !f.locked)
            .find(|f| f.is_mirror())
            .or_else(|| {
                world
                    .fishes()
                    .iter()
                    .filter(|f| !f.collected && !f.locked)
                    .find(|f| rule_accepts(rule, f))
            })
            .map(|f| (f.id, f.pos.x));

        if let Some((id, x)) = target {
            let y = world.viewport().archive_limit() / 2.0;
            world.press(id);
            world.drag_to(x, y);
            world.release(now);
            log::debug!("Autopilot dropped {:?}: score {}", id, world.state().score);
        }
    }
}
