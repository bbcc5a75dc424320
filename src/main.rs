//! Tactical Ops entry point
//!
//! Handles platform-specific initialization and runs the game loop.
//!
//! The web page is expected to provide `#canvas`, the `#hud` elements, the
//! `#menu` / `#game-over` overlays with `#start-btn` / `#redeploy-btn`, and
//! the advisor panel (`#advisor-form`, `#advisor-input`, `#advisor-log`,
//! `#intel-file`, `#intel-prompt`, `#intel-analyze`, `#intel-report`).
//! Optional `#tuning` and `#advisor-config` script tags carry JSON overrides.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{EventTarget, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, MouseEvent};

    use tactical_ops::advisor::fetch::FetchTransport;
    use tactical_ops::advisor::terminal::Sender;
    use tactical_ops::advisor::{Advisor, AdvisorConfig, AnalysisStatus, Terminal};
    use tactical_ops::platform::{InputSampler, SurfaceRect};
    use tactical_ops::renderer::{RenderState, build_scene};
    use tactical_ops::sim::{GameEvent, GamePhase, Session};
    use tactical_ops::{PlayerStats, StatsReporter, Tuning};

    /// One registered DOM listener
    struct Listener {
        target: EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut(web_sys::Event)>,
    }

    /// Every listener the game installed; dropping it unregisters them all
    #[derive(Default)]
    struct Listeners(Vec<Listener>);

    impl Listeners {
        fn add(
            &mut self,
            target: &EventTarget,
            kind: &'static str,
            handler: impl FnMut(web_sys::Event) + 'static,
        ) {
            let closure = Closure::<dyn FnMut(_)>::new(handler);
            if target
                .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
                .is_err()
            {
                log::warn!("Could not register '{}' listener", kind);
                return;
            }
            self.0.push(Listener {
                target: target.clone(),
                kind,
                closure,
            });
        }
    }

    impl Drop for Listeners {
        fn drop(&mut self) {
            for l in self.0.drain(..) {
                let _ = l
                    .target
                    .remove_event_listener_with_callback(l.kind, l.closure.as_ref().unchecked_ref());
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        input: InputSampler,
        stats: StatsReporter,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        /// Pending requestAnimationFrame handle
        frame_handle: Option<i32>,
        running: bool,
    }

    impl Game {
        fn new(tuning: Tuning, seed: u64, canvas: HtmlCanvasElement) -> Self {
            let field = tuning.field_size();
            let stats = StatsReporter::new(tuning.stats_every_frames);
            Self {
                session: Session::new(tuning, seed),
                input: InputSampler::new(field),
                stats,
                render_state: None,
                canvas,
                frame_handle: None,
                running: true,
            }
        }

        fn surface_rect(&self) -> SurfaceRect {
            let rect = self.canvas.get_bounding_client_rect();
            SurfaceRect {
                left: rect.left(),
                top: rect.top(),
                width: rect.width(),
                height: rect.height(),
            }
        }

        /// Input -> step -> render -> stats for one display frame at `time`
        fn frame(&mut self, time: f64) {
            let steps = self.session.advance(time, &mut self.input);
            if self.session.phase() == GamePhase::Playing {
                self.render();
            }
            for _ in 0..steps {
                if let Some(stats) = self.stats.observe(self.session.world()) {
                    update_hud(&stats, self.session.tuning());
                }
            }
            self.handle_events();
        }

        fn handle_events(&mut self) {
            for event in self.session.take_events() {
                match event {
                    GameEvent::Started => {
                        self.input.reset();
                        self.stats.reset();
                        set_class("#menu", "hidden");
                        set_class("#game-over", "hidden");
                        set_class("#hud", "");
                    }
                    GameEvent::GameOver { score } => {
                        let stats = self.stats.flush(self.session.world());
                        update_hud(&stats, self.session.tuning());
                        set_text("#final-score", &score.to_string());
                        set_class("#game-over", "");
                    }
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = build_scene(self.session.world(), self.session.tuning());
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let (width, height) = render_state.size();
                        render_state.resize(width, height);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Stop the loop; no further frames run after this
        fn shutdown(&mut self) {
            self.running = false;
            if let Some(handle) = self.frame_handle.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(handle);
                }
            }
            log::info!("Game shut down");
        }
    }

    fn document() -> Option<web_sys::Document> {
        web_sys::window().and_then(|w| w.document())
    }

    fn select(selector: &str) -> Option<web_sys::Element> {
        document()?.query_selector(selector).ok().flatten()
    }

    fn set_text(selector: &str, text: &str) {
        if let Some(el) = select(selector) {
            el.set_text_content(Some(text));
        }
    }

    fn set_class(selector: &str, class: &str) {
        if let Some(el) = select(selector) {
            let _ = el.set_attribute("class", class);
        }
    }

    fn set_style(selector: &str, style: &str) {
        if let Some(el) = select(selector) {
            let _ = el.set_attribute("style", style);
        }
    }

    fn input_value(selector: &str) -> Option<String> {
        select(selector)?
            .dyn_into::<HtmlInputElement>()
            .ok()
            .map(|input| input.value())
    }

    /// Update HUD elements in DOM
    fn update_hud(stats: &PlayerStats, tuning: &Tuning) {
        let band = stats.health_band();
        set_text("#hud-health .hud-value", &stats.health_label());
        set_style(
            "#hud-health .bar",
            &format!(
                "width: {:.0}%; background: {}",
                stats.health_percent(),
                band.css_color()
            ),
        );

        let weapon_color = tuning.weapons.get(stats.weapon).css_color();
        set_text("#hud-weapon .hud-value", stats.weapon.display_name());
        set_style("#hud-weapon", &format!("color: {}", weapon_color));

        set_text("#hud-ammo .hud-value", &stats.ammo_label());
        set_class("#hud-ammo", if stats.out_of_ammo() { "empty" } else { "" });

        set_text("#hud-score .hud-value", &stats.score_label());
    }

    /// JSON from a `<script type="application/json">` tag, if present
    fn embedded_json(id: &str) -> Option<String> {
        document()?.get_element_by_id(id)?.text_content()
    }

    fn load_tuning() -> Tuning {
        match embedded_json("tuning").map(|json| Tuning::from_json(&json)) {
            Some(Ok(tuning)) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Some(Err(e)) => {
                log::warn!("Ignoring tuning overrides: {}", e);
                Tuning::default()
            }
            None => Tuning::default(),
        }
    }

    fn load_advisor_config() -> AdvisorConfig {
        match embedded_json("advisor-config").map(|json| serde_json::from_str(&json)) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                log::warn!("Ignoring advisor config: {}", e);
                AdvisorConfig::default()
            }
            None => AdvisorConfig::default(),
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tactical Ops starting...");

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

        let tuning = load_tuning();

        // Backing store at device resolution; the pipeline letterboxes the field
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let field = tuning.field_size().as_vec2();
        let game = Rc::new(RefCell::new(Game::new(tuning, seed, canvas.clone())));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height, field).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device: {}", e),
        }

        let listeners = Rc::new(RefCell::new(Listeners::default()));
        setup_input_handlers(&canvas, game.clone(), &mut listeners.borrow_mut());
        setup_session_buttons(game.clone(), &mut listeners.borrow_mut());
        setup_advisor(&mut listeners.borrow_mut());
        setup_teardown(game.clone(), listeners);

        set_class("#menu", "");

        request_animation_frame(game);

        log::info!("Tactical Ops running!");
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
        listeners: &mut Listeners,
    ) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        {
            let game = game.clone();
            listeners.add(&document, "keydown", move |event: web_sys::Event| {
                if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                    game.borrow_mut().input.key_down(&event.key());
                }
            });
        }
        {
            let game = game.clone();
            listeners.add(&document, "keyup", move |event: web_sys::Event| {
                if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                    game.borrow_mut().input.key_up(&event.key());
                }
            });
        }
        {
            let game = game.clone();
            listeners.add(canvas, "mousemove", move |event: web_sys::Event| {
                if let Some(event) = event.dyn_ref::<MouseEvent>() {
                    let mut g = game.borrow_mut();
                    let rect = g.surface_rect();
                    g.input
                        .pointer_move(event.client_x() as f64, event.client_y() as f64, rect);
                }
            });
        }
        {
            let game = game.clone();
            listeners.add(canvas, "mousedown", move |_event: web_sys::Event| {
                game.borrow_mut().input.pointer_down();
            });
        }
        {
            // Release anywhere so a drag off the canvas doesn't stick
            let game = game.clone();
            listeners.add(&window, "mouseup", move |_event: web_sys::Event| {
                game.borrow_mut().input.pointer_up();
            });
        }
        {
            // Focus loss: forget held keys
            let game = game.clone();
            listeners.add(&window, "blur", move |_event: web_sys::Event| {
                game.borrow_mut().input.reset();
            });
        }
    }

    fn setup_session_buttons(game: Rc<RefCell<Game>>, listeners: &mut Listeners) {
        if let Some(btn) = select("#start-btn") {
            let game = game.clone();
            listeners.add(&btn, "click", move |_event: web_sys::Event| {
                game.borrow_mut().session.start();
            });
        }
        if let Some(btn) = select("#redeploy-btn") {
            let game = game.clone();
            listeners.add(&btn, "click", move |_event: web_sys::Event| {
                game.borrow_mut().session.redeploy();
            });
        }
    }

    fn render_terminal(terminal: &Terminal) {
        let Some(log_el) = select("#advisor-log") else {
            return;
        };
        let Some(document) = document() else {
            return;
        };
        log_el.set_inner_html("");
        for message in terminal.messages() {
            if let Ok(line) = document.create_element("div") {
                let class = match message.sender {
                    Sender::User => "msg user",
                    Sender::Advisor => "msg advisor",
                };
                let _ = line.set_attribute("class", class);
                line.set_text_content(Some(&message.text));
                let _ = log_el.append_child(&line);
            }
        }
        set_class(
            "#advisor-typing",
            if terminal.awaiting_reply() { "" } else { "hidden" },
        );

        match terminal.analysis_status() {
            AnalysisStatus::Idle => set_text("#intel-report", ""),
            AnalysisStatus::Analyzing => set_text("#intel-report", "ANALYZING..."),
            AnalysisStatus::Complete => set_text("#intel-report", terminal.analysis_text()),
        }
    }

    fn setup_advisor(listeners: &mut Listeners) {
        let advisor = Rc::new(Advisor::new(FetchTransport, load_advisor_config()));
        let terminal = Rc::new(RefCell::new(Terminal::new()));
        let selected_image: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));
        render_terminal(&terminal.borrow());

        if let Some(form) = select("#advisor-form") {
            let advisor = advisor.clone();
            let terminal = terminal.clone();
            listeners.add(&form, "submit", move |event: web_sys::Event| {
                event.prevent_default();
                let Some(text) = input_value("#advisor-input") else {
                    return;
                };
                let Some((message, history)) = terminal.borrow_mut().submit(&text) else {
                    return;
                };
                if let Some(input) = select("#advisor-input")
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                {
                    input.set_value("");
                }
                render_terminal(&terminal.borrow());

                let advisor = advisor.clone();
                let terminal = terminal.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let reply = advisor.send_chat_message(&message, &history).await;
                    terminal.borrow_mut().receive(reply);
                    render_terminal(&terminal.borrow());
                });
            });
        }

        if let Some(file_input) = select("#intel-file") {
            let terminal = terminal.clone();
            let selected_image = selected_image.clone();
            listeners.add(&file_input, "change", move |event: web_sys::Event| {
                let Some(file) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .and_then(|input| input.files())
                    .and_then(|files| files.get(0))
                else {
                    return;
                };
                let Ok(reader) = web_sys::FileReader::new() else {
                    return;
                };
                let terminal = terminal.clone();
                let selected_image = selected_image.clone();
                let reader_ref = reader.clone();
                let onload = Closure::once(move |_event: web_sys::Event| {
                    if let Some(url) = reader_ref.result().ok().and_then(|r| r.as_string()) {
                        *selected_image.borrow_mut() = Some(url);
                        terminal.borrow_mut().clear_analysis();
                        render_terminal(&terminal.borrow());
                    }
                });
                reader.set_onloadend(Some(onload.as_ref().unchecked_ref()));
                onload.forget();
                if let Err(e) = reader.read_as_data_url(&file) {
                    log::warn!("Could not read image: {:?}", e);
                }
            });
        }

        if let Some(btn) = select("#intel-analyze") {
            listeners.add(&btn, "click", move |_event: web_sys::Event| {
                let Some(url) = selected_image.borrow().clone() else {
                    return;
                };
                if terminal.borrow().analysis_status() == AnalysisStatus::Analyzing {
                    return;
                }
                let prompt = input_value("#intel-prompt");
                terminal.borrow_mut().begin_analysis();
                render_terminal(&terminal.borrow());

                let advisor = advisor.clone();
                let terminal = terminal.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let report = advisor.analyze_data_url(&url, prompt.as_deref()).await;
                    terminal.borrow_mut().finish_analysis(report);
                    render_terminal(&terminal.borrow());
                });
            });
        }
    }

    /// Page going away: stop the loop and drop every listener
    fn setup_teardown(game: Rc<RefCell<Game>>, listeners: Rc<RefCell<Listeners>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once_into_js(move |_event: web_sys::Event| {
            game.borrow_mut().shutdown();
            let registry = std::mem::take(&mut *listeners.borrow_mut());
            drop(registry);
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.unchecked_ref());
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let next = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(next, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(handle) => game.borrow_mut().frame_handle = Some(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.frame_handle = None;
            if !g.running {
                return;
            }
            g.frame(time);
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
fn main() {
    env_logger::init();
    log::info!("Tactical Ops (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    headless_demo(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one session with a simple bot: strafe in a circle, shoot the nearest enemy
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo(seed: u64) {
    use glam::DVec2;
    use tactical_ops::consts::SIM_DT_MS;
    use tactical_ops::sim::{GamePhase, Intent, Session, WeaponKind};
    use tactical_ops::{StatsReporter, Tuning};

    const MAX_STEPS: u64 = 60 * 60 * 5;

    let tuning = Tuning::default();
    let mut stats = StatsReporter::new(tuning.stats_every_frames * 60);
    let mut session = Session::new(tuning, seed);
    session.start();

    let mut step = 0u64;
    while session.phase() == GamePhase::Playing && step < MAX_STEPS {
        let world = session.world();
        let me = world.player.body.pos;
        let aim = world
            .enemies
            .iter()
            .map(|e| e.body.pos)
            .min_by(|a, b| a.distance(me).total_cmp(&b.distance(me)))
            .unwrap_or(me + DVec2::X);
        let t = step as f64 * 0.02;
        let intent = Intent {
            move_dir: DVec2::new(t.cos(), t.sin()),
            aim,
            firing: true,
            selected_weapon: WeaponKind::from_slot(((step / 600) % 3) as u8 + 1),
        };

        step += 1;
        session.step(&intent, step as f64 * SIM_DT_MS);
        if let Some(s) = stats.observe(session.world()) {
            log::info!(
                "t={:>4.0}s health={} weapon={} ammo={} score={}",
                step as f64 * SIM_DT_MS / 1000.0,
                s.health_label(),
                s.weapon.display_name(),
                s.ammo_label(),
                s.score_label()
            );
        }
    }

    let world = session.world();
    println!(
        "Session over after {} steps: score {}, {} enemies on field, phase {:?}",
        step,
        world.score,
        world.enemies.len(),
        session.phase()
    );
}
