//! Spin Selector entry point
//!
//! Handles platform-specific initialization. In the browser it wires the DOM
//! to the selection core and runs its timers on `setInterval`/`setTimeout`;
//! natively it plays one headless round on a simulated clock.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlButtonElement, HtmlElement, HtmlTextAreaElement, TransitionEvent};

    use spin_selector::audio::AudioManager;
    use spin_selector::consts::*;
    use spin_selector::sim::{Command, Effect, Selection, TimerId, step};
    use spin_selector::view::Snapshot;
    use spin_selector::{Settings, wheel};

    /// Browser timer backing a core timer handle
    struct BrowserTimer {
        handle: i32,
        repeating: bool,
        callback: Closure<dyn FnMut()>,
    }

    /// App instance holding all state
    struct App {
        selection: Selection,
        audio: AudioManager,
        timers: HashMap<TimerId, BrowserTimer>,
        /// Callbacks whose timers are gone. A callback may retire itself, so
        /// these are only dropped at the start of a later dispatch
        retired: Vec<Closure<dyn FnMut()>>,
        /// Pool the wheel face was last drawn for
        drawn_pool: Option<Vec<String>>,
    }

    type Shared = Rc<RefCell<App>>;

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    /// Apply a command, carry out its effects, redraw
    fn dispatch(app: &Shared, command: Command) {
        let effects = {
            let mut a = app.borrow_mut();
            a.retired.clear();
            step(&mut a.selection, command)
        };
        for effect in effects {
            execute(app, effect);
        }
        render(app);
    }

    fn execute(app: &Shared, effect: Effect) {
        match effect {
            Effect::Play(cue) => app.borrow().audio.play(cue),
            Effect::StartInterval { id, period_secs } => {
                schedule(app, id, Command::Tick(id), period_secs * 1000, true)
            }
            Effect::ScheduleGrace { id, delay_secs } => {
                schedule(app, id, Command::GraceElapsed(id), delay_secs * 1000, false)
            }
            Effect::CancelInterval(id) | Effect::CancelGrace(id) => cancel(app, id),
        }
    }

    fn schedule(app: &Shared, id: TimerId, command: Command, ms: u32, repeating: bool) {
        let Some(window) = web_sys::window() else { return };
        let weak = Rc::downgrade(app);
        let callback = Closure::<dyn FnMut()>::new(move || {
            let Some(app) = weak.upgrade() else { return };
            dispatch(&app, command.clone());
            // Retired after the dispatch so it is not dropped while running
            if !repeating {
                retire(&app, id);
            }
        });

        let timeout = ms.min(i32::MAX as u32) as i32;
        let result = if repeating {
            window.set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                timeout,
            )
        } else {
            window.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                timeout,
            )
        };

        match result {
            Ok(handle) => {
                let previous = app.borrow_mut().timers.insert(
                    id,
                    BrowserTimer {
                        handle,
                        repeating,
                        callback,
                    },
                );
                if previous.is_some() {
                    log::warn!("Timer {:?} scheduled twice", id);
                }
            }
            Err(e) => log::error!("Failed to schedule timer {:?}: {:?}", id, e),
        }
    }

    fn cancel(app: &Shared, id: TimerId) {
        let timer = app.borrow_mut().timers.remove(&id);
        let Some(timer) = timer else { return };
        if let Some(window) = web_sys::window() {
            if timer.repeating {
                window.clear_interval_with_handle(timer.handle);
            } else {
                window.clear_timeout_with_handle(timer.handle);
            }
        }
        app.borrow_mut().retired.push(timer.callback);
    }

    /// Forget a one-shot timer that has just fired
    fn retire(app: &Shared, id: TimerId) {
        let timer = app.borrow_mut().timers.remove(&id);
        if let Some(timer) = timer {
            app.borrow_mut().retired.push(timer.callback);
        }
    }

    /// Spin, with a fallback in case `transitionend` never arrives
    /// (hidden tab, reduced motion)
    fn spin(app: &Shared) {
        app.borrow().audio.resume();
        dispatch(app, Command::Spin);

        let rotation = {
            let a = app.borrow();
            if !a.selection.is_spinning() {
                return;
            }
            a.selection.rotation()
        };
        let Some(window) = web_sys::window() else { return };
        let weak = Rc::downgrade(app);
        let fallback = Closure::once_into_js(move || {
            let Some(app) = weak.upgrade() else { return };
            let stuck = {
                let a = app.borrow();
                a.selection.is_spinning() && a.selection.rotation() == rotation
            };
            if stuck {
                log::warn!("No transitionend for spin, finishing it");
                dispatch(&app, Command::SpinFinished);
            }
        });
        if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            fallback.unchecked_ref(),
            (SPIN_DURATION_MS + 500) as i32,
        ) {
            log::warn!("Failed to schedule spin fallback: {:?}", e);
        }
    }

    fn set_text(doc: &Document, id: &str, text: &str) {
        if let Some(el) = doc.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_style(doc: &Document, id: &str, property: &str, value: &str) {
        if let Some(el) = doc
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = el.style().set_property(property, value);
        }
    }

    fn set_hidden(doc: &Document, id: &str, hidden: bool) {
        if let Some(el) = doc.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn set_disabled(doc: &Document, id: &str, disabled: bool) {
        if let Some(btn) = doc
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
        {
            btn.set_disabled(disabled);
        }
    }

    /// Update DOM from the current snapshot
    fn render(app: &Shared) {
        let Some(doc) = document() else { return };
        let snap = {
            let mut a = app.borrow_mut();
            let snap = Snapshot::of(&a.selection);
            if a.drawn_pool.as_ref() != Some(&snap.pool) {
                if let Some(face) = doc.get_element_by_id("wheel-face") {
                    if snap.pool.is_empty() {
                        face.set_inner_html(
                            r#"<p class="wheel-empty">Add names to see the wheel</p>"#,
                        );
                    } else {
                        face.set_inner_html(&wheel::render_svg(&snap.pool));
                    }
                }
                a.drawn_pool = Some(snap.pool.clone());
            }
            snap
        };

        // Wheel
        set_style(
            &doc,
            "wheel-rotor",
            "transform",
            &format!("rotate({}deg)", snap.rotation),
        );
        set_disabled(&doc, "spin-btn", !snap.can_spin);

        // Timer
        set_text(&doc, "timer-clock", &snap.clock);
        set_style(
            &doc,
            "timer-progress",
            "width",
            &format!("{:.1}%", snap.progress_percent()),
        );
        if let Some(el) = doc.get_element_by_id("timer-progress") {
            let _ = el.set_attribute("class", snap.band.css_class());
        }
        set_disabled(&doc, "timer-start-btn", !snap.can_start_timer());
        set_text(
            &doc,
            "timer-start-btn",
            if snap.timer_running { "Running..." } else { "Start Timer" },
        );

        // Controls
        match &snap.readd_candidate {
            Some(name) => {
                set_text(&doc, "readd-btn", &format!("Add \"{}\" Back", name));
                set_hidden(&doc, "readd-btn", false);
            }
            None => set_hidden(&doc, "readd-btn", true),
        }

        // Winner modal
        match &snap.winner {
            Some(name) => {
                set_text(&doc, "winner-name", name);
                set_text(
                    &doc,
                    "winner-start-btn",
                    &format!("Start {}s Timer", snap.initial_seconds),
                );
                set_hidden(&doc, "winner-modal", false);
            }
            None => set_hidden(&doc, "winner-modal", true),
        }
    }

    /// Send fixed commands on click
    fn on_click(app: &Shared, id: &str, commands: Vec<Command>) {
        let Some(btn) = document().and_then(|d| d.get_element_by_id(id)) else {
            log::warn!("Missing #{}", id);
            return;
        };
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            app.borrow().audio.resume();
            for command in &commands {
                dispatch(&app, command.clone());
            }
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_controls(app: &Shared) {
        let Some(doc) = document() else { return };

        // Spin
        if let Some(btn) = doc.get_element_by_id("spin-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                spin(&app);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Wheel stopped
        if let Some(rotor) = doc.get_element_by_id("wheel-rotor") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TransitionEvent| {
                // Ignore transitions bubbling up from the wheel face
                if event.property_name() == "transform" {
                    dispatch(&app, Command::SpinFinished);
                }
            });
            let _ = rotor
                .add_event_listener_with_callback("transitionend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Names panel
        if let Some(btn) = doc.get_element_by_id("update-names-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let text = document()
                    .and_then(|d| d.get_element_by_id("names-input"))
                    .and_then(|el| el.dyn_into::<HtmlTextAreaElement>().ok())
                    .map(|input| input.value())
                    .unwrap_or_default();
                dispatch(&app, Command::UpdateNames(text));
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Escape closes the winner modal
        if let Some(window) = web_sys::window() {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if event.key() == "Escape" && app.borrow().selection.winner().is_some() {
                    dispatch(&app, Command::DismissWinner);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        on_click(app, "readd-btn", vec![Command::ReaddWinner]);
        on_click(app, "reset-wheel-btn", vec![Command::ResetWheel]);
        on_click(app, "timer-start-btn", vec![Command::StartTimer]);
        on_click(app, "timer-reset-btn", vec![Command::ResetTimer]);
        on_click(
            app,
            "winner-start-btn",
            vec![Command::StartTimer, Command::DismissWinner],
        );
        on_click(app, "winner-readd-btn", vec![Command::ReaddWinner]);
        on_click(app, "winner-close-btn", vec![Command::DismissWinner]);
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Spin Selector starting...");

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let audio = AudioManager::new(settings.effective_volume());

        // Seed the names panel and the wheel from the same text
        let Some(doc) = document() else {
            log::error!("No document - nothing to mount");
            return;
        };
        let input = doc
            .get_element_by_id("names-input")
            .and_then(|el| el.dyn_into::<HtmlTextAreaElement>().ok());
        let names = match &input {
            Some(input) if !input.value().trim().is_empty() => input.value(),
            Some(input) => {
                input.set_value(DEFAULT_NAMES);
                DEFAULT_NAMES.to_string()
            }
            None => DEFAULT_NAMES.to_string(),
        };

        let app = Rc::new(RefCell::new(App {
            selection: Selection::with_names(settings, seed, &names),
            audio,
            timers: HashMap::new(),
            retired: Vec::new(),
            drawn_pool: None,
        }));

        log::info!("Selector initialized with seed: {}", seed);

        // Hide loading indicator
        if let Some(loading) = doc.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        setup_controls(&app);
        render(&app);

        log::info!("Spin Selector running!");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use spin_selector::consts::DEFAULT_NAMES;
    use spin_selector::{RemovalPolicy, Settings};

    env_logger::init();
    log::info!("Spin Selector (native) starting...");
    log::info!("The wheel UI is web-only - run with `trunk serve`; playing a headless round");

    let mut settings = Settings::load();
    let mut names = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--policy" {
            match args.next().as_deref().and_then(RemovalPolicy::from_str) {
                Some(policy) => settings.removal_policy = policy,
                None => log::warn!("--policy expects on_expiry or on_grace_close"),
            }
        } else {
            names.push(arg);
        }
    }
    let names = if names.is_empty() {
        DEFAULT_NAMES.to_string()
    } else {
        names.join("\n")
    };

    let seed = settings.seed.unwrap_or_else(rand::random);
    headless_round(settings, seed, &names);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Spin once, run the countdown through its grace window, report the result
#[cfg(not(target_arch = "wasm32"))]
fn headless_round(settings: spin_selector::Settings, seed: u64, names: &str) {
    use spin_selector::{Command, HeadlessDriver, Selection, Snapshot};

    let run_secs = u64::from(settings.initial_seconds + settings.grace_seconds);
    let mut driver = HeadlessDriver::new(Selection::with_names(settings, seed, names));
    log::info!("Seed {}, {} names", seed, driver.selection().pool().len());

    driver.send(Command::Spin);
    driver.send(Command::SpinFinished);
    let Some(winner) = driver.selection().winner().map(str::to_owned) else {
        println!("No names to spin");
        return;
    };
    println!("Winner: {}", winner);

    driver.send(Command::StartTimer);
    driver.advance(run_secs);
    println!(
        "After {}s: {} left on the wheel ({})",
        driver.now(),
        driver.selection().pool().len(),
        driver.selection().pool().join(", ")
    );

    match Snapshot::of(driver.selection()).to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialise snapshot: {}", e),
    }
}
