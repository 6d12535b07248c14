//! Tile Runner entry point
//!
//! The browser build wires DOM key events into a `Session` and drives it from
//! `requestAnimationFrame`, mirroring the snapshot into the HUD. The native
//! build runs a scripted headless playthrough and prints the final snapshot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent};

    use tile_runner::sim::{GameEvent, GamePhase, Snapshot};
    use tile_runner::{Session, Settings, scenery};

    /// Frame length assumed before the first timestamp arrives
    const FIRST_FRAME_DT: f32 = 1.0 / 60.0;

    /// Browser-side game instance
    struct Game {
        session: Session,
        seed: u64,
        last_time: f64,
        last_level: Option<usize>,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                session: Session::new(seed, Settings::load()),
                seed,
                last_time: 0.0,
                last_level: None,
            }
        }

        fn update(&mut self, dt: f32) -> Snapshot {
            let snapshot = self.session.update(dt);

            for event in self.session.drain_events() {
                match event {
                    GameEvent::Jumped { .. } | GameEvent::CoinCollected { .. } => {
                        log::debug!("{:?}", event)
                    }
                    _ => log::info!("{:?}", event),
                }
            }

            // Background layout is rebuilt whenever a new level loads
            let level = self.session.state().level.as_ref();
            let index = level.map(|l| l.index);
            if index != self.last_level {
                if let Some(level) = level {
                    let decorations = scenery::for_level(level, self.seed);
                    log::info!(
                        "Level {} ({:?}): {} decorations",
                        level.index + 1,
                        level.theme,
                        decorations.len()
                    );
                }
                self.last_level = index;
            }

            snapshot
        }

        fn on_key_down(&mut self, key: &str) {
            match key {
                "Enter" => match self.session.state().phase {
                    GamePhase::Menu => self.session.start(),
                    GamePhase::GameOver | GamePhase::Victory => self.session.restart(),
                    GamePhase::Playing => {}
                },
                "Escape" => self.session.set_phase(GamePhase::Menu),
                _ => self.session.set_held(key, true),
            }
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    /// Mirror the snapshot into the HUD and overlays
    fn update_hud(snapshot: &Snapshot) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        set_text(&document, "#hud-score .hud-value", &snapshot.score.to_string());
        set_text(
            &document,
            "#hud-time .hud-value",
            &(snapshot.time_remaining.ceil() as u32).to_string(),
        );
        set_text(&document, "#hud-level .hud-value", &snapshot.level.to_string());

        set_visible(&document, "menu", snapshot.phase == GamePhase::Menu);
        set_visible(&document, "game-over", snapshot.phase == GamePhase::GameOver);
        set_visible(&document, "victory", snapshot.phase == GamePhase::Victory);

        if snapshot.phase != GamePhase::Playing {
            set_text(&document, "#final-score", &snapshot.score.to_string());
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Tile Runner starting...");

        let seed = js_sys::Date::now() as u64;
        log::info!("Seed: {}", seed);

        let game = Rc::new(RefCell::new(Game::new(seed)));
        update_hud(&game.borrow().session.snapshot());

        setup_input_handlers(game.clone());
        setup_focus_release(game.clone());
        request_animation_frame(game);
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                // Keep the page from scrolling on game keys
                if matches!(key.as_str(), " " | "ArrowLeft" | "ArrowRight" | "ArrowUp" | "ArrowDown") {
                    event.prevent_default();
                }
                game.borrow_mut().on_key_down(&key);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().session.set_held(&event.key(), false);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Keyup never arrives while the page is hidden, so drop held keys then
    fn setup_focus_release(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().session.release_keys();
                    log::info!("Keys released (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().session.release_keys();
                log::info!("Keys released (window blur)");
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

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                FIRST_FRAME_DT
            };
            g.last_time = time;

            let snapshot = g.update(dt);
            update_hud(&snapshot);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use tile_runner::sim::{GameEvent, GamePhase};
    use tile_runner::{Session, Settings, scenery};

    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Ten minutes of play at 60 fps
    const MAX_FRAMES: usize = 60 * 600;
    /// Tap jump for `JUMP_HOLD` frames out of every `JUMP_PERIOD`
    const JUMP_PERIOD: usize = 40;
    const JUMP_HOLD: usize = 12;

    /// Usage: `tile-runner [settings.json] [seed]`
    pub fn run() {
        let mut args = std::env::args().skip(1);
        let settings_path = args.next().map(PathBuf::from);
        let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0);

        let settings = Settings::load(settings_path.as_deref());
        let mut session = Session::new(seed, settings);

        log::info!("Tile Runner (headless) starting with seed {}", seed);
        session.start();
        session.set_held("d", true);

        for frame in 0..MAX_FRAMES {
            session.set_held(" ", frame % JUMP_PERIOD < JUMP_HOLD);
            let snapshot = session.update(FRAME_DT);

            for event in session.drain_events() {
                match event {
                    GameEvent::Jumped { .. } => log::debug!("frame {}: {:?}", frame, event),
                    GameEvent::LevelCompleted { .. } => {
                        log::info!("frame {}: {:?}", frame, event);
                        if let Some(level) = session.state().level.as_ref() {
                            let decorations = scenery::for_level(level, seed);
                            log::info!("Next level has {} decorations", decorations.len());
                        }
                    }
                    _ => log::info!("frame {}: {:?}", frame, event),
                }
            }

            if snapshot.phase != GamePhase::Playing {
                break;
            }
        }

        match serde_json::to_string_pretty(&session.snapshot()) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Cannot encode snapshot: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
