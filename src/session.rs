//! Host-facing session wrapper
//!
//! The host posts commands and key changes at any time; they are applied
//! together at the start of the next `update`, before the tick runs.

use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, InputState, KeyBindings, LevelSet, Snapshot, tick};

/// Commands accepted from the presentation/input layer
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Begin a run from level 1
    Start,
    /// Reset the run to level 1
    Restart,
    /// A key went down or up
    SetHeld { key: String, pressed: bool },
    /// Drop every held key (window hidden or blurred)
    ReleaseKeys,
    /// Force a phase (e.g. back to the menu)
    SetPhase(GamePhase),
}

/// Owns the simulation and the input table between frames
#[derive(Debug, Clone)]
pub struct Session {
    state: GameState,
    input: InputState,
    bindings: KeyBindings,
    pending: Vec<Command>,
}

impl Session {
    /// New session on the built-in levels, sitting in the menu
    pub fn new(seed: u64, settings: Settings) -> Self {
        let Settings { tuning, bindings } = settings;
        Self::with_state(GameState::with_levels(seed, LevelSet::builtin(), tuning), bindings)
    }

    pub fn with_state(state: GameState, bindings: KeyBindings) -> Self {
        Self {
            state,
            input: InputState::default(),
            bindings,
            pending: Vec::new(),
        }
    }

    /// Queue a command for the next update
    pub fn post(&mut self, command: Command) {
        self.pending.push(command);
    }

    pub fn start(&mut self) {
        self.post(Command::Start);
    }

    pub fn restart(&mut self) {
        self.post(Command::Restart);
    }

    pub fn set_held(&mut self, key: &str, pressed: bool) {
        self.post(Command::SetHeld {
            key: key.to_string(),
            pressed,
        });
    }

    pub fn release_keys(&mut self) {
        self.post(Command::ReleaseKeys);
    }

    pub fn set_phase(&mut self, phase: GamePhase) {
        self.post(Command::SetPhase(phase));
    }

    /// Apply queued commands, run one tick, and report the new state
    pub fn update(&mut self, dt: f32) -> Snapshot {
        for command in std::mem::take(&mut self.pending) {
            self.apply(command);
        }

        let controls = self.input.controls(&self.bindings);
        tick(&mut self.state, controls, dt);
        self.state.snapshot()
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Start | Command::Restart => {
                match (&command, self.state.phase) {
                    (Command::Restart, GamePhase::Menu) => {
                        log::warn!("Restart requested from the menu, starting instead")
                    }
                    (Command::Start, phase) if phase != GamePhase::Menu => {
                        log::warn!("Start requested during {:?}, restarting", phase)
                    }
                    _ => {}
                }
                self.state.restart();
            }
            Command::SetHeld { key, pressed } => self.input.set_held(&key, pressed),
            Command::ReleaseKeys => self.input.clear(),
            Command::SetPhase(phase) => {
                log::info!("Phase forced: {:?} -> {:?}", self.state.phase, phase);
                self.state.phase = phase;
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Take the gameplay events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}
