//! Held-key table fed by the host
//!
//! The host writes raw key names as they go up and down; the simulation
//! samples the table once per tick through [`KeyBindings`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Logical controls sampled for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Key names (lowercase) mapped to each action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub jump: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: vec!["a".into(), "arrowleft".into()],
            right: vec!["d".into(), "arrowright".into()],
            jump: vec![" ".into(), "space".into()],
        }
    }
}

/// Last-write-wins map of currently held keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    held: HashMap<String, bool>,
}

impl InputState {
    /// Record a key going down or up
    pub fn set_held(&mut self, key: &str, pressed: bool) {
        self.held.insert(key.to_lowercase(), pressed);
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.get(key).copied().unwrap_or(false)
    }

    /// Release everything (host lost focus)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Sample the logical controls
    pub fn controls(&self, bindings: &KeyBindings) -> Controls {
        let any = |keys: &[String]| keys.iter().any(|k| self.is_held(k));
        Controls {
            left: any(&bindings.left),
            right: any(&bindings.right),
            jump: any(&bindings.jump),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_bound_key_counts() {
        let bindings = KeyBindings::default();
        let mut input = InputState::default();

        input.set_held("ArrowLeft", true);
        input.set_held("a", true);
        input.set_held("a", false);
        assert!(input.controls(&bindings).left, "arrow still held");

        input.set_held("Space", true);
        let controls = input.controls(&bindings);
        assert!(controls.jump);
        assert!(!controls.right);

        input.clear();
        assert_eq!(input.controls(&bindings), Controls::default());
    }
}
