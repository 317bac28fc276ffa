// File: src/interpreter/environment.rs
//
// Variable storage for the SimPL interpreter.
// A stack of binding frames where inner frames shadow outer ones. In flat
// scoping mode the interpreter never pushes a frame, so the stack stays at
// a single global table.

use std::collections::HashMap;

/// Name → number bindings, organized as a stack of frames
///
/// Lookups search from the innermost frame (end of the Vec) outward.
///
/// # Examples
///
/// ```
/// use simpl::interpreter::Environment;
///
/// let mut env = Environment::new();
/// env.define("x".to_string(), 10.0);
///
/// env.push_scope();
/// env.define("x".to_string(), 20.0);
/// assert_eq!(env.get("x"), Some(20.0));
///
/// env.pop_scope();
/// assert_eq!(env.get("x"), Some(10.0));
/// ```
#[derive(Clone, Debug)]
pub struct Environment {
    scopes: Vec<HashMap<String, f64>>,
}

impl Environment {
    /// Create a new environment with a single global frame
    pub fn new() -> Self {
        Environment {
            scopes: vec![HashMap::new()],
        }
    }

    /// Push a new frame onto the stack (entering a block)
    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pop the innermost frame. The global frame is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Look a name up, innermost frame first
    pub fn get(&self, name: &str) -> Option<f64> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }

    /// Bind a name in the innermost frame, overwriting any binding already there
    pub fn define(&mut self, name: String, value: f64) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, value);
        }
    }

    /// Overwrite an existing binding in the nearest frame that has it.
    /// Returns false, and changes nothing, when the name is unbound.
    pub fn assign(&mut self, name: &str, value: f64) -> bool {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(slot) = scope.get_mut(name) {
                *slot = value;
                return true;
            }
        }
        false
    }

    /// Every visible binding, sorted by name; shadowed bindings are skipped
    pub fn bindings(&self) -> Vec<(String, f64)> {
        let mut visible: HashMap<&str, f64> = HashMap::new();
        for scope in &self.scopes {
            for (name, value) in scope {
                visible.insert(name.as_str(), *value);
            }
        }
        let mut bindings: Vec<(String, f64)> = visible
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        bindings.sort_by(|a, b| a.0.cmp(&b.0));
        bindings
    }

    pub fn names(&self) -> Vec<String> {
        self.bindings().into_iter().map(|(name, _)| name).collect()
    }

    /// Drop every binding and every frame except an empty global one
    pub fn clear(&mut self) {
        self.scopes.clear();
        self.scopes.push(HashMap::new());
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
