//! `{{ var }}` rendering for manifest text fields.

use std::collections::BTreeMap;

use minijinja::{Environment, UndefinedBehavior};

/// Renders manifest strings against the `[vars]` table.
pub struct VarRenderer {
    env: Environment<'static>,
    vars: BTreeMap<String, String>,
}

impl VarRenderer {
    pub fn new(vars: BTreeMap<String, String>) -> Self {
        let mut env = Environment::new();
        // Typos in variable names must fail the load, not render as "".
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        Self { env, vars }
    }

    /// Render `text`. Strings without template syntax are returned as-is.
    pub fn render(&self, text: &str) -> Result<String, minijinja::Error> {
        if !text.contains("{{") && !text.contains("{%") {
            return Ok(text.to_string());
        }
        self.env.render_str(text, &self.vars)
    }
}
