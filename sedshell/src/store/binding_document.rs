// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! On disk shape of `data.json`:
//!
//! ```json
//! {"commands": {"c": ["echo", true], "l": ["less", false]}}
//! ```
//!
//! Top level keys other than `commands` are carried through a load / save cycle
//! untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A shell command bound to a key, plus whether running it moves on to the next line.
/// Serialized as the two element array `[command, consume]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, bool)", into = "(String, bool)")]
pub struct Binding {
    pub command: String,
    pub consume: bool,
}

impl Binding {
    #[must_use]
    pub fn new(command: impl Into<String>, consume: bool) -> Self {
        Self {
            command: command.into(),
            consume,
        }
    }

    /// `!` marks a binding that consumes the line, `&` one that doesn't (matching the
    /// built in keys that create them).
    #[must_use]
    pub fn consume_marker(&self) -> char { if self.consume { '!' } else { '&' } }
}

impl From<(String, bool)> for Binding {
    fn from((command, consume): (String, bool)) -> Self { Self { command, consume } }
}

impl From<Binding> for (String, bool) {
    fn from(binding: Binding) -> Self { (binding.command, binding.consume) }
}

/// The whole `data.json` document. It is always read and written as a unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BindingDocument {
    /// Keyed by the bound character (as a one character string, since JSON object keys
    /// are strings). [`BTreeMap`] keeps them sorted for the help menu.
    #[serde(default)]
    pub commands: BTreeMap<String, Binding>,

    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl BindingDocument {
    #[must_use]
    pub fn get(&self, key: char) -> Option<&Binding> {
        self.commands.get(&key.to_string())
    }

    pub fn insert(&mut self, key: char, binding: Binding) {
        self.commands.insert(key.to_string(), binding);
    }

    /// One line per binding: `<key> - <! or &> <command>`, sorted by key.
    #[must_use]
    pub fn render_menu_lines(&self) -> Vec<String> {
        self.commands
            .iter()
            .map(|(key, binding)| {
                format!("{key} - {} {}", binding.consume_marker(), binding.command)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_binding_is_a_json_array() {
        let mut doc = BindingDocument::default();
        doc.insert('c', Binding::new("echo", true));

        let json = serde_json::to_string(&doc).unwrap();

        assert_eq!(json, r#"{"commands":{"c":["echo",true]}}"#);
    }

    #[test]
    fn test_missing_commands_key_is_empty() {
        let doc: BindingDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.commands.is_empty());
    }

    #[test]
    fn test_unknown_keys_survive() {
        let input = r#"{"commands":{"x":["ls",false]},"version":3}"#;
        let doc: BindingDocument = serde_json::from_str(input).unwrap();

        assert_eq!(doc.get('x'), Some(&Binding::new("ls", false)));
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            serde_json::from_str::<serde_json::Value>(input).unwrap()
        );
    }

    #[test]
    fn test_menu_lines_sorted_with_markers() {
        let mut doc = BindingDocument::default();
        doc.insert('z', Binding::new("less", false));
        doc.insert('a', Binding::new("rm", true));

        assert_eq!(doc.render_menu_lines(), vec!["a - ! rm", "z - & less"]);
    }
}
