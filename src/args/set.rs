// src/args/set.rs

use std::collections::BTreeSet;

use super::map::OptionMap;
use super::parse;
use super::value::{Emission, OptionValue};
use crate::types::ArgStyle;

/// Mutable set of encoder options that renders to an argument vector.
///
/// The set is made of:
/// - a base [`OptionMap`] edited through [`set`](Self::set),
/// - an optional read-only overlay whose values win on collision,
/// - a set of disabled names that are skipped at emission time but kept in
///   the map, so re-enabling restores the previous value,
/// - trailing positional tokens (typically the output path).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentSet {
    style: ArgStyle,
    base: OptionMap,
    overlay: Option<OptionMap>,
    disabled: BTreeSet<String>,
    positionals: Vec<String>,
}

impl ArgumentSet {
    pub fn new(style: ArgStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    pub fn flags() -> Self {
        Self::new(ArgStyle::Flag)
    }

    pub fn assignments() -> Self {
        Self::new(ArgStyle::Assignment)
    }

    /// Build a set from an initial map.
    pub fn from_map(style: ArgStyle, base: OptionMap) -> Self {
        Self {
            style,
            base,
            ..Self::default()
        }
    }

    pub fn style(&self) -> ArgStyle {
        self.style
    }

    pub fn base(&self) -> &OptionMap {
        &self.base
    }

    pub fn overlay(&self) -> Option<&OptionMap> {
        self.overlay.as_ref()
    }

    /// Insert or overwrite `name`.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> &mut Self {
        self.base.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.overlay
            .as_ref()
            .and_then(|o| o.get(name))
            .or_else(|| self.base.get(name))
    }

    pub fn remove(&mut self, name: &str) -> Option<OptionValue> {
        self.disabled.remove(name);
        self.base.remove(name)
    }

    /// Replace the overlay. Passing `None` removes it.
    pub fn set_overlay(&mut self, overlay: Option<OptionMap>) -> &mut Self {
        self.overlay = overlay;
        self
    }

    pub fn with_overlay(mut self, overlay: OptionMap) -> Self {
        self.overlay = Some(overlay);
        self
    }

    /// Flip whether `name` is excluded from emission. Returns the new state
    /// (`true` = disabled). The name does not need to be present.
    pub fn toggle_disabled(&mut self, name: &str) -> bool {
        if self.disabled.remove(name) {
            false
        } else {
            self.disabled.insert(name.to_string());
            true
        }
    }

    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled.contains(name)
    }

    pub fn disabled(&self) -> impl Iterator<Item = &str> {
        self.disabled.iter().map(String::as_str)
    }

    pub fn push_positional(&mut self, token: impl Into<String>) -> &mut Self {
        self.positionals.push(token.into());
        self
    }

    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    pub fn clear_positionals(&mut self) {
        self.positionals.clear();
    }

    /// Parse `text` in this set's style and merge the result into the base
    /// map. Returns the number of entries taken from the text.
    pub fn hydrate(&mut self, text: &str) -> usize {
        let parsed = self.parse(text);
        let n = parsed.len();
        self.base.extend_from(&parsed);
        n
    }

    /// Parse `text` in this set's style without touching the set.
    pub fn parse(&self, text: &str) -> OptionMap {
        parse::parse(self.style, text)
    }

    /// Merged view of base and overlay, in emission order.
    ///
    /// Base names keep their position with the overlay value substituted;
    /// names only present in the overlay follow in overlay order.
    pub fn merged(&self) -> OptionMap {
        let mut merged = self.base.clone();
        if let Some(overlay) = &self.overlay {
            merged.extend_from(overlay);
        }
        merged
    }

    /// Render the set to the token vector handed to the encoder.
    pub fn emit(&self) -> Vec<String> {
        let mut tokens = Vec::new();

        for (name, value) in self.merged().iter() {
            if self.disabled.contains(name) {
                continue;
            }

            match (self.style, value.emission()) {
                (_, Emission::Skip) => {}
                (ArgStyle::Flag, Emission::Bare) => tokens.push(format!("-{name}")),
                (ArgStyle::Flag, Emission::Value(v)) => {
                    tokens.push(format!("-{name}"));
                    tokens.push(v);
                }
                (ArgStyle::Assignment, Emission::Bare) => tokens.push(name.to_string()),
                (ArgStyle::Assignment, Emission::Value(v)) => tokens.push(format!("{name}={v}")),
            }
        }

        tokens.extend(self.positionals.iter().cloned());
        tokens
    }

    /// Space-joined [`emit`](Self::emit).
    pub fn serialize(&self) -> String {
        self.emit().join(" ")
    }

    /// Comma-joined [`emit`](Self::emit), the form a filter option expects.
    pub fn filter_chain(&self) -> String {
        self.emit().join(",")
    }

    /// Names that currently produce tokens.
    pub fn effective_names(&self) -> Vec<String> {
        self.merged()
            .iter()
            .filter(|(name, value)| !self.disabled.contains(*name) && value.is_emitted())
            .map(|(name, _)| name.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_mode_emits_pairs_and_bare_flags() {
        let mut set = ArgumentSet::flags();
        set.set("rc", "vbr")
            .set("an", true)
            .set("lookahead", 4)
            .set("sn", false)
            .set("vf", OptionValue::Absent);

        assert_eq!(set.emit(), vec!["-rc", "vbr", "-an", "-lookahead", "4"]);
        assert_eq!(set.serialize(), "-rc vbr -an -lookahead 4");
    }

    #[test]
    fn assignment_mode_skips_disabled() {
        let mut set = ArgumentSet::assignments();
        set.set("rc", "vbr").set("an", true).set("lookahead", 4);
        set.toggle_disabled("an");

        assert_eq!(set.serialize(), "rc=vbr lookahead=4");
    }

    #[test]
    fn reenabling_restores_value() {
        let mut set = ArgumentSet::flags();
        set.set("preset", "slow");

        assert!(set.toggle_disabled("preset"));
        assert!(set.emit().is_empty());
        assert!(!set.toggle_disabled("preset"));
        assert_eq!(set.emit(), vec!["-preset", "slow"]);
    }

    #[test]
    fn toggling_unknown_name_is_harmless() {
        let mut set = ArgumentSet::flags();
        assert!(set.toggle_disabled("missing"));
        set.set("missing", "now");
        assert!(set.emit().is_empty());
    }

    #[test]
    fn empty_text_suppresses_flag() {
        let mut set = ArgumentSet::flags();
        set.set("metadata", "");
        assert!(set.emit().is_empty());
        assert_eq!(set.get("metadata"), Some(&OptionValue::Text(String::new())));
    }

    #[test]
    fn overlay_wins_and_appends() {
        let mut set = ArgumentSet::flags();
        set.set("c:v", "libx264").set("b:v", "4M");
        let set = set.with_overlay([("b:v", "2M"), ("an", "")].into_iter().collect::<OptionMap>());

        assert_eq!(set.emit(), vec!["-c:v", "libx264", "-b:v", "2M"]);
        assert_eq!(set.get("b:v"), Some(&OptionValue::Text("2M".into())));
    }

    #[test]
    fn disabled_applies_to_overlay_names() {
        let mut set = ArgumentSet::flags()
            .with_overlay([("ss", "00:00:05")].into_iter().collect::<OptionMap>());
        set.toggle_disabled("ss");
        assert!(set.emit().is_empty());
    }

    #[test]
    fn positionals_follow_options() {
        let mut set = ArgumentSet::flags();
        set.set("y", true).set("i", "in.mp4");
        set.push_positional("out.mp4");

        assert_eq!(set.emit(), vec!["-y", "-i", "in.mp4", "out.mp4"]);
    }

    #[test]
    fn filter_chain_joins_with_commas() {
        let mut set = ArgumentSet::assignments();
        set.set("scale", "1280:720").set("fps", 30);
        assert_eq!(set.filter_chain(), "scale=1280:720,fps=30");
    }

    #[test]
    fn hydrate_merges_parsed_text() {
        let mut set = ArgumentSet::flags();
        set.set("y", true);
        let n = set.hydrate("-c:v libx265 -an");

        assert_eq!(n, 2);
        assert_eq!(set.serialize(), "-y -c:v libx265 -an");
    }
}
