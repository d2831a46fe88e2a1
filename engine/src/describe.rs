//! Flavor text for generated weapons.
//!
//! [`TemplateWriter`] is always available. The external text model in
//! [`crate::llm`] wraps it and falls back to it whenever the model is
//! unreachable or returns unusable text.

use crate::arena::ArenaTable;
use crate::forge::WeaponParts;
use crate::{Result, Roller};

const TEMPLATE_COUNT: usize = 8;

pub trait DescriptionWriter: Send {
    fn describe(&mut self, roller: &mut Roller, parts: &WeaponParts, arena_theme: &str) -> String;

    fn backend(&self) -> &'static str;

    /// Whether the backing model answers right now.
    fn is_available(&self) -> bool {
        true
    }
}

pub struct TemplateWriter {
    arenas: ArenaTable,
}

impl TemplateWriter {
    pub fn new(arenas: ArenaTable) -> Self {
        Self { arenas }
    }

    pub fn builtin() -> Result<Self> {
        Ok(Self::new(ArenaTable::builtin()?))
    }

    pub fn render(&self, template: usize, parts: &WeaponParts, theme: &str, element: &str) -> String {
        let WeaponParts { weapon_type, material, effect, descriptor } = parts;
        match template % TEMPLATE_COUNT {
            0 => format!(
                "A {descriptor} {weapon_type} forged from {material}, crackling with {effect} energy and infused with {element}."
            ),
            1 => format!(
                "This {material} {weapon_type} radiates {effect} power, its {descriptor} form designed for devastating attacks in {theme} combat."
            ),
            2 => format!(
                "Crafted from finest {material}, this {descriptor} {weapon_type} channels {effect} forces and draws strength from {element}."
            ),
            3 => format!(
                "A legendary {weapon_type} of {material} construction, imbued with {effect} magic and empowered by {element}."
            ),
            4 => format!(
                "The {descriptor} surface of this {material} {weapon_type} glows with {effect} energy, enhanced by the power of {element}."
            ),
            5 => format!(
                "Forged in the heart of {theme} lands, this {descriptor} {weapon_type} combines {material} with {effect} magic."
            ),
            6 => format!(
                "A {descriptor} {weapon_type} that pulses with {effect} energy, its {material} core resonating with {element}."
            ),
            _ => format!(
                "This ancient {weapon_type} of {material} bears the mark of {effect} magic and the essence of {element}."
            ),
        }
    }
}

impl DescriptionWriter for TemplateWriter {
    fn describe(&mut self, roller: &mut Roller, parts: &WeaponParts, arena_theme: &str) -> String {
        let element = roller
            .pick(self.arenas.elements(arena_theme))
            .map(String::as_str)
            .unwrap_or("old magic");
        let template = roller.range_inclusive(0, TEMPLATE_COUNT as i32 - 1) as usize;
        self.render(template, parts, arena_theme, element)
    }

    fn backend(&self) -> &'static str {
        "template"
    }
}

/// Clean raw model output into one presentable sentence. `None` means the
/// text is too short to use.
pub fn tidy_generated(raw: &str) -> Option<String> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    let first = text.split('.').next().unwrap_or_default();
    let mut sentence = if first.chars().count() > 10 {
        format!("{}.", first)
    } else {
        let head: String = text.chars().take(120).collect();
        format!("{}...", head)
    };
    if let Some(c) = sentence.chars().next() {
        if !c.is_uppercase() {
            let rest = sentence[c.len_utf8()..].to_string();
            sentence = c.to_uppercase().chain(rest.chars()).collect();
        }
    }
    if sentence.chars().count() > 20 {
        Some(sentence)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tidy_keeps_first_sentence_and_capitalises() {
        let out = tidy_generated("  was forged by the storm giants of old. It hums.").unwrap();
        assert_eq!(out, "Was forged by the storm giants of old.");
    }

    #[test]
    fn tidy_truncates_when_first_sentence_is_short() {
        let raw = format!("ok. {}", "x".repeat(200));
        let out = tidy_generated(&raw).unwrap();
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 123);
        assert!(out.starts_with("Ok."));
    }

    #[test]
    fn tidy_rejects_short_text() {
        assert_eq!(tidy_generated(""), None);
        assert_eq!(tidy_generated("it glows brightly."), None);
    }
}
