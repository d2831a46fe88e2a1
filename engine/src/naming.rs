use serde::Serialize;

use crate::forge::WeaponParts;
use crate::Roller;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NamePattern {
    DescriptorTypeOfEffect,
    MaterialType,
    EffectDescriptorType,
    TheDescriptorType,
    MaterialEffectType,
    HyphenatedEffectType,
    DescriptorMaterialType,
}

impl NamePattern {
    pub const ALL: [NamePattern; 7] = [
        NamePattern::DescriptorTypeOfEffect,
        NamePattern::MaterialType,
        NamePattern::EffectDescriptorType,
        NamePattern::TheDescriptorType,
        NamePattern::MaterialEffectType,
        NamePattern::HyphenatedEffectType,
        NamePattern::DescriptorMaterialType,
    ];

    pub fn render(self, parts: &WeaponParts) -> String {
        let WeaponParts { weapon_type, material, effect, descriptor } = parts;
        match self {
            NamePattern::DescriptorTypeOfEffect => format!(
                "{} {} of {}",
                title_case(descriptor),
                title_case(weapon_type),
                title_case(effect)
            ),
            NamePattern::MaterialType => {
                format!("{} {}", title_case(material), title_case(weapon_type))
            }
            NamePattern::EffectDescriptorType => {
                format!("{} {} {}", title_case(effect), descriptor, weapon_type)
            }
            NamePattern::TheDescriptorType => {
                format!("The {} {}", title_case(descriptor), title_case(weapon_type))
            }
            NamePattern::MaterialEffectType => format!(
                "{} {} {}",
                title_case(material),
                title_case(effect),
                title_case(weapon_type)
            ),
            NamePattern::HyphenatedEffectType => {
                format!("{}-{} {}", title_case(effect), descriptor, weapon_type)
            }
            NamePattern::DescriptorMaterialType => {
                format!("{} {} {}", title_case(descriptor), material, weapon_type)
            }
        }
    }
}

pub fn weapon_name(roller: &mut Roller, parts: &WeaponParts) -> String {
    let pattern = roller
        .pick(&NamePattern::ALL)
        .copied()
        .unwrap_or(NamePattern::MaterialType);
    pattern.render(parts)
}

/// Upper-case the first letter of each word, lower-case the rest. Words
/// break on whitespace and hyphens.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if at_word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.extend(ch.to_lowercase());
        }
        at_word_start = ch.is_whitespace() || ch == '-';
    }
    out
}
