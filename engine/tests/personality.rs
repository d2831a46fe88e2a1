use std::fs;

use armory::personality::DEFAULT_PERSONALITY;
use armory::{ForgeError, PersonalityPreset, PresetTable};

fn preset(modifier: f64) -> PersonalityPreset {
    PersonalityPreset {
        weapon_types: vec!["spear".into()],
        materials: vec!["bronze".into()],
        effects: vec!["thunder".into()],
        descriptors: vec!["gleaming".into()],
        damage_modifier: modifier,
        speed_modifier: 1.0,
    }
}

#[test]
fn builtin_table_keeps_declaration_order() {
    let table = PresetTable::builtin().unwrap();
    assert_eq!(
        table.names(),
        vec![
            "aggressive_warrior",
            "strategic_mage",
            "defensive_guardian",
            "agile_assassin",
            "elemental_mage"
        ]
    );
    let mage = table.get("strategic_mage").unwrap();
    assert_eq!(mage.damage_modifier, 0.9);
    assert_eq!(mage.speed_modifier, 1.3);
}

#[test]
fn unknown_personality_resolves_to_default() {
    let table = PresetTable::builtin().unwrap();
    let fallback = table.resolve("pacifist_bard").unwrap();
    assert_eq!(fallback, table.get(DEFAULT_PERSONALITY).unwrap());
    assert!(table.get("pacifist_bard").is_none());
}

#[test]
fn components_of_unknown_personality_are_empty() {
    let table = PresetTable::builtin().unwrap();
    assert!(table.components("nobody").weapon_types.is_empty());
    let guardian = table.components("defensive_guardian");
    assert!(guardian.weapon_types.contains(&"tower shield".to_string()));
}

#[test]
fn insert_validates_presets() {
    let mut table = PresetTable::builtin().unwrap();
    let err = table.insert("broken", preset(0.0)).unwrap_err();
    assert!(matches!(err, ForgeError::InvalidPreset { .. }));

    let mut empty = preset(1.0);
    empty.materials.clear();
    assert!(table.insert("empty", empty).is_err());

    table.insert("spearman", preset(1.1)).unwrap();
    assert_eq!(table.names().last().map(String::as_str), Some("spearman"));
}

#[test]
fn overrides_merge_over_builtins() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("personalities.yaml");
    fs::write(
        &path,
        r#"
strategic_mage:
  weapon_types: [grimoire]
  materials: [vellum]
  effects: [ink]
  descriptors: [dusty]
  damage_modifier: 0.5
  speed_modifier: 2.0
storm_caller:
  weapon_types: [trident]
  materials: [coral]
  effects: [storm]
  descriptors: [roaring]
  damage_modifier: 1.1
  speed_modifier: 1.0
"#,
    )
    .unwrap();

    let mut table = PresetTable::builtin().unwrap();
    assert_eq!(table.load_overrides(&path).unwrap(), 2);
    assert_eq!(table.len(), 6);
    assert_eq!(table.get("strategic_mage").unwrap().weapon_types, vec!["grimoire"]);
    assert!(table.get("storm_caller").is_some());
}

#[test]
fn missing_override_file_is_ignored_and_bad_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let mut table = PresetTable::builtin().unwrap();
    assert_eq!(table.load_overrides(&dir.path().join("absent.json")).unwrap(), 0);

    let bad = dir.path().join("bad.json");
    fs::write(&bad, "{ not json").unwrap();
    assert!(matches!(table.load_overrides(&bad), Err(ForgeError::Json(_))));
    assert_eq!(table.len(), 5);
}
