use armory::describe::TemplateWriter;
use armory::{BatchRequest, ForgeError, PresetTable, Roller, WeaponForge};
use chrono::{TimeZone, Utc};

fn forge(seed: u64) -> WeaponForge {
    WeaponForge::new(
        PresetTable::builtin().unwrap(),
        Box::new(TemplateWriter::builtin().unwrap()),
        Roller::from_seed(seed),
    )
    .with_output("out", "obj")
}

#[test]
fn batch_splits_weapons_between_players() {
    let stamp = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    let request = BatchRequest::new("aggressive_warrior", "strategic_mage", "volcanic");
    let weapons = forge(1).forge_batch(&request, stamp).unwrap();

    assert_eq!(weapons.len(), 4);
    let players: Vec<u8> = weapons.iter().map(|w| w.player).collect();
    assert_eq!(players, vec![1, 1, 2, 2]);
    assert_eq!(weapons[0].personality, "aggressive_warrior");
    assert_eq!(weapons[3].personality, "strategic_mage");

    let presets = PresetTable::builtin().unwrap();
    let mage = presets.get("strategic_mage").unwrap();
    assert!(mage.weapon_types.contains(&weapons[2].weapon_type));
    assert!(mage.materials.contains(&weapons[2].material));

    for (i, w) in weapons.iter().enumerate() {
        let name = format!("weapon_{}_{}.obj", stamp.timestamp(), i);
        assert!(w.file_location.ends_with(&name));
        assert_eq!(w.web_path, format!("/download/weapon/{}", name));
        assert_eq!(w.arena_theme, "volcanic");
        assert_eq!(w.generated_at, Some(stamp));
        assert!(w.rarity.is_some());
        assert!(!w.description.is_empty());
    }
}

#[test]
fn same_seed_same_batch() {
    let stamp = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    let request = BatchRequest::new("agile_assassin", "elemental_mage", "shadow");
    let a = forge(42).forge_batch(&request, stamp).unwrap();
    let b = forge(42).forge_batch(&request, stamp).unwrap();
    assert_eq!(a, b);
}

#[test]
fn odd_batch_gives_player_one_the_extra_weapon() {
    let stamp = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    let request = BatchRequest::new("aggressive_warrior", "defensive_guardian", "ice");
    let weapons = forge(3).with_batch_size(5).forge_batch(&request, stamp).unwrap();
    let p1 = weapons.iter().filter(|w| w.player == 1).count();
    assert_eq!((p1, weapons.len() - p1), (3, 2));
}

#[test]
fn unknown_personality_samples_default_but_keeps_requested_name() {
    let stamp = Utc::now();
    let request = BatchRequest::new("mysterious_bard", "mysterious_bard", "medieval");
    let weapons = forge(5).forge_batch(&request, stamp).unwrap();
    let presets = PresetTable::builtin().unwrap();
    let warrior = presets.get("aggressive_warrior").unwrap();
    for w in &weapons {
        assert_eq!(w.personality, "mysterious_bard");
        assert!(warrior.weapon_types.contains(&w.weapon_type));
    }
}

#[test]
fn empty_personality_is_rejected() {
    let request = BatchRequest::new("", "strategic_mage", "medieval");
    let err = forge(1).forge_batch(&request, Utc::now()).unwrap_err();
    assert!(matches!(err, ForgeError::InvalidRequest(_)));
}

#[test]
fn record_uses_wire_field_names() {
    let request = BatchRequest::new("strategic_mage", "strategic_mage", "forest");
    let weapons = forge(8).forge_batch(&request, Utc::now()).unwrap();
    let json = serde_json::to_value(&weapons[0]).unwrap();
    for key in ["weaponName", "fileLocation", "webPath", "generatedAt", "weapon_type", "arena_theme"] {
        assert!(json.get(key).is_some(), "missing {}", key);
    }
}

#[test]
fn request_defaults_arena_to_medieval() {
    let request: BatchRequest = serde_json::from_str(
        r#"{"player1_personality":"strategic_mage","player2_personality":"agile_assassin"}"#,
    )
    .unwrap();
    assert_eq!(request.arena_theme, "medieval");
}
