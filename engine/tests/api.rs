use std::path::Path;

use armory::api::{generate_weapons, Armory, GenerateConfig};
use armory::config::ForgeConfig;
use armory::llm::LlmConfig;
use armory::mesh::MeshKind;
use armory::{BatchRequest, PersonalityPreset, WeaponRecord};

fn test_config(root: &Path) -> ForgeConfig {
    ForgeConfig {
        output_dir: root.join("weapons"),
        cache_dir: root.join("cache"),
        personalities_path: None,
        seed: Some(7),
        ..ForgeConfig::default()
    }
}

#[test]
fn generate_updates_running_stats() {
    let dir = tempfile::tempdir().unwrap();
    let mut armory = Armory::from_config(test_config(dir.path())).unwrap();

    let report = armory
        .generate(&BatchRequest::new("aggressive_warrior", "defensive_guardian", "volcanic"))
        .unwrap();
    assert_eq!(report.weapons.len(), 4);
    assert_eq!(report.arena_theme, "volcanic");
    assert!(report.models.is_none());

    armory
        .generate(&BatchRequest::new("agile_assassin", "agile_assassin", "shadow"))
        .unwrap();

    let stats = armory.stats();
    assert_eq!(stats.total_generated, 8);
    assert_eq!(stats.successful_generations, 2);
    assert_eq!(stats.personality_counts["agile_assassin"], 4);
    assert_eq!(stats.personality_counts["aggressive_warrior"], 2);
    assert_eq!(stats.arena_theme_counts["volcanic"], 1);
    assert!(stats.last_generation.is_some());
}

#[test]
fn create_model_detects_kind_and_caches() {
    let dir = tempfile::tempdir().unwrap();
    let mut armory = Armory::from_config(test_config(dir.path())).unwrap();

    let first_path = dir.path().join("weapons").join("mace_a.obj");
    let first = armory
        .create_model("A holy mace of blessed steel", Some(&first_path))
        .unwrap();
    assert_eq!(first.status, "completed");
    assert_eq!(first.kind, MeshKind::Mace);
    assert!(!first.cached);
    assert_eq!(first.web_path, "/download/weapon/mace_a.obj");

    let second_path = dir.path().join("weapons").join("mace_b.obj");
    let second = armory
        .create_model("A holy mace of blessed steel", Some(&second_path))
        .unwrap();
    assert!(second.cached);
    assert!(second_path.is_file());

    assert!(armory.create_model("   ", None).is_err());
    assert_eq!(armory.clear_cache().unwrap(), 1);
}

#[test]
fn batch_create_reports_failures_without_stopping() {
    let dir = tempfile::tempdir().unwrap();
    let mut armory = Armory::from_config(test_config(dir.path())).unwrap();

    let good = WeaponRecord {
        weapon_name: "Storm Rod".into(),
        description: "A storm rod".into(),
        file_location: dir.path().join("weapons").join("rod.obj").to_string_lossy().into_owned(),
        web_path: "/download/weapon/rod.obj".into(),
        ..WeaponRecord::default()
    };
    let missing = WeaponRecord {
        description: "A nameless blade".into(),
        ..WeaponRecord::default()
    };

    let report = armory.batch_create(&[good, missing]);
    assert_eq!(report.summary.total, 2);
    assert_eq!(report.summary.successful, 1);
    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.results[0].status, "completed");
    assert_eq!(report.results[1].weapon_name, "Weapon_1");
    assert!(report.results[1].error.is_some());

    let listed = armory.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].filename, "rod.obj");

    let stats = armory.stats_report().unwrap();
    assert_eq!(stats.file_stats.total_files, 1);
    assert_eq!(stats.system_stats.mesh_backend, "procedural");
    assert_eq!(stats.system_stats.text_backend, "template");
    assert_eq!(stats.system_stats.personalities, 5);

    armory.delete("rod").unwrap();
    assert!(armory.list().unwrap().is_empty());
}

#[test]
fn generate_with_models_writes_every_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut armory = Armory::from_config(test_config(dir.path())).unwrap();

    let report = armory
        .generate_with_models(&BatchRequest::new("strategic_mage", "elemental_mage", "ice"))
        .unwrap();
    let models = report.models.unwrap();
    assert_eq!(models.summary.successful, 4);
    assert!(report.weapons.iter().all(|w| Path::new(&w.file_location).is_file()));

    let bundle = armory.bundle().unwrap();
    assert!(bundle.is_file());
}

#[test]
fn personalities_can_be_added_at_runtime() {
    let dir = tempfile::tempdir().unwrap();
    let mut armory = Armory::from_config(test_config(dir.path())).unwrap();

    let preset = PersonalityPreset {
        weapon_types: vec!["lute".into()],
        materials: vec!["maple".into()],
        effects: vec!["sonic".into()],
        descriptors: vec!["rousing".into()],
        damage_modifier: 0.7,
        speed_modifier: 1.1,
    };
    armory.add_personality("wandering_bard", preset).unwrap();
    assert!(armory.personalities().contains(&"wandering_bard".to_string()));
    assert_eq!(armory.components("wandering_bard").weapon_types, vec!["lute"]);

    let report = armory
        .generate(&BatchRequest::new("wandering_bard", "wandering_bard", "forest"))
        .unwrap();
    assert!(report.weapons.iter().all(|w| w.weapon_type == "lute"));
}

#[test]
fn jobs_run_through_the_armory() {
    let dir = tempfile::tempdir().unwrap();
    let mut armory = Armory::from_config(test_config(dir.path())).unwrap();

    let id = armory.submit_job(BatchRequest::new("agile_assassin", "strategic_mage", "desert"));
    let status = armory.run_job(&id).unwrap();
    assert_eq!(status.progress, 100);
    assert_eq!(armory.job_status(&id).unwrap().progress, 100);

    let cleanup = armory.cleanup_job(&id).unwrap();
    assert_eq!(cleanup.deleted_files.len(), 4);
    assert!(armory.job_status(&id).is_err());
}

#[test]
fn one_shot_generation_is_seeded() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = || GenerateConfig {
        player1_personality: "defensive_guardian".into(),
        player2_personality: "elemental_mage".into(),
        arena_theme: None,
        seed: Some(99),
        with_models: false,
        config: Some(test_config(dir.path())),
    };

    let a = generate_weapons(cfg()).unwrap();
    let b = generate_weapons(cfg()).unwrap();
    assert_eq!(a.arena_theme, "medieval");
    let names = |r: &armory::api::GenerateReport| {
        r.weapons.iter().map(|w| w.weapon_name.clone()).collect::<Vec<_>>()
    };
    assert_eq!(names(&a), names(&b));
}

#[test]
fn invalid_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.max_weapons_per_request = 0;
    assert!(Armory::from_config(config).is_err());
}

#[test]
fn health_reflects_text_model_reachability() {
    let dir = tempfile::tempdir().unwrap();
    let armory = Armory::from_config(test_config(dir.path())).unwrap();
    let health = armory.health();
    assert_eq!(health.status, "healthy");
    assert!(health.models_loaded);
    assert_eq!(health.text_backend, "template");

    let mut config = test_config(dir.path());
    config.llm = Some(LlmConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_secs: 1,
        ..LlmConfig::default()
    });
    let armory = Armory::from_config(config).unwrap();
    let health = armory.health();
    assert_eq!(health.text_backend, "llm");
    assert!(!health.models_loaded);
    assert_eq!(health.status, "initializing");
}

#[test]
fn empty_output_path_uses_default_location() {
    let dir = tempfile::tempdir().unwrap();
    let mut armory = Armory::from_config(test_config(dir.path())).unwrap();
    let report = armory
        .create_model("A steel sword", Some(Path::new("")))
        .unwrap();
    let written = Path::new(&report.model_path);
    assert!(written.is_file());
    assert_eq!(written.parent(), Some(dir.path().join("weapons").as_path()));
    assert!(report.web_path.starts_with("/download/weapon/weapon_"));
}
