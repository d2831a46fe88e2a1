use std::fs;

use armory::mesh::{cache_key, CachedMesher, MeshGenerator, MeshKind, MeshSettings, ProceduralMesher};
use chrono::{TimeZone, Utc};

#[test]
fn procedural_obj_has_header_and_geometry() {
    let mesher = ProceduralMesher::new(MeshSettings::default());
    let stamp = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
    let obj = mesher.render_obj("A silent dagger", MeshKind::Dagger, stamp);
    assert!(obj.starts_with("# Armory Weapon Model\n# Description: A silent dagger\n# Weapon Type: dagger\n# Generated: 2025-01-02 03:04:05\n"));
    assert!(obj.lines().any(|l| l.starts_with("v ")));
    assert!(obj.lines().any(|l| l.starts_with("f ")));
}

#[test]
fn generate_writes_kind_specific_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("w.obj");
    let mut mesher = ProceduralMesher::new(MeshSettings::default());
    let outcome = mesher.generate("A holy mace of blessed steel", &path).unwrap();
    assert_eq!(outcome.kind, MeshKind::Mace);
    assert!(!outcome.cached);
    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.len() as u64, outcome.bytes);
    assert!(text.contains("# Weapon Type: mace"));
}

#[test]
fn cache_hit_copies_previous_mesh() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("cache");
    let mut mesher = CachedMesher::new(ProceduralMesher::new(MeshSettings::default()), &cache);

    let first = dir.path().join("out/a.obj");
    let second = dir.path().join("out/nested/b.obj");
    let a = mesher.generate("A storm rod", &first).unwrap();
    let b = mesher.generate("A storm rod", &second).unwrap();

    assert!(!a.cached);
    assert!(b.cached);
    assert_eq!(b.kind, MeshKind::Staff);
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());

    assert_eq!(mesher.clear().unwrap(), 1);
    assert_eq!(mesher.clear().unwrap(), 0);
}

#[test]
fn writing_onto_the_cache_file_keeps_it_intact() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("cache");
    let mut mesher = CachedMesher::new(ProceduralMesher::new(MeshSettings::default()), &cache);

    mesher.generate("A sturdy shield", &dir.path().join("s.obj")).unwrap();
    let cached = cache.join(format!("{}.obj", cache_key("A sturdy shield")));
    let before = fs::read(&cached).unwrap();
    assert!(!before.is_empty());

    let outcome = mesher.generate("A sturdy shield", &cached).unwrap();
    assert!(outcome.cached);
    assert_eq!(outcome.bytes, before.len() as u64);
    assert_eq!(fs::read(&cached).unwrap(), before);
}
