use std::collections::HashMap;

pub fn builtin_personalities() -> &'static str {
    include_str!("../content/personalities.json")
}

pub fn builtin_arenas() -> &'static str {
    include_str!("../content/arenas.json")
}

pub fn builtin_meshes() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("sword", include_str!("../content/meshes/sword.obj")),
        ("axe", include_str!("../content/meshes/axe.obj")),
        ("staff", include_str!("../content/meshes/staff.obj")),
        ("dagger", include_str!("../content/meshes/dagger.obj")),
        ("mace", include_str!("../content/meshes/mace.obj")),
        ("shield", include_str!("../content/meshes/shield.obj")),
        ("orb", include_str!("../content/meshes/orb.obj")),
        ("wand", include_str!("../content/meshes/wand.obj")),
    ])
}
