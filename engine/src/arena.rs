use indexmap::IndexMap;

use crate::content::builtin_arenas;
use crate::Result;

pub const DEFAULT_ARENA: &str = "medieval";

/// Flavor elements per arena theme.
#[derive(Debug, Clone, Default)]
pub struct ArenaTable {
    themes: IndexMap<String, Vec<String>>,
}

impl ArenaTable {
    pub fn builtin() -> Result<Self> {
        let themes: IndexMap<String, Vec<String>> = serde_json::from_str(builtin_arenas())?;
        Ok(Self { themes })
    }

    /// Elements for `theme`, falling back to the medieval set.
    pub fn elements(&self, theme: &str) -> &[String] {
        self.themes
            .get(theme)
            .or_else(|| self.themes.get(DEFAULT_ARENA))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_known(&self, theme: &str) -> bool {
        self.themes.contains_key(theme)
    }

    pub fn themes(&self) -> Vec<String> {
        self.themes.keys().cloned().collect()
    }
}
