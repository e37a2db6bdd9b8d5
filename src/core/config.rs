use serde::Deserialize;

/// Caller-supplied configuration (§6 of the external interface). The core itself never parses
/// `argv`; a demonstration binary or any other embedder is responsible for producing one of
/// these, by whatever means it likes (CLI flags, a config file, a hardcoded test fixture).
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to the cartridge ROM image. Required.
    pub rom_path: String,

    /// Path to a 256-byte boot ROM image. When present and exactly 256 bytes, the machine starts
    /// with the boot overlay active instead of the post-boot register/memory state.
    pub boot_rom_path: Option<String>,

    /// Path to the save-RAM file. When absent, the core derives `<rom_path>.save`.
    pub save_path: Option<String>,

    /// Disable save-RAM persistence entirely: no load on insertion, no store on shutdown.
    #[serde(default)]
    pub no_save: bool,
}

impl Config {
    pub fn new(rom_path: impl Into<String>) -> Self {
        Self {
            rom_path: rom_path.into(),
            boot_rom_path: None,
            save_path: None,
            no_save: false,
        }
    }

    /// The save-file path to use: the caller's override, or `<rom_path>.save` derived per §6.
    pub fn effective_save_path(&self) -> String {
        match &self.save_path {
            Some(path) => path.clone(),
            None => format!("{}.save", self.rom_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_save_path_from_rom_path() {
        let config = Config::new("/roms/tetris.gb");
        assert_eq!(config.effective_save_path(), "/roms/tetris.gb.save");
    }

    #[test]
    fn explicit_save_path_wins() {
        let mut config = Config::new("/roms/tetris.gb");
        config.save_path = Some("/saves/tetris.sav".to_string());
        assert_eq!(config.effective_save_path(), "/saves/tetris.sav");
    }
}
