pub mod ini;
pub mod preset;

pub use ini::IniFile;
pub use preset::{
    load_comments, load_custom_tweaks, load_tweaks, next_preset_path, save_preset, LEGACY_HDR_SECTION,
};
