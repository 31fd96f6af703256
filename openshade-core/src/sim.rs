//! Where the simulator, its shaders, its shader cache and our backup live.

use std::fs;
use std::path::{Path, PathBuf};

use crate::activity::ActivityLog;
use crate::config::Settings;

pub const SIM_DIR_ENV: &str = "OPENSHADE_P3D_DIR";
pub const SIM_VERSION_ENV: &str = "OPENSHADE_P3D_VERSION";
pub const SHADER_SUBDIR: &str = "ShadersHLSL";
pub const DEFAULT_BACKUP_DIR: &str = "Backup Shaders";
/// Plain-text version file looked up in the simulator directory.
pub const VERSION_FILE: &str = "version.txt";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimPaths {
    pub sim_dir: Option<PathBuf>,
    pub shader_dir: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub backup_dir: PathBuf,
}

/// Registry values come back with trailing NULs; settings files copied from
/// them sometimes do too.
fn trim_nul(s: &str) -> &str {
    match s.find('\0') {
        Some(i) => &s[..i],
        None => s,
    }
}

fn default_cache_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("Lockheed Martin").join("Prepar3D v5").join("Shaders"))
}

impl SimPaths {
    /// Resolve paths from, in order: explicit override, environment, settings.
    pub fn resolve(settings: &Settings, sim_override: Option<&Path>, base_dir: &Path) -> Self {
        let sim_dir = sim_override
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(SIM_DIR_ENV).ok().map(|v| PathBuf::from(trim_nul(&v))))
            .or_else(|| {
                settings
                    .sim_dir
                    .as_ref()
                    .map(|p| PathBuf::from(trim_nul(&p.to_string_lossy())))
            })
            .filter(|p| !p.as_os_str().is_empty());

        let shader_dir = sim_dir.as_ref().map(|d| d.join(SHADER_SUBDIR));
        let cache_dir = settings.shader_cache.clone().or_else(default_cache_dir);
        let backup_dir = settings
            .backup_dir
            .clone()
            .unwrap_or_else(|| base_dir.join(DEFAULT_BACKUP_DIR));

        Self {
            sim_dir,
            shader_dir,
            cache_dir,
            backup_dir,
        }
    }

    /// Log what is missing. Returns true when the simulator side is usable.
    pub fn validate(&self, log: &mut ActivityLog) -> bool {
        let Some(ref sim) = self.sim_dir else {
            log.error(format!("Prepar3D v5 path not found, set {} or P3D_Directory", SIM_DIR_ENV));
            return false;
        };
        if !sim.is_dir() {
            log.error(format!("Prepar3D v5 path not found: {}", sim.display()));
            return false;
        }
        match self.shader_dir {
            Some(ref d) if d.is_dir() => {}
            _ => {
                log.error("P3D shader directory not found!");
                return false;
            }
        }
        match self.cache_dir {
            Some(ref d) if d.is_dir() => {}
            _ => {
                log.error("Shader cache directory not found, please launch P3D first!");
                return false;
            }
        }
        true
    }
}

/// Version of the installed simulator, if it can be determined.
pub fn current_version(sim_dir: Option<&Path>, version_override: Option<&str>) -> Option<String> {
    if let Some(v) = version_override {
        return Some(v.trim().to_string());
    }
    if let Ok(v) = std::env::var(SIM_VERSION_ENV) {
        if !v.trim().is_empty() {
            return Some(v.trim().to_string());
        }
    }
    let path = sim_dir?.join(VERSION_FILE);
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_registry_nul() {
        assert_eq!(trim_nul("C:\\P3D\\\0\0"), "C:\\P3D\\");
        assert_eq!(trim_nul("plain"), "plain");
    }

    #[test]
    fn explicit_override_wins() {
        let settings = Settings {
            sim_dir: Some(PathBuf::from("/from/settings")),
            backup_dir: Some(PathBuf::from("/backup")),
            shader_cache: Some(PathBuf::from("/cache")),
            ..Settings::default()
        };
        let paths = SimPaths::resolve(&settings, Some(Path::new("/flag")), Path::new("/app"));
        assert_eq!(paths.sim_dir, Some(PathBuf::from("/flag")));
        assert_eq!(paths.shader_dir, Some(PathBuf::from("/flag/ShadersHLSL")));
        assert_eq!(paths.cache_dir, Some(PathBuf::from("/cache")));
        assert_eq!(paths.backup_dir, PathBuf::from("/backup"));
    }

    #[test]
    fn backup_defaults_next_to_app() {
        let paths = SimPaths::resolve(&Settings::default(), Some(Path::new("/sim")), Path::new("/app"));
        assert_eq!(paths.backup_dir, PathBuf::from("/app/Backup Shaders"));
    }

    #[test]
    fn validate_reports_missing_cache() {
        let sim = tempfile::tempdir().unwrap();
        std::fs::create_dir(sim.path().join(SHADER_SUBDIR)).unwrap();
        let paths = SimPaths {
            sim_dir: Some(sim.path().to_path_buf()),
            shader_dir: Some(sim.path().join(SHADER_SUBDIR)),
            cache_dir: Some(sim.path().join("no-cache")),
            backup_dir: sim.path().join("backup"),
        };
        let mut log = ActivityLog::new();
        assert!(!paths.validate(&mut log));
        assert!(log.last().unwrap().message.contains("launch P3D first"));
    }

    #[test]
    fn version_from_override_or_file() {
        assert_eq!(current_version(None, Some(" 5.4.1 ")), Some("5.4.1".to_string()));
        let sim = tempfile::tempdir().unwrap();
        std::fs::write(sim.path().join(VERSION_FILE), "5.3.17.28160\n").unwrap();
        assert_eq!(
            current_version(Some(sim.path()), Some("5.4")),
            Some("5.4".to_string())
        );
    }
}
