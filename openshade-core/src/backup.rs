//! Pristine shader backup: copying, integrity checks, restoring, cache clearing.
//!
//! Tweaks are always applied to the backup copies, never to what is currently
//! live, so a stale or incomplete backup silently produces wrong shaders.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use md5::{Digest, Md5};

use crate::error::{Error, Result};
use crate::shaders::ShaderFile;
use crate::sim::SimPaths;

/// Digest list written next to the backed-up files, in `md5sum` format.
pub const MANIFEST_FILE: &str = "checksums.md5";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BackupCheck {
    pub missing: Vec<ShaderFile>,
}

impl BackupCheck {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn into_result(self, dir: &Path) -> Result<()> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(Error::BackupInvalid {
                dir: dir.to_path_buf(),
                missing: self.missing.iter().map(|f| f.file_name().to_string()).collect(),
            })
        }
    }
}

/// Which shader files are absent from `dir`.
pub fn check_backup(dir: &Path) -> BackupCheck {
    BackupCheck {
        missing: ShaderFile::ALL
            .iter()
            .copied()
            .filter(|f| !f.backup_path(dir).is_file())
            .collect(),
    }
}

pub fn md5_hex(bytes: &[u8]) -> String {
    hex::encode(Md5::digest(bytes))
}

fn file_md5(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(md5_hex(&bytes))
}

/// Record the digest of every backed-up file.
pub fn write_manifest(dir: &Path) -> Result<()> {
    let mut out = String::new();
    for file in ShaderFile::ALL {
        let digest = file_md5(&file.backup_path(dir))?;
        out.push_str(&format!("{}  {}\n", digest, file.file_name()));
    }
    let path = dir.join(MANIFEST_FILE);
    fs::write(&path, out).map_err(|e| Error::io(&path, e))
}

/// Digests keyed by file name. A backup without a manifest yields an empty map.
pub fn read_manifest(dir: &Path) -> Result<HashMap<String, String>> {
    let path = dir.join(MANIFEST_FILE);
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let text = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
    Ok(text
        .lines()
        .filter_map(|line| {
            let (digest, name) = line.trim().split_once(char::is_whitespace)?;
            let name = name.trim().trim_start_matches('*');
            Some((name.to_ascii_lowercase(), digest.to_ascii_lowercase()))
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashMismatch {
    pub file: ShaderFile,
    pub expected: String,
    pub actual: String,
}

/// Compare backed-up files with their recorded digests. Files the manifest
/// does not list are only checked for presence.
pub fn verify_hashes(dir: &Path) -> Result<Vec<HashMismatch>> {
    let known = read_manifest(dir)?;
    let mut mismatches = Vec::new();
    for file in ShaderFile::ALL {
        let Some(expected) = known.get(&file.file_name().to_ascii_lowercase()) else {
            continue;
        };
        let actual = file_md5(&file.backup_path(dir))?;
        if &actual != expected {
            mismatches.push(HashMismatch {
                file,
                expected: expected.clone(),
                actual,
            });
        }
    }
    Ok(mismatches)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyDirection {
    /// Live shader tree into the flat backup folder
    LiveToBackup,
    /// Flat backup folder into the live shader tree
    BackupToLive,
}

/// Copy every shader file between the live tree and the backup folder.
pub fn copy_shader_files(shader_dir: &Path, backup_dir: &Path, direction: CopyDirection) -> Result<()> {
    for file in ShaderFile::ALL {
        let live = file.live_path(shader_dir);
        let backup = file.backup_path(backup_dir);
        let (from, to) = match direction {
            CopyDirection::LiveToBackup => (live, backup),
            CopyDirection::BackupToLive => (backup, live),
        };
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::copy(&from, &to).map_err(|e| Error::io(&from, e))?;
        log::debug!("copied {} -> {}", from.display(), to.display());
    }
    Ok(())
}

fn shader_dir(paths: &SimPaths) -> Result<&PathBuf> {
    paths.shader_dir.as_ref().ok_or(Error::NoShaderDir)
}

/// Take a fresh backup of the live shaders and record their digests.
pub fn backup_shaders(paths: &SimPaths) -> Result<()> {
    let shaders = shader_dir(paths)?;
    fs::create_dir_all(&paths.backup_dir).map_err(|e| Error::io(&paths.backup_dir, e))?;
    copy_shader_files(shaders, &paths.backup_dir, CopyDirection::LiveToBackup)?;
    write_manifest(&paths.backup_dir)
}

/// Put the pristine backup back in place of the live shaders.
pub fn restore_shaders(paths: &SimPaths) -> Result<()> {
    let shaders = shader_dir(paths)?;
    check_backup(&paths.backup_dir).into_result(&paths.backup_dir)?;
    copy_shader_files(shaders, &paths.backup_dir, CopyDirection::BackupToLive)
}

/// Delete every file directly inside `dir`; sub-directories are left alone.
/// Returns how many files were removed.
pub fn clear_directory(dir: &Path) -> Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        if path.is_file() {
            fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
            removed += 1;
        }
    }
    Ok(removed)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionCheck {
    Unchanged,
    Changed { recorded: String, current: String },
    /// The running version could not be determined
    Unknown,
}

pub fn version_check(recorded: &str, current: Option<&str>) -> VersionCheck {
    match current {
        None => VersionCheck::Unknown,
        Some(c) if c.trim() == recorded.trim() => VersionCheck::Unchanged,
        Some(c) => VersionCheck::Changed {
            recorded: recorded.trim().to_string(),
            current: c.trim().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("PostProcess")).unwrap();
        for file in ShaderFile::ALL {
            fs::write(file.live_path(dir.path()), format!("// stock {}", file.file_name())).unwrap();
        }
        dir
    }

    fn paths(live: &Path, backup: &Path) -> SimPaths {
        SimPaths {
            sim_dir: live.parent().map(Path::to_path_buf),
            shader_dir: Some(live.to_path_buf()),
            cache_dir: None,
            backup_dir: backup.to_path_buf(),
        }
    }

    #[test]
    fn backup_flattens_post_process_and_writes_manifest() {
        let live = live_tree();
        let root = tempfile::tempdir().unwrap();
        let backup = root.path().join("Backup Shaders");
        backup_shaders(&paths(live.path(), &backup)).unwrap();

        assert!(check_backup(&backup).is_complete());
        assert!(backup.join("HDR.hlsl").is_file());
        assert!(verify_hashes(&backup).unwrap().is_empty());
        assert_eq!(read_manifest(&backup).unwrap().len(), ShaderFile::ALL.len());
    }

    #[test]
    fn tampered_backup_is_reported() {
        let live = live_tree();
        let backup = tempfile::tempdir().unwrap();
        backup_shaders(&paths(live.path(), backup.path())).unwrap();
        fs::write(backup.path().join("Cloud.fx"), "// patched").unwrap();

        let mismatches = verify_hashes(backup.path()).unwrap();
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].file, ShaderFile::Cloud);
        assert_eq!(mismatches[0].actual, md5_hex(b"// patched"));
    }

    #[test]
    fn backup_without_manifest_only_checks_presence() {
        let backup = tempfile::tempdir().unwrap();
        for file in ShaderFile::ALL {
            fs::write(file.backup_path(backup.path()), "x").unwrap();
        }
        assert!(verify_hashes(backup.path()).unwrap().is_empty());
    }

    #[test]
    fn check_lists_missing_files() {
        let backup = tempfile::tempdir().unwrap();
        fs::write(backup.path().join("General.fx"), "").unwrap();
        let check = check_backup(backup.path());
        assert_eq!(check.missing.len(), ShaderFile::ALL.len() - 1);
        assert!(!check.missing.contains(&ShaderFile::General));
        assert!(matches!(
            check.into_result(backup.path()),
            Err(Error::BackupInvalid { .. })
        ));
    }

    #[test]
    fn restore_overwrites_live_files() {
        let live = live_tree();
        let backup = tempfile::tempdir().unwrap();
        let p = paths(live.path(), backup.path());
        backup_shaders(&p).unwrap();
        fs::write(live.path().join("PostProcess/HDR.hlsl"), "// tweaked").unwrap();

        restore_shaders(&p).unwrap();
        let hdr = fs::read_to_string(live.path().join("PostProcess/HDR.hlsl")).unwrap();
        assert_eq!(hdr, "// stock HDR.hlsl");
    }

    #[test]
    fn restore_refuses_incomplete_backup() {
        let live = live_tree();
        let backup = tempfile::tempdir().unwrap();
        assert!(restore_shaders(&paths(live.path(), backup.path())).is_err());
    }

    #[test]
    fn clear_directory_keeps_subdirectories() {
        let cache = tempfile::tempdir().unwrap();
        fs::write(cache.path().join("a.cso"), "").unwrap();
        fs::write(cache.path().join("b.cso"), "").unwrap();
        fs::create_dir(cache.path().join("keep")).unwrap();
        assert_eq!(clear_directory(cache.path()).unwrap(), 2);
        assert!(cache.path().join("keep").is_dir());
        assert!(clear_directory(&cache.path().join("gone")).is_err());
    }

    #[test]
    fn version_check_variants() {
        assert_eq!(version_check("5.3", Some("5.3 ")), VersionCheck::Unchanged);
        assert_eq!(version_check("5.3", None), VersionCheck::Unknown);
        assert_eq!(
            version_check("5.3", Some("5.4")),
            VersionCheck::Changed {
                recorded: "5.3".into(),
                current: "5.4".into()
            }
        );
    }
}
