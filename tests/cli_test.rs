use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use openshade_core::ShaderFile;

/// A fake Prepar3D install with stock shaders, a shader cache and an app
/// folder holding the settings file.
struct Sandbox {
    root: tempfile::TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        let s = Self { root };
        fs::create_dir_all(s.shaders().join("PostProcess")).unwrap();
        fs::create_dir_all(s.cache()).unwrap();
        fs::create_dir_all(s.app()).unwrap();
        for file in ShaderFile::ALL {
            fs::write(file.live_path(&s.shaders()), stock(file)).unwrap();
        }
        fs::write(
            s.config(),
            format!("Shader_Cache, {}\n", s.cache().display()),
        )
        .unwrap();
        s
    }

    fn sim(&self) -> PathBuf {
        self.root.path().join("sim")
    }

    fn shaders(&self) -> PathBuf {
        self.sim().join("ShadersHLSL")
    }

    fn cache(&self) -> PathBuf {
        self.root.path().join("cache")
    }

    fn app(&self) -> PathBuf {
        self.root.path().join("app")
    }

    fn config(&self) -> PathBuf {
        self.app().join("config.txt")
    }

    fn backup_dir(&self) -> PathBuf {
        self.app().join("Backup Shaders")
    }

    fn run(&self, args: &[&str]) -> Output {
        self.run_as("5.4.9.28482", args)
    }

    /// Run against a simulator reporting `version`.
    fn run_as(&self, version: &str, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_openshade"))
            .args(args)
            .arg("--config")
            .arg(self.config())
            .arg("--sim-dir")
            .arg(self.sim())
            .arg("--sim-version")
            .arg(version)
            .env("XDG_DATA_HOME", self.root.path().join("data"))
            .env("XDG_CONFIG_HOME", self.root.path().join("xdg"))
            .output()
            .expect("failed to run openshade")
    }
}

fn stock(file: ShaderFile) -> String {
    format!("// stock {}\n", file.file_name())
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_default()
}

#[test]
fn list_json_contains_catalog() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["list", "--json"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid json");
    let tweaks = value["tweaks"].as_array().expect("tweaks array");
    assert!(!tweaks.is_empty());
    assert!(tweaks.iter().all(|t| t["is_enabled"] == false));
    assert_eq!(value["custom_tweaks"].as_array().map(Vec::len), Some(0));
}

#[test]
fn check_fails_without_backup() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["check"]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("missing:"));
}

#[test]
fn backup_then_check_hashes() {
    let sandbox = Sandbox::new();
    assert!(sandbox.run(&["backup", "--yes"]).status.success());

    for file in ShaderFile::ALL {
        assert_eq!(read(&file.backup_path(&sandbox.backup_dir())), stock(file));
    }
    assert!(read(&sandbox.config()).contains("P3D_Version, 5.4.9.28482"));

    let output = sandbox.run(&["check", "--hashes"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("is complete"));

    fs::write(ShaderFile::Cloud.backup_path(&sandbox.backup_dir()), "// edited\n").unwrap();
    let output = sandbox.run(&["check", "--hashes"]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("modified: Cloud.fx"));
}

#[test]
fn apply_requires_backup() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["apply"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No shader backup"));
}

#[test]
fn apply_rebuilds_shaders_and_clears_cache() {
    let sandbox = Sandbox::new();
    assert!(sandbox.run(&["backup", "--yes"]).status.success());

    let live = ShaderFile::Hdr.live_path(&sandbox.shaders());
    fs::write(&live, "// left over from another tool\n").unwrap();
    fs::write(sandbox.cache().join("compiled.bin"), [0u8; 4]).unwrap();

    let output = sandbox.run(&["apply"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("0/0 tweaks applied"));
    assert_eq!(read(&live), stock(ShaderFile::Hdr));
    assert!(!sandbox.cache().join("compiled.bin").exists());
}

#[test]
fn restore_puts_backup_back() {
    let sandbox = Sandbox::new();
    assert!(sandbox.run(&["backup", "--yes"]).status.success());

    let live = ShaderFile::Terrain.live_path(&sandbox.shaders());
    fs::write(&live, "// patched\n").unwrap();
    assert!(sandbox.run(&["restore"]).status.success());
    assert_eq!(read(&live), stock(ShaderFile::Terrain));
}

#[test]
fn apply_with_missing_preset_fails() {
    let sandbox = Sandbox::new();
    assert!(sandbox.run(&["backup", "--yes"]).status.success());
    let missing = sandbox.app().join("nope.ini");
    let output = sandbox.run(&["apply", "--preset", &missing.display().to_string()]);
    assert!(!output.status.success());
}

#[test]
fn apply_refuses_backup_from_older_simulator() {
    let sandbox = Sandbox::new();
    assert!(sandbox.run(&["backup", "--yes"]).status.success());

    let live = ShaderFile::Hdr.live_path(&sandbox.shaders());
    fs::write(&live, "// shipped with 6.0\n").unwrap();

    let output = sandbox.run_as("6.0.0.0", &["apply"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("new version of Prepar3D (6.0.0.0)"));
    assert!(stderr.contains("Re-run `openshade backup`"));
    assert_eq!(read(&live), "// shipped with 6.0\n");

    let output = sandbox.run_as("6.0.0.0", &["restore"]);
    assert!(!output.status.success());
    assert_eq!(read(&live), "// shipped with 6.0\n");
}

#[test]
fn force_uses_backup_from_older_simulator() {
    let sandbox = Sandbox::new();
    assert!(sandbox.run(&["backup", "--yes"]).status.success());

    let live = ShaderFile::Hdr.live_path(&sandbox.shaders());
    fs::write(&live, "// shipped with 6.0\n").unwrap();

    let output = sandbox.run_as("6.0.0.0", &["apply", "--force"]);
    assert!(output.status.success());
    assert_eq!(read(&live), stock(ShaderFile::Hdr));
}
