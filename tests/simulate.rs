// SPDX-License-Identifier: MPL-2.0
//! Runs the binary against a fixture registry and checks where it writes.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::{tempdir, TempDir};

const CACHE_FILE: &str = "plugin_manager_cache.bin";

struct Sandbox {
    root: TempDir,
}

impl Sandbox {
    /// Lays out a config folder whose `settings.toml` points at "real"
    /// backup and cache folders, plus a fixture with one VEGAS Pro 20.0.
    fn new() -> Self {
        let sandbox = Self {
            root: tempdir().expect("failed to create temp dir"),
        };
        for dir in ["config", "configured_backups", "backups", "install"] {
            fs::create_dir_all(sandbox.path(dir)).unwrap();
        }
        sandbox.seed_cache("configured_appdata");

        let settings = format!(
            "[backup]\ndirectory = '{}'\n\n[cache]\nlocal_app_data = '{}'\n",
            sandbox.path("configured_backups").display(),
            sandbox.path("configured_appdata").display(),
        );
        fs::write(sandbox.path("config").join("settings.toml"), settings).unwrap();

        let fixture = format!(
            "[[key]]\npath = 'SOFTWARE\\VEGAS Creative Software\\VEGAS Pro\\20.0'\n\
             values = {{ InstallPath = '{}' }}\n\n\
             [[key]]\npath = 'SOFTWARE\\VEGAS Creative Software\\VEGAS Pro\\20.0\\Lang'\n\
             values = {{ ULangID = 1042 }}\n",
            sandbox.path("install").display(),
        );
        fs::write(sandbox.path("registry.toml"), fixture).unwrap();
        sandbox
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    fn seed_cache(&self, root: &str) {
        let dir = self.cache_dir(root);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CACHE_FILE), b"stale").unwrap();
    }

    fn cache_dir(&self, root: &str) -> PathBuf {
        self.path(root).join("VEGAS Pro").join("20.0")
    }

    fn run(&self, extra: &[&str]) -> Output {
        let mut command = Command::new(env!("CARGO_BIN_EXE_vegas_lang_changer"));
        command
            .env_remove("RUST_LOG")
            .arg("--config-dir")
            .arg(self.path("config"))
            .arg("--simulate")
            .arg(self.path("registry.toml"))
            .args(extra)
            .args(["apply", "--all", "--lang", "english", "--yes"]);
        command.output().expect("failed to run binary")
    }
}

fn reg_files(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "reg"))
        .collect()
}

#[test]
fn simulated_apply_leaves_configured_folders_alone() {
    let sandbox = Sandbox::new();
    let backups = sandbox.path("backups");

    let output = sandbox.run(&["--backup-dir", backups.to_str().unwrap()]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(reg_files(&backups).len(), 1);
    assert!(reg_files(&sandbox.path("configured_backups")).is_empty());
    assert!(sandbox.cache_dir("configured_appdata").join(CACHE_FILE).exists());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&backups.display().to_string()));
}

#[test]
fn simulated_apply_clears_caches_only_under_cache_dir() {
    let sandbox = Sandbox::new();
    sandbox.seed_cache("appdata");
    let backups = sandbox.path("backups");
    let appdata = sandbox.path("appdata");

    let output = sandbox.run(&[
        "--backup-dir",
        backups.to_str().unwrap(),
        "--cache-dir",
        appdata.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(!sandbox.cache_dir("appdata").join(CACHE_FILE).exists());
    assert!(sandbox.cache_dir("configured_appdata").join(CACHE_FILE).exists());
}

#[test]
fn simulated_apply_without_backup_dir_writes_nothing() {
    let sandbox = Sandbox::new();

    let output = sandbox.run(&[]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--backup-dir"));
    assert!(reg_files(&sandbox.path("configured_backups")).is_empty());
    assert!(reg_files(&sandbox.path("backups")).is_empty());
    assert!(sandbox.cache_dir("configured_appdata").join(CACHE_FILE).exists());
}
