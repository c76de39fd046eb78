use std::path::Path;
use std::process::Command;

use gpg_keyflow::{Choice, Error, GpgCli, GpgConfig, GpgTool, KeyWorkflow, Outcome, Prompter};
use tempfile::TempDir;

struct AlwaysYes;

#[async_trait::async_trait]
impl Prompter for AlwaysYes {
    async fn select(&self, _prompt: &str, choices: Vec<Choice>) -> gpg_keyflow::Result<String> {
        Ok(choices[0].value.clone())
    }

    async fn confirm(&self, _prompt: &str) -> gpg_keyflow::Result<bool> {
        Ok(true)
    }
}

fn isolated_gpg(homedir: &Path) -> GpgCli {
    GpgCli::with_config(GpgConfig {
        homedir: Some(homedir.to_path_buf()),
        ..GpgConfig::default()
    })
}

fn generate_key(homedir: &Path, uid: &str) {
    let status = Command::new("gpg")
        .arg(format!("--homedir={}", homedir.display()))
        .args([
            "--batch",
            "--pinentry-mode",
            "loopback",
            "--passphrase",
            "",
            "--quick-gen-key",
            uid,
            "ed25519",
            "default",
            "never",
        ])
        .status()
        .expect("failed to run gpg");
    assert!(status.success(), "key generation failed");
}

#[tokio::test]
#[ignore]
async fn test_list_keys_real() {
    let home = TempDir::new().unwrap();
    generate_key(home.path(), "Test User <test@example.org>");

    let keys = isolated_gpg(home.path())
        .list_keys()
        .await
        .expect("failed to list keys");

    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].name, "Test User");
    assert_eq!(keys[0].email, "test@example.org");
    assert_eq!(keys[0].key.len(), 40, "key should be a fingerprint");
    assert!(keys[0].key.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
#[ignore]
async fn test_export_then_import_real() {
    let source_home = TempDir::new().unwrap();
    let target_home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    generate_key(source_home.path(), "Round Trip <trip@example.org>");

    let exporter = KeyWorkflow::new(isolated_gpg(source_home.path()), AlwaysYes);
    let key = exporter
        .find_key("Select a GPG key to export")
        .await
        .unwrap()
        .expect("generated key should be listed");
    // The generated key has no passphrase, so exporting it never needs pinentry.
    let outcome = exporter.export_key(work.path(), &key, Some("trip")).await;
    assert!(matches!(outcome, Ok(Outcome::Exported { .. })));

    let importer = KeyWorkflow::new(isolated_gpg(target_home.path()), AlwaysYes);
    let outcome = importer.import_keys(work.path()).await.unwrap();
    assert_eq!(
        outcome,
        Outcome::Imported {
            files: vec!["trip_public.key".to_string(), "trip_private.key".to_string()]
        }
    );
}

#[tokio::test]
#[ignore]
async fn test_missing_gpg_program() {
    let gpg = GpgCli::with_config(GpgConfig {
        program: "/nonexistent/gpg".into(),
        homedir: None,
    });
    let result = gpg.list_keys().await;

    assert!(matches!(result, Err(Error::Command(_))));
}

#[tokio::test]
async fn test_invalid_keyid_empty() {
    let gpg = GpgCli::new();
    let result = gpg.delete_secret_key("").await;

    assert!(matches!(result, Err(Error::InvalidKeyId { .. })));
}

#[tokio::test]
async fn test_invalid_keyid_wrong_length() {
    let gpg = GpgCli::new();
    let result = gpg.delete_public_key("ABC").await;

    assert!(matches!(result, Err(Error::InvalidKeyId { .. })));
}

#[tokio::test]
async fn test_invalid_keyid_non_hex() {
    let work = TempDir::new().unwrap();
    let gpg = GpgCli::new();
    let result = gpg
        .export_public_key("GHIJKLMN", &work.path().join("public.key"))
        .await;

    assert!(matches!(result, Err(Error::InvalidKeyId { .. })));
    assert!(!work.path().join("public.key").exists());
}

#[tokio::test]
async fn test_option_injection_rejected() {
    let work = TempDir::new().unwrap();
    let gpg = GpgCli::new();

    let result = gpg
        .export_secret_key("--export-options=backup", &work.path().join("private.key"))
        .await;
    assert!(matches!(result, Err(Error::InvalidKeyId { .. })));

    let result = gpg.delete_secret_key("DEADBEEF; rm -rf /").await;
    assert!(matches!(result, Err(Error::InvalidKeyId { .. })));
}

/// Writes an executable standing in for gpg that exits with `code`.
#[cfg(unix)]
fn failing_gpg(dir: &Path, code: i32) -> GpgCli {
    use std::os::unix::fs::PermissionsExt;

    let program = dir.join("fake-gpg");
    std::fs::write(&program, format!("#!/bin/sh\nexit {code}\n")).unwrap();
    std::fs::set_permissions(&program, std::fs::Permissions::from_mode(0o755)).unwrap();

    GpgCli::with_config(GpgConfig {
        program,
        homedir: None,
    })
}

// A single test writes and runs the stand-in so no other test forks while
// its file is still open for writing.
#[cfg(unix)]
#[tokio::test]
async fn test_stand_in_gpg_exit_status() {
    let dir = TempDir::new().unwrap();
    let gpg = failing_gpg(dir.path(), 3);

    // Imports run on the terminal, so only the exit status comes back.
    let result = gpg.import_key(&dir.path().join("secret_private.key")).await;
    assert!(matches!(result, Err(Error::GpgInteractive { status: 3 })));

    let result = gpg.list_keys().await;
    assert!(matches!(result, Err(Error::Gpg { status: 3, .. })));

    // A v5 fingerprint passes validation and reaches gpg.
    let v5 = "19347BC9872464025F99DF3EC2E0000ED9884892E1F7B3EA4C94009159569B54";
    let result = gpg.delete_public_key(v5).await;
    assert!(matches!(result, Err(Error::GpgInteractive { status: 3 })));
}

#[test]
fn test_default_config() {
    let gpg = GpgCli::new();
    assert_eq!(gpg.config().program, Path::new("gpg"));
    assert!(gpg.config().homedir.is_none());
}
