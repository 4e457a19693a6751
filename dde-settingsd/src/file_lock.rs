use anyhow::Context;
use fs2::FileExt;
use std::fs::File;
use std::path::PathBuf;

const LOCK_NAME: &str = "dde-settingsd.lock";

fn lock_path() -> PathBuf {
    let mut path = dirs::runtime_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(std::env::temp_dir);
    path.push(LOCK_NAME);
    path
}

/// Takes the single-instance lock, held until the returned file is dropped.
pub fn acquire_daemon_lock() -> anyhow::Result<File> {
    let path = lock_path();
    let file = File::create(&path)
        .with_context(|| format!("Failed to create lock file {}", path.display()))?;

    // Exclusive lock; fails if another instance holds it
    file.try_lock_exclusive()
        .context("Another instance is already running")?;

    Ok(file)
}
