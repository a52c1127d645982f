use fs2::FileExt;
use std::fs::File;
use std::path::PathBuf;

fn lock_path() -> PathBuf {
    let mut path = dirs::runtime_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(std::env::temp_dir);
    path.push("wifi-switcher.lock");
    path
}

/// Takes the single-instance lock so two invocations never drive `nmcli`
/// at the same time. The lock is released when the returned file is dropped.
pub fn acquire_lock() -> anyhow::Result<File> {
    let path = lock_path();
    let file = File::create(&path)
        .map_err(|e| anyhow::anyhow!("Failed to create lock file {}: {e}", path.display()))?;

    // Exclusive lock; fails if another instance holds it
    file.try_lock_exclusive()
        .map_err(|_| anyhow::anyhow!("Another wifi-switcher instance is already running"))?;

    Ok(file)
}
