//! Cleanup guard for toolchain working-directory state (§4.3 step 4).

use std::path::{Path, PathBuf};

/// Best-effort removal of `.terraform/`, `terraform.tfstate` and its lock
/// file on drop. A directory is audited read-only from the caller's
/// perspective; these are local artifacts of running `init`/`schema`
/// against it, not user state.
pub struct CleanupGuard {
    dir: PathBuf,
}

impl CleanupGuard {
    pub fn new(dir: &Path) -> Self {
        Self { dir: dir.to_path_buf() }
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let targets = [
            self.dir.join(".terraform"),
            self.dir.join("terraform.tfstate"),
            self.dir.join(".terraform.tfstate.lock.info"),
        ];
        for target in targets {
            if target.is_dir() {
                let _ = std::fs::remove_dir_all(&target);
            } else if target.exists() {
                let _ = std::fs::remove_file(&target);
            }
        }
    }
}
