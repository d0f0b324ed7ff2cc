use std::path::PathBuf;
use nix::sys::stat::Mode;

pub const JAIL_DIR: &str = "tmpdir";
pub const ASCENT_DEPTH: usize = 1000;

/// Fixed parameters of one escape attempt.
#[derive(Debug, Clone)]
pub struct JailConfig {
    /// Directory created in the cwd and used as the new root.
    pub jail_dir: PathBuf,
    /// Upper bound on `chdir("..")` calls after entering the jail.
    pub ascent_depth: usize,
    pub dir_mode: Mode,
}

impl Default for JailConfig {
    fn default() -> Self {
        JailConfig {
            jail_dir: PathBuf::from(JAIL_DIR),
            ascent_depth: ASCENT_DEPTH,
            // 0755
            dir_mode: Mode::S_IRWXU | Mode::S_IRGRP | Mode::S_IXGRP | Mode::S_IROTH | Mode::S_IXOTH,
        }
    }
}
