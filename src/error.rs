use std::path::PathBuf;
use thiserror::Error;

/// The reason is carried in the message only, so `anyhow` prints it once.
#[derive(Debug, Error)]
pub enum JailError {
    #[error("chroot: {errno} ({path:?})")]
    Chroot { path: PathBuf, errno: nix::Error },
    #[error("chdir: {errno} ({path:?})")]
    Chdir { path: PathBuf, errno: nix::Error },
}

impl JailError {
    pub fn chroot<P: Into<PathBuf>>(path: P, errno: nix::Error) -> Self {
        JailError::Chroot { path: path.into(), errno }
    }

    pub fn chdir<P: Into<PathBuf>>(path: P, errno: nix::Error) -> Self {
        JailError::Chdir { path: path.into(), errno }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::errno::Errno;

    #[test]
    fn chroot_reads_like_perror() {
        let e = JailError::chroot("tmpdir", nix::Error::Sys(Errno::EPERM));
        let msg = e.to_string();
        assert!(msg.starts_with("chroot: "), "{}", msg);
        assert!(msg.contains("tmpdir"), "{}", msg);
    }

    #[test]
    fn chdir_reads_like_perror() {
        let e = JailError::chdir("..", nix::Error::Sys(Errno::ENOENT));
        assert!(e.to_string().starts_with("chdir: "));
    }

    #[test]
    fn reason_appears_once_in_report() {
        use std::error::Error as _;
        let e = JailError::chroot("tmpdir", nix::Error::Sys(Errno::ENOTDIR));
        assert!(e.source().is_none());

        let report = format!("{:?}", anyhow::Error::from(e));
        assert_eq!(report.matches("ENOTDIR").count(), 1, "{}", report);
    }
}
