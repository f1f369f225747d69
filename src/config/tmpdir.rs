//! Generated message paths under the system temporary directory.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use log::warn;

/// Keeps generated suffixes within ten hexadecimal digits.
const SUFFIX_MASK: u64 = 0x7fff_ffff;

/// Subdirectory of the system temporary directory holding generated
/// message files.
static MESSAGES_DIR: LazyLock<PathBuf> = LazyLock::new(|| {
    let dir = env::temp_dir().join("rw_messages");
    match create_restricted_dir(&dir) {
        Ok(()) => dir,
        Err(e) => {
            let fallback = env::temp_dir();
            warn!(
                "unusable message directory {}, falling back to {}: {e}",
                dir.display(),
                fallback.display()
            );
            fallback
        }
    }
});

fn create_restricted_dir(dir: &Path) -> io::Result<()> {
    let created = {
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            fs::DirBuilder::new().mode(0o750).create(dir)
        }
        #[cfg(not(unix))]
        {
            fs::DirBuilder::new().create(dir)
        }
    };
    match created {
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        other => other,
    }
}

/// Generate a fresh, collision-resistant message path.
///
/// File names combine the process id with a random ten-digit
/// hexadecimal suffix: `rw_<pid>_<suffix>.msg`.
pub(crate) fn generate_path() -> PathBuf {
    let suffix = rand::random::<u64>() & SUFFIX_MASK;
    MESSAGES_DIR.join(format!("rw_{}_{suffix:010x}.msg", std::process::id()))
}
