//! Output layout: `<audio-root>/<level-dir>/sublevel-<code>/<code>_<NNN>.<ext>`.

use std::path::{Path, PathBuf};

use crate::catalog::Sublevel;

/// Identity of a sublevel as far as output naming is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SublevelId {
    /// Directory name of the level, e.g. `level-1`.
    pub level_dir: String,
    /// Dotted sublevel code, e.g. `1.1`.
    pub code: String,
}

impl SublevelId {
    /// The level directory is the unit file's parent directory name, falling
    /// back to `level-<number>` for bare file names.
    pub fn for_sublevel(level_number: u32, sublevel: &Sublevel) -> Self {
        let level_dir = sublevel
            .path
            .parent()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("level-{level_number}"));

        Self {
            level_dir,
            code: sublevel.code.clone(),
        }
    }

    /// Dotted code with separators replaced, e.g. `1.1` → `1-1`.
    pub fn slug(&self) -> String {
        self.code.replace('.', "-")
    }
}

/// Directory holding every artifact of one sublevel.
pub fn sublevel_dir(audio_root: &Path, id: &SublevelId) -> PathBuf {
    audio_root
        .join(&id.level_dir)
        .join(format!("sublevel-{}", id.slug()))
}

/// Path of the `index`-th (1-based) artifact of a sublevel.
pub fn plan_path(audio_root: &Path, id: &SublevelId, index: usize, extension: &str) -> PathBuf {
    sublevel_dir(audio_root, id).join(format!("{}_{:03}.{}", id.slug(), index, extension))
}
