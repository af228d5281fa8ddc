//! Level → sublevel traversal.
//!
//! [`CorpusWalker`] is an iterator: a sublevel's unit file is only read when
//! its outcome is pulled, and the extracted set is handed off with the
//! outcome rather than kept by the walker.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::catalog::{Catalog, ContentType, LessonUnit, Sublevel};
use crate::config::PipelineConfig;
use crate::extract::{extract_strings, unique_sorted};
use crate::paths::SublevelId;

/// A sublevel with text to synthesize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SublevelBatch {
    pub sublevel: SublevelId,
    /// Unique strings in codepoint order. Never empty.
    pub strings: Vec<String>,
}

/// What happened to one sublevel.
#[derive(Debug)]
pub enum SublevelOutcome {
    Ready(SublevelBatch),
    /// Content type is in the skip set; the unit file was never opened.
    Skipped {
        sublevel: SublevelId,
        content_type: ContentType,
    },
    /// Unit file does not exist.
    Missing { sublevel: SublevelId, path: PathBuf },
    /// Unit file exists but could not be read or parsed.
    Unreadable {
        sublevel: SublevelId,
        path: PathBuf,
        error: String,
    },
    /// Unit file held no script text.
    Empty { sublevel: SublevelId },
}

pub struct CorpusWalker<'a> {
    catalog: &'a Catalog,
    config: &'a PipelineConfig,
    level: usize,
    sublevel: usize,
}

impl<'a> CorpusWalker<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a PipelineConfig) -> Self {
        Self {
            catalog,
            config,
            level: 0,
            sublevel: 0,
        }
    }

    fn visit(&self, level_number: u32, sub: &Sublevel) -> SublevelOutcome {
        let id = SublevelId::for_sublevel(level_number, sub);

        if self.config.is_skipped(&sub.content_type) {
            log::info!(
                "[SKIP] {} ({}) → {}",
                sub.code,
                sub.content_type,
                sub.path.display()
            );
            return SublevelOutcome::Skipped {
                sublevel: id,
                content_type: sub.content_type.clone(),
            };
        }

        log::info!("[SUBLEVEL] {} → {}", sub.code, sub.path.display());

        let path = self.config.resolve_unit_path(&sub.path);
        if !path.exists() {
            log::warn!("File not found: {}", path.display());
            return SublevelOutcome::Missing { sublevel: id, path };
        }

        let unit = match LessonUnit::load(&path) {
            Ok(unit) => unit,
            Err(e) => {
                log::warn!("Skipping {}: {e}", sub.code);
                return SublevelOutcome::Unreadable {
                    sublevel: id,
                    path,
                    error: e.to_string(),
                };
            }
        };

        let strings = unique_sorted(extract_strings(&unit, self.config.script_range));
        if strings.is_empty() {
            log::info!("No script text found in {}", path.display());
            return SublevelOutcome::Empty { sublevel: id };
        }

        log::debug!("{}: {} unique strings", sub.code, strings.len());
        SublevelOutcome::Ready(SublevelBatch {
            sublevel: id,
            strings,
        })
    }
}

/// Sublevels whose output directory an earlier sublevel already claims.
///
/// Two sublevels collide when they share a level directory and their codes
/// slug to the same name; the later one would overwrite the earlier one's
/// files. Each repeat is returned in catalog order and logged at warn.
pub fn duplicate_sublevels(catalog: &Catalog) -> Vec<SublevelId> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for level in &catalog.levels {
        for sub in &level.sublevels {
            let id = SublevelId::for_sublevel(level.number, sub);
            if !seen.insert((id.level_dir.clone(), id.slug())) {
                log::warn!(
                    "Sublevel {} in {} repeats an earlier code; its files will overwrite the earlier ones",
                    id.code,
                    id.level_dir
                );
                duplicates.push(id);
            }
        }
    }
    duplicates
}

impl Iterator for CorpusWalker<'_> {
    type Item = SublevelOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        let catalog = self.catalog;
        loop {
            let level = catalog.levels.get(self.level)?;
            if self.sublevel == 0 {
                log::info!("=== Processing Level {} ===", level.number);
            }
            match level.sublevels.get(self.sublevel) {
                Some(sub) => {
                    self.sublevel += 1;
                    return Some(self.visit(level.number, sub));
                }
                None => {
                    self.level += 1;
                    self.sublevel = 0;
                }
            }
        }
    }
}
