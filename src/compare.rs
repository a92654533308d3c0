//! # Directory Reconciliation
//!
//! Recursive comparison of two directory trees, used to verify that a
//! generator run, a sync target, or a cloned project matches what was
//! expected.
//!
//! [`compare_directories`] walks both roots in lockstep and returns one
//! [`Difference`] per mismatch. At every level it reports, in this order:
//!
//! 1. common files whose contents differ
//! 2. names that are a file on one side and a directory on the other
//! 3. entries present only on the left
//! 4. entries present only on the right
//! 5. for each common subdirectory that itself contains differences, a
//!    record for the subdirectory pair followed by all of its child records
//!
//! Directories whose *name* appears in the ignore set are skipped at every
//! depth, so a generator cache such as `.jekyll-cache` nested anywhere in
//! the tree never shows up in the result.
//!
//! Every returned pair has the same relative suffix under each root: the
//! right-hand path of a left-only entry simply does not exist.

use std::collections::{BTreeMap, HashSet};
use std::ffi::OsString;
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::error::Result;

/// Why a path pair was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceKind {
    /// Both sides hold a file and the bytes differ.
    ContentDiffers,
    /// One side holds a file, the other a directory.
    TypeMismatch,
    /// Present only under the left root.
    LeftOnly,
    /// Present only under the right root.
    RightOnly,
    /// A subdirectory present on both sides that contains differences.
    Subdirectory,
}

impl DifferenceKind {
    /// Short marker used when printing a difference list.
    pub fn marker(self) -> &'static str {
        match self {
            DifferenceKind::ContentDiffers => "~",
            DifferenceKind::TypeMismatch => "!",
            DifferenceKind::LeftOnly => "-",
            DifferenceKind::RightOnly => "+",
            DifferenceKind::Subdirectory => "d",
        }
    }
}

/// A single detected mismatch between the two trees.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Difference {
    pub left: PathBuf,
    pub right: PathBuf,
    pub kind: DifferenceKind,
}

impl Difference {
    fn new(left: PathBuf, right: PathBuf, kind: DifferenceKind) -> Self {
        Self { left, right, kind }
    }

    /// The bare `(left, right)` path pair.
    pub fn as_pair(&self) -> (&Path, &Path) {
        (&self.left, &self.right)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Dir,
}

/// Recursively compare `left` and `right`, skipping directories named in
/// `ignore_dirs` at every depth.
///
/// Entries within one directory are visited in byte order of their names,
/// so the result is stable across runs. Callers comparing against an
/// expected set should still sort both sides.
///
/// # Errors
///
/// Any I/O failure while listing or reading, including a root that does not
/// exist, is returned as-is.
pub fn compare_directories(
    left: &Path,
    right: &Path,
    ignore_dirs: &HashSet<String>,
) -> Result<Vec<Difference>> {
    let mut differences = Vec::new();
    compare_level(left, right, ignore_dirs, &mut differences)?;
    Ok(differences)
}

fn compare_level(
    left: &Path,
    right: &Path,
    ignore_dirs: &HashSet<String>,
    out: &mut Vec<Difference>,
) -> Result<()> {
    let left_entries = list_entries(left, ignore_dirs)?;
    let right_entries = list_entries(right, ignore_dirs)?;

    let mut type_mismatches = Vec::new();
    let mut common_dirs = Vec::new();

    for (name, left_kind) in &left_entries {
        let Some(right_kind) = right_entries.get(name) else {
            continue;
        };
        let (left_path, right_path) = (left.join(name), right.join(name));
        match (left_kind, right_kind) {
            (EntryKind::File, EntryKind::File) => {
                if files_differ(&left_path, &right_path)? {
                    out.push(Difference::new(
                        left_path,
                        right_path,
                        DifferenceKind::ContentDiffers,
                    ));
                }
            }
            (EntryKind::Dir, EntryKind::Dir) => common_dirs.push(name),
            _ => type_mismatches.push(Difference::new(
                left_path,
                right_path,
                DifferenceKind::TypeMismatch,
            )),
        }
    }
    out.extend(type_mismatches);

    for name in left_entries.keys().filter(|n| !right_entries.contains_key(*n)) {
        out.push(Difference::new(
            left.join(name),
            right.join(name),
            DifferenceKind::LeftOnly,
        ));
    }
    for name in right_entries.keys().filter(|n| !left_entries.contains_key(*n)) {
        out.push(Difference::new(
            left.join(name),
            right.join(name),
            DifferenceKind::RightOnly,
        ));
    }

    for name in common_dirs {
        let (left_dir, right_dir) = (left.join(name), right.join(name));
        let mut children = Vec::new();
        compare_level(&left_dir, &right_dir, ignore_dirs, &mut children)?;
        if !children.is_empty() {
            out.push(Difference::new(
                left_dir,
                right_dir,
                DifferenceKind::Subdirectory,
            ));
            out.append(&mut children);
        }
    }

    Ok(())
}

/// List a directory, dropping subdirectories whose name is ignored.
fn list_entries(dir: &Path, ignore_dirs: &HashSet<String>) -> Result<BTreeMap<OsString, EntryKind>> {
    let mut entries = BTreeMap::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        // Follow symlinks; a dangling link is listed as a file entry.
        let is_dir = fs::metadata(&path)
            .or_else(|_| fs::symlink_metadata(&path))?
            .is_dir();
        let name = entry.file_name();
        if is_dir && ignore_dirs.contains(name.to_string_lossy().as_ref()) {
            continue;
        }
        let kind = if is_dir { EntryKind::Dir } else { EntryKind::File };
        entries.insert(name, kind);
    }
    Ok(entries)
}

const CHUNK_SIZE: usize = 8 * 1024;

/// Target of `path` if it is a symlink that does not resolve.
fn dangling_link_target(path: &Path) -> Result<Option<PathBuf>> {
    if !fs::symlink_metadata(path)?.file_type().is_symlink() || path.exists() {
        return Ok(None);
    }
    Ok(Some(fs::read_link(path)?))
}

/// Byte-for-byte comparison, short-circuiting on a size mismatch.
///
/// Live symlinks are compared by the content they point at. A dangling link
/// is never read through: two dangling links are equal when their targets
/// are, and a dangling link never equals a real file.
fn files_differ(left: &Path, right: &Path) -> Result<bool> {
    match (dangling_link_target(left)?, dangling_link_target(right)?) {
        (None, None) => {}
        (Some(left_target), Some(right_target)) => return Ok(left_target != right_target),
        _ => return Ok(true),
    }

    let left_len = fs::metadata(left)?.len();
    if left_len != fs::metadata(right)?.len() {
        return Ok(true);
    }

    let mut left_reader = BufReader::new(fs::File::open(left)?);
    let mut right_reader = BufReader::new(fs::File::open(right)?);
    let mut left_buf = [0u8; CHUNK_SIZE];
    let mut right_buf = [0u8; CHUNK_SIZE];

    let mut remaining = left_len;
    while remaining > 0 {
        let n = remaining.min(CHUNK_SIZE as u64) as usize;
        left_reader.read_exact(&mut left_buf[..n])?;
        right_reader.read_exact(&mut right_buf[..n])?;
        if left_buf[..n] != right_buf[..n] {
            return Ok(true);
        }
        remaining -= n as u64;
    }
    Ok(false)
}

/// Copy the tree under `src` into `dst`, creating `dst` if needed.
///
/// Existing files in `dst` are overwritten; anything else already in `dst`
/// is left in place. Symlinks are followed and their targets copied.
pub fn clone_directory(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)?;

    for entry in WalkDir::new(src).follow_links(true).min_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(std::io::Error::other)?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}
