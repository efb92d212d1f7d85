/*
 * Packwrap - A packwiz modpack wrapper and exporter
 * Copyright (C) 2024 The Packwrap Developers
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use anyhow::Result;
use std::{fs, path::Path};
use walkdir::WalkDir;

use crate::{filter::{Decision, FileFilter}, locator::to_slash};

/// Copy the tree under `src` to `dst`, keeping only what `filter` includes.
///
/// Returns the number of files copied.
pub fn copy_filtered(src: &Path, dst: &Path, filter: &FileFilter) -> Result<usize> {
    fs::create_dir_all(dst)?;

    let mut copied = 0;
    let mut it = WalkDir::new(src).min_depth(1).sort_by_file_name().into_iter();

    while let Some(entry) = it.next() {
        let entry = entry?;
        let rel_path = entry.path().strip_prefix(src)?;
        let is_dir = entry.file_type().is_dir();

        match filter.decide(&to_slash(rel_path), is_dir) {
            Decision::SkipSubtree => {
                if is_dir {
                    it.skip_current_dir();
                }
                continue;
            },
            Decision::Skip => continue,
            Decision::Include => { }
        }

        let dst_path = dst.join(rel_path);
        if is_dir {
            fs::create_dir_all(&dst_path)?;
        } else {
            copy_file(entry.path(), &dst_path)?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Copy a single file, creating the destination's parent directories
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::copy(src, dst)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExportTarget;

    #[test]
    fn copy_filtered_applies_server_rules() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();

        for (path, body) in [
            ("pack.toml", "name = \"x\""),
            ("mods/a.pw.toml", "name = \"a\""),
            ("mods/a.jar", "jar"),
            ("config/a.toml", "a = 1"),
            ("resourcepacks/r.zip", "zip"),
            (".git/HEAD", "ref")
        ] {
            let p = src.path().join(path);
            fs::create_dir_all(p.parent().unwrap()).unwrap();
            fs::write(p, body).unwrap();
        }

        let filter = FileFilter::for_target(ExportTarget::Server);
        let copied = copy_filtered(src.path(), dst.path(), &filter).unwrap();

        assert_eq!(copied, 3);
        assert!(dst.path().join("pack.toml").is_file());
        assert!(dst.path().join("mods/a.pw.toml").is_file());
        assert!(dst.path().join("config/a.toml").is_file());
        assert!(!dst.path().join("mods/a.jar").exists());
        assert!(!dst.path().join("resourcepacks").exists());
        assert!(!dst.path().join(".git").exists());
    }
}
