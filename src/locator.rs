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

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use crate::pack::PACK_FILE;

/// Instance sub-directory that may hold the pack instead of the project root
pub const MINECRAFT_DIR: &str = ".minecraft";

/// Find the directory containing `pack.toml`.
///
/// Each level checks `dir/pack.toml` then `dir/.minecraft/pack.toml` before
/// moving up to the parent. Siblings are never searched.
///
/// The result keeps native separators so it can be joined and opened
/// directly. Anything shown to the user or written to a manifest goes
/// through [`to_slash`] first.
pub fn locate(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);

    while let Some(current) = dir {
        if current.join(PACK_FILE).is_file() {
            return Some(current.to_path_buf());
        }

        let nested = current.join(MINECRAFT_DIR);
        if nested.join(PACK_FILE).is_file() {
            return Some(nested);
        }

        dir = current.parent();
    }

    None
}

/// Directory that owns `.build/` and the staging directories.
///
/// This is the parent of a `.minecraft` pack directory, otherwise the pack
/// directory itself.
pub fn project_root(pack_dir: &Path) -> PathBuf {
    match (pack_dir.file_name(), pack_dir.parent()) {
        (Some(name), Some(parent)) if name == MINECRAFT_DIR => parent.to_path_buf(),
        _ => pack_dir.to_path_buf()
    }
}

/// Render a path with `/` separators regardless of host
pub fn to_slash(path: &Path) -> String {
    let path = path.to_string_lossy();
    if MAIN_SEPARATOR == '\\' {
        path.replace('\\', "/")
    } else {
        path.into_owned()
    }
}
