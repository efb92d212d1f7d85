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

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};

/// Scratch directory owned by a single export, removed when dropped
pub struct StagingArea {
    dir: PathBuf,
    released: bool
}

impl StagingArea {
    /// Create `<base_dir>/.<suffix>`, clearing anything left by an interrupted run
    pub fn new(base_dir: &Path, suffix: &str) -> Result<Self> {
        let dir = base_dir.join(format!(".{suffix}"));

        if dir.exists() {
            tracing::debug!("Removing stale staging dir {}", dir.display());
            fs::remove_dir_all(&dir)
                .with_context(|| format!("Failed to clear {}", dir.display()))?;
        }

        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        Ok(StagingArea { dir, released: false })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Remove the staging tree, reporting any failure
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        fs::remove_dir_all(&self.dir)
            .with_context(|| format!("Failed to remove {}", self.dir.display()))
    }
}

impl Drop for StagingArea {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        if let Err(e) = fs::remove_dir_all(&self.dir) {
            tracing::warn!("Failed to remove staging dir {}: {e}", self.dir.display());
        }
    }
}
