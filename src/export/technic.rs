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
use std::path::Path;
use walkdir::WalkDir;

use super::{remove_if_exists, ExportContext, ExportError, ExportStage};
use crate::{
    archive::build_zip, filter::FileFilter, fs::copy_filtered,
    installer::{ensure_installer_jar, install_mods, stage_installer, InstallSide, INSTALLER_JAR},
    pack::{METAFILE_SUFFIX, PACK_FILE}, staging::StagingArea, Progress
};

pub(super) async fn export(ctx: &ExportContext<'_>, progress: &mut dyn Progress) -> Result<(), ExportError> {
    let java = ctx.stage(ctx.java(progress).await, ExportStage::Install)?;
    let jar = ctx.stage(ensure_installer_jar(&ctx.pack.dir, progress).await, ExportStage::Install)?;

    let staging = ctx.stage(
        StagingArea::new(&ctx.root, ctx.target.staging_suffix()),
        ExportStage::Stage
    )?;

    let filter = FileFilter::for_target(ctx.target);
    ctx.stage(copy_filtered(&ctx.pack.dir, staging.path(), &filter), ExportStage::Copy)?;
    ctx.stage(stage_installer(staging.path(), &ctx.pack, &jar), ExportStage::Copy)?;

    ctx.stage(install_mods(staging.path(), &java.path, InstallSide::Both), ExportStage::Install)?;
    ctx.stage(
        remove_installer_files(staging.path(), &ctx.pack.manifest.index.file),
        ExportStage::Install
    )?;

    ctx.stage(build_zip(staging.path(), &ctx.output), ExportStage::Zip)?;

    ctx.stage(staging.release(), ExportStage::Stage)
}

/// Technic packs ship installed mods only, drop the packwiz files
fn remove_installer_files(dir: &Path, index_file: &str) -> Result<()> {
    remove_if_exists(&dir.join(INSTALLER_JAR))?;
    remove_if_exists(&dir.join(PACK_FILE))?;
    remove_if_exists(&dir.join(index_file))?;

    let mods_dir = dir.join("mods");
    if !mods_dir.is_dir() {
        return Ok(());
    }

    for entry in WalkDir::new(&mods_dir) {
        let entry = entry?;
        if entry.file_type().is_file() && entry.file_name().to_string_lossy().ends_with(METAFILE_SUFFIX) {
            remove_if_exists(entry.path())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn installer_files_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();

        fs::create_dir_all(dir.join("mods/sub")).unwrap();
        for file in [INSTALLER_JAR, PACK_FILE, "index.toml", "mods/a.pw.toml", "mods/sub/b.pw.toml", "mods/a.jar"] {
            fs::write(dir.join(file), "x").unwrap();
        }

        remove_installer_files(dir, "index.toml").unwrap();

        assert!(!dir.join(INSTALLER_JAR).exists());
        assert!(!dir.join(PACK_FILE).exists());
        assert!(!dir.join("index.toml").exists());
        assert!(!dir.join("mods/a.pw.toml").exists());
        assert!(!dir.join("mods/sub/b.pw.toml").exists());
        assert!(dir.join("mods/a.jar").exists());
    }
}
