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

use std::fs;

use super::{ExportContext, ExportStage, ExportTarget, ExportError};
use crate::{filter::FileFilter, fs::copy_filtered, staging::StagingArea};

/// CurseForge and Modrinth archives are produced by `packwiz <platform> export`
/// run against a filtered copy of the pack.
pub(super) fn export(ctx: &ExportContext) -> Result<(), ExportError> {
    let platform = match ctx.target {
        ExportTarget::Modrinth => "modrinth",
        _ => "curseforge"
    };

    let staging = ctx.stage(
        StagingArea::new(&ctx.root, ctx.target.staging_suffix()),
        ExportStage::Stage
    )?;

    let filter = FileFilter::for_target(ctx.target);
    let copied = ctx.stage(copy_filtered(&ctx.pack.dir, staging.path(), &filter), ExportStage::Copy)?;
    tracing::debug!("Staged {copied} files for {} export", ctx.target);

    if let Some(build_dir) = ctx.output.parent() {
        ctx.stage(fs::create_dir_all(build_dir).map_err(Into::into), ExportStage::Zip)?;
    }

    ctx.stage(ctx.packwiz().export(staging.path(), platform, &ctx.output), ExportStage::Zip)?;

    ctx.stage(staging.release(), ExportStage::Stage)
}
