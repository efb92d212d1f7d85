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

use super::{write_file, ExportContext, ExportError, ExportStage};
use crate::{
    archive::build_zip, filter::FileFilter, fs::{copy_file, copy_filtered},
    installer::{ensure_installer_jar, INSTALLER_JAR}, locator::MINECRAFT_DIR,
    manifest::MmcPack, staging::StagingArea, Progress
};

const INSTANCE_CFG: &str = "instance.cfg";
const MMC_PACK_JSON: &str = "mmc-pack.json";

/// Icon key derived from the pack name, anything but ASCII alphanumerics becomes `_`
fn icon_key(name: &str) -> String {
    let sanitized: String = name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    format!("{sanitized}_icon")
}

fn instance_cfg(name: &str, icon_key: &str, pack_url: &str) -> String {
    format!(
        "[General]\n\
         InstanceType=OneSix\n\
         iconKey={icon_key}\n\
         name={name}\n\
         OverrideCommands=true\n\
         PreLaunchCommand=\"$INST_JAVA\" -jar {INSTALLER_JAR} {pack_url}\n"
    )
}

pub(super) async fn export(ctx: &ExportContext<'_>, progress: &mut dyn Progress) -> Result<(), ExportError> {
    let jar = ctx.stage(ensure_installer_jar(&ctx.pack.dir, progress).await, ExportStage::Install)?;

    let staging = ctx.stage(
        StagingArea::new(&ctx.root, ctx.target.staging_suffix()),
        ExportStage::Stage
    )?;

    // mods are fetched by the pre-launch installer, not shipped in the instance
    let mc_dir = staging.path().join(MINECRAFT_DIR);
    let filter = FileFilter::for_target(ctx.target);
    ctx.stage(copy_filtered(&ctx.pack.dir, &mc_dir, &filter), ExportStage::Copy)?;
    ctx.stage(copy_file(&jar, &mc_dir.join(INSTALLER_JAR)), ExportStage::Copy)?;

    let name = match ctx.pack.manifest.name.trim() {
        "" => ctx.pack.project_name(),
        name => name.to_string()
    };
    let icon_key = icon_key(&name);

    if let Some(icon) = ctx.icon() {
        let icon_file = staging.path().join(format!("{icon_key}.png"));
        ctx.stage(copy_file(&icon, &icon_file), ExportStage::Copy)?;
    }

    ctx.stage(write_manifests(ctx, staging.path(), &name, &icon_key), ExportStage::Manifest)?;
    ctx.stage(build_zip(staging.path(), &ctx.output), ExportStage::Zip)?;

    ctx.stage(staging.release(), ExportStage::Stage)
}

fn write_manifests(ctx: &ExportContext, dir: &std::path::Path, name: &str, icon_key: &str) -> Result<()> {
    let pack_url = ctx.pack_url();
    tracing::info!("MultiMC instance will install from {pack_url}");

    write_file(&dir.join(INSTANCE_CFG), &instance_cfg(name, icon_key, &pack_url))?;

    let mmc_pack = MmcPack::from_pack(&ctx.pack.manifest);
    write_file(&dir.join(MMC_PACK_JSON), &serde_json::to_string_pretty(&mmc_pack)?)?;

    Ok(())
}
