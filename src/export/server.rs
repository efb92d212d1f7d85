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

use super::{write_file, ExportContext, ExportError, ExportStage};
use crate::{
    archive::build_zip, filter::FileFilter, fs::{copy_file, copy_filtered},
    installer::{ensure_installer_jar, install_mods, stage_installer, InstallSide},
    staging::StagingArea, Progress
};

const START_BAT: &str = "@echo off\r
title Minecraft Server\r
echo Starting Minecraft Server...\r
java -Xmx4G -Xms1G -jar server.jar nogui\r
pause\r
";

const START_SH: &str = "#!/bin/sh
echo \"Starting Minecraft Server...\"
exec java -Xmx4G -Xms1G -jar server.jar nogui
";

const EULA_TXT: &str = "# By changing the setting below to TRUE you are indicating your agreement to our EULA (https://aka.ms/MinecraftEULA).
# You must accept the EULA to run the server.
eula=false
";

const SERVER_PROPERTIES: &str = "# Minecraft server properties
server-port=25565
gamemode=survival
difficulty=normal
max-players=20
motd=A Minecraft Server
online-mode=true
spawn-protection=16
level-name=world
level-type=minecraft\\:normal
";

pub(super) async fn export(ctx: &ExportContext<'_>, progress: &mut dyn Progress) -> Result<(), ExportError> {
    let java = ctx.stage(ctx.java(progress).await, ExportStage::Install)?;
    let jar = ctx.stage(ensure_installer_jar(&ctx.pack.dir, progress).await, ExportStage::Install)?;

    let staging = ctx.stage(
        StagingArea::new(&ctx.root, ctx.target.staging_suffix()),
        ExportStage::Stage
    )?;

    let filter = FileFilter::for_target(ctx.target);
    ctx.stage(copy_filtered(&ctx.pack.dir, staging.path(), &filter), ExportStage::Copy)?;

    if let Some(icon) = ctx.icon() {
        ctx.stage(copy_file(&icon, &staging.path().join("server-icon.png")), ExportStage::Copy)?;
    }

    ctx.stage(stage_installer(staging.path(), &ctx.pack, &jar), ExportStage::Copy)?;
    ctx.stage(install_mods(staging.path(), &java.path, InstallSide::Server), ExportStage::Install)?;

    ctx.stage(write_server_files(staging.path()), ExportStage::Manifest)?;
    ctx.stage(build_zip(staging.path(), &ctx.output), ExportStage::Zip)?;

    ctx.stage(staging.release(), ExportStage::Stage)
}

/// Start scripts, an unaccepted EULA and default server.properties
fn write_server_files(dir: &Path) -> Result<()> {
    write_file(&dir.join("start.bat"), START_BAT)?;

    let start_sh = dir.join("start.sh");
    write_file(&start_sh, START_SH)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&start_sh, std::fs::Permissions::from_mode(0o755))?;
    }

    write_file(&dir.join("eula.txt"), EULA_TXT)?;

    // keep a server.properties shipped with the pack
    let properties = dir.join("server.properties");
    if !properties.exists() {
        write_file(&properties, SERVER_PROPERTIES)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn server_files_written() {
        let tmp = tempfile::tempdir().unwrap();
        write_server_files(tmp.path()).unwrap();

        assert!(fs::read_to_string(tmp.path().join("eula.txt")).unwrap().contains("eula=false"));
        assert!(fs::read_to_string(tmp.path().join("start.sh")).unwrap().starts_with("#!/bin/sh"));
        assert!(tmp.path().join("start.bat").is_file());
        assert!(fs::read_to_string(tmp.path().join("server.properties")).unwrap().contains("server-port=25565"));
    }

    #[cfg(unix)]
    #[test]
    fn start_script_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        write_server_files(tmp.path()).unwrap();

        let mode = fs::metadata(tmp.path().join("start.sh")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn existing_server_properties_kept() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("server.properties"), "motd=Custom\n").unwrap();

        write_server_files(tmp.path()).unwrap();
        assert_eq!(fs::read_to_string(tmp.path().join("server.properties")).unwrap(), "motd=Custom\n");
    }
}
