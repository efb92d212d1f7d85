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

use anyhow::{bail, Context, Result};
use std::{io, path::{Path, PathBuf}, process::{Command, Stdio}};

use crate::{fs::copy_file, github_client::GithubClient, locator::to_slash, Error, Pack, Progress};
use crate::pack::PACK_FILE;

pub const INSTALLER_JAR: &str = "packwiz-installer-bootstrap.jar";

const INSTALLER_REPO: &str = "packwiz/packwiz-installer-bootstrap";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallSide {
    /// Client and server mods
    Both,

    /// Only mods with `side = "server"` or `side = "both"`
    Server
}

/// Path of the installer jar cached in `pack_dir`, downloading it when missing
pub async fn ensure_installer_jar(pack_dir: &Path, progress: &mut dyn Progress) -> Result<PathBuf> {
    let jar_path = pack_dir.join(INSTALLER_JAR);
    if jar_path.is_file() {
        return Ok(jar_path);
    }

    tracing::info!("Downloading {INSTALLER_JAR}");

    let client = GithubClient::new()?;
    let release = client.latest_release(INSTALLER_REPO).await?;
    let asset = release.find_asset(|name| name == INSTALLER_JAR)
        .ok_or_else(|| Error::AssetNotFound(INSTALLER_JAR.to_string()))?;

    client.download_file(&asset.browser_download_url, &jar_path, progress).await
        .with_context(|| format!("Failed to download {INSTALLER_JAR}"))?;

    Ok(jar_path)
}

/// Copy `pack.toml`, the index and the installer jar into `staging_dir`
pub fn stage_installer(staging_dir: &Path, pack: &Pack, jar: &Path) -> Result<()> {
    copy_file(&pack.pack_file(), &staging_dir.join(PACK_FILE))?;
    copy_file(&pack.index_file(), &staging_dir.join(&pack.manifest.index.file))?;
    copy_file(jar, &staging_dir.join(INSTALLER_JAR))?;

    Ok(())
}

fn installer_command(dir: &Path, java: &Path, jar: &Path, pack_file: &Path, side: InstallSide) -> Command {
    let mut cmd = Command::new(java);

    cmd.arg("-jar").arg(jar).arg(pack_file);

    if side == InstallSide::Server {
        cmd.arg("-s").arg("server");
    }

    // -g disables the installer gui
    cmd.arg("-g")
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    cmd
}

/// Run the installer jar inside `staging_dir` to download the pack's files
pub fn install_mods(staging_dir: &Path, java: &Path, side: InstallSide) -> Result<()> {
    run_installer(staging_dir, java, Path::new(INSTALLER_JAR), Path::new(PACK_FILE), side)
}

/// Run `jar` against `pack_file` with `dir` as the install target.
///
/// Relative `jar` and `pack_file` paths resolve against `dir`.
pub fn run_installer(dir: &Path, java: &Path, jar: &Path, pack_file: &Path, side: InstallSide) -> Result<()> {
    tracing::info!("Running {INSTALLER_JAR} in {}", to_slash(dir));

    let status = match installer_command(dir, java, jar, pack_file, side).status() {
        Ok(status) => status,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            bail!(Error::ToolNotFound(to_slash(java)))
        },
        Err(e) => return Err(e).context("Failed to start packwiz installer")
    };

    if !status.success() {
        bail!(Error::ToolFailed {
            tool: INSTALLER_JAR.to_string(),
            status: status.to_string()
        });
    }

    Ok(())
}
