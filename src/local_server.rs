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
use std::{fs, io, path::{Path, PathBuf}, process::{Command, Stdio}};

use crate::{
    fs::copy_file, github_client::GithubClient, installer::{ensure_installer_jar, run_installer, InstallSide},
    java, locator::to_slash, manifest::{LoaderKind, ModLoader}, Error, Pack, Progress
};

/// Working directory of the local test server, under the project root
pub const RUN_DIR: &str = ".run";

const SERVER_JAR: &str = "server.jar";
const EULA_FILE: &str = "eula.txt";
const SERVER_ICON: &str = "server-icon.png";

const FABRIC_META_URL: &str = "https://meta.fabricmc.net/v2/versions/loader";
const FABRIC_INSTALLER_VERSION: &str = "1.1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerStatus {
    /// The run directory exists
    pub set_up: bool,
    pub server_jar: bool,
    pub eula: bool
}

/// Dedicated server for trying the pack locally, kept in `<root>/.run`
pub struct LocalServer {
    pack: Pack,
    run_dir: PathBuf
}

/// Launcher jar url for the pack's loader, only Fabric has a standalone server jar
fn server_jar_url(mc_version: &str, loader: Option<ModLoader>) -> Result<String> {
    match loader {
        Some(ModLoader { kind: LoaderKind::Fabric, version }) => Ok(format!(
            "{FABRIC_META_URL}/{mc_version}/{version}/{FABRIC_INSTALLER_VERSION}/server/jar"
        )),
        Some(loader) => bail!(Error::UnsupportedServerLoader(loader.kind.to_string())),
        None => bail!(Error::UnsupportedServerLoader(String::from("vanilla")))
    }
}

fn server_command(run_dir: &Path, java: &Path) -> Command {
    let mut cmd = Command::new(java);

    cmd.args(["-Xmx2G", "-Xms1G", "-jar", SERVER_JAR, "nogui"])
        .current_dir(run_dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    cmd
}

impl LocalServer {
    pub fn new(pack: Pack) -> Self {
        let run_dir = pack.project_root().join(RUN_DIR);
        LocalServer { pack, run_dir }
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    pub fn pack(&self) -> &Pack {
        &self.pack
    }

    pub fn status(&self) -> ServerStatus {
        ServerStatus {
            set_up: self.run_dir.is_dir(),
            server_jar: self.run_dir.join(SERVER_JAR).is_file(),
            eula: self.run_dir.join(EULA_FILE).is_file()
        }
    }

    /// Create the run directory, install server side mods and fetch the server jar.
    ///
    /// Fails before touching the disk when the pack has no Minecraft version
    /// or a loader without a server jar.
    pub async fn setup(&self, java_override: Option<&Path>, progress: &mut dyn Progress) -> Result<()> {
        let mc_version = self.pack.require_minecraft_version()?;
        let jar_url = server_jar_url(mc_version, self.pack.loader())?;

        let java = match java::resolve_java(mc_version, java_override, progress).await {
            Ok(java) => java.path,
            Err(e) => {
                tracing::warn!("No compatible Java available, trying java from PATH: {e:#}");
                PathBuf::from("java")
            }
        };

        fs::create_dir_all(&self.run_dir)
            .with_context(|| format!("Failed to create {}", self.run_dir.display()))?;

        // the server refuses to start until the eula is accepted
        fs::write(self.run_dir.join(EULA_FILE), "eula=true\n")?;

        if let Some(icon) = self.pack.icon() {
            copy_file(&icon, &self.run_dir.join(SERVER_ICON))?;
        }

        let installer = ensure_installer_jar(&self.pack.dir, progress).await?;
        run_installer(&self.run_dir, &java, &installer, &self.pack.pack_file(), InstallSide::Server)?;

        let server_jar = self.run_dir.join(SERVER_JAR);
        if server_jar.is_file() {
            tracing::info!("Keeping existing {}", to_slash(&server_jar));
        } else {
            tracing::info!("Downloading server jar from {jar_url}");
            GithubClient::new()?.download_file(&jar_url, &server_jar, progress).await?;
        }

        Ok(())
    }

    /// Run the server in the foreground until it exits
    pub fn start(&self, java_override: Option<&Path>) -> Result<()> {
        let status = self.status();
        if !status.server_jar || !status.eula {
            bail!(Error::ServerNotSetUp);
        }

        let java = match java_override {
            Some(path) => path.to_path_buf(),
            None => self.pack.require_minecraft_version().ok()
                .and_then(java::find_compatible)
                .map(|install| install.path)
                .unwrap_or_else(|| PathBuf::from("java"))
        };

        tracing::info!("Starting server in {}", to_slash(&self.run_dir));

        let exit = match server_command(&self.run_dir, &java).status() {
            Ok(exit) => exit,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                bail!(Error::ToolNotFound(to_slash(&java)))
            },
            Err(e) => return Err(e).context("Failed to start server")
        };

        if !exit.success() {
            bail!(Error::ToolFailed { tool: SERVER_JAR.to_string(), status: exit.to_string() });
        }

        Ok(())
    }

    /// Remove the run directory, `false` when there was nothing to remove
    pub fn delete(&self) -> Result<bool> {
        if !self.run_dir.exists() {
            return Ok(false);
        }

        fs::remove_dir_all(&self.run_dir)
            .with_context(|| format!("Failed to remove {}", self.run_dir.display()))?;

        Ok(true)
    }

    pub async fn reset(&self, java_override: Option<&Path>, progress: &mut dyn Progress) -> Result<()> {
        self.delete()?;
        self.setup(java_override, progress).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoProgress;

    fn pack_with(pack_toml: &str) -> (tempfile::TempDir, LocalServer) {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("pack.toml"), pack_toml).unwrap();

        let pack = Pack::load_dir(tmp.path()).unwrap();
        (tmp, LocalServer::new(pack))
    }

    #[test]
    fn fabric_server_jar_url() {
        let loader = ModLoader { kind: LoaderKind::Fabric, version: String::from("0.15.11") };
        assert_eq!(
            server_jar_url("1.20.1", Some(loader)).unwrap(),
            "https://meta.fabricmc.net/v2/versions/loader/1.20.1/0.15.11/1.1.0/server/jar"
        );
    }

    #[test]
    fn forge_and_vanilla_have_no_server_jar() {
        let loader = ModLoader { kind: LoaderKind::Forge, version: String::from("47.2.0") };
        let err = server_jar_url("1.20.1", Some(loader)).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::UnsupportedServerLoader(k)) if k == "forge"));

        let err = server_jar_url("1.20.1", None).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::UnsupportedServerLoader(k)) if k == "vanilla"));
    }

    #[test]
    fn server_runs_jar_headless_in_run_dir() {
        let cmd = server_command(Path::new("/packs/cool/.run"), Path::new("java"));
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();

        assert_eq!(args, vec!["-Xmx2G", "-Xms1G", "-jar", "server.jar", "nogui"]);
        assert_eq!(cmd.get_current_dir(), Some(Path::new("/packs/cool/.run")));
    }

    #[tokio::test]
    async fn setup_without_minecraft_version_leaves_no_run_dir() {
        let (_tmp, server) = pack_with("name = \"Test\"\n");

        let err = server.setup(Some(Path::new("java")), &mut NoProgress).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::MissingMinecraftVersion)));
        assert!(!server.run_dir().exists());
    }

    #[tokio::test]
    async fn setup_for_forge_pack_leaves_no_run_dir() {
        let (_tmp, server) = pack_with("name = \"Test\"\n[versions]\nminecraft = \"1.20.1\"\nforge = \"47.2.0\"\n");

        let err = server.setup(Some(Path::new("java")), &mut NoProgress).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::UnsupportedServerLoader(_))));
        assert!(!server.run_dir().exists());
    }

    #[test]
    fn start_requires_setup() {
        let (_tmp, server) = pack_with("name = \"Test\"\n[versions]\nminecraft = \"1.20.1\"\n");

        let err = server.start(Some(Path::new("java"))).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::ServerNotSetUp)));
    }

    #[test]
    fn status_and_delete_follow_run_dir() {
        let (_tmp, server) = pack_with("name = \"Test\"\n");
        assert_eq!(server.status(), ServerStatus { set_up: false, server_jar: false, eula: false });
        assert!(!server.delete().unwrap());

        fs::create_dir_all(server.run_dir()).unwrap();
        fs::write(server.run_dir().join(EULA_FILE), "eula=true\n").unwrap();
        assert_eq!(server.status(), ServerStatus { set_up: true, server_jar: false, eula: true });

        assert!(server.delete().unwrap());
        assert!(!server.run_dir().exists());
    }
}
