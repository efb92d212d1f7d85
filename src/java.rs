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

use anyhow::{anyhow, bail, Context, Result};
use semver::Version;
use std::{env, fs::{self, File}, path::{Path, PathBuf}, process::Command};

use crate::{archive, env as pw_env, github_client::GithubClient, Error, Progress};

/// Java versions with a managed Temurin runtime
pub const MANAGED_VERSIONS: [u32; 3] = [8, 17, 21];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaInstall {
    /// Path or command name of the java executable
    pub path: PathBuf,

    /// Full version string, eg. `17.0.2` or `1.8.0_391`
    pub version: String,

    pub major: u32,

    /// Installed under the packwrap data dir
    pub managed: bool
}

fn parse_mc_version(mc_version: &str) -> Option<Version> {
    lenient_semver::parse(mc_version).ok()
}

/// Java major version a Minecraft version is built for.
///
/// Versions that don't parse (eg. snapshots like `24w14a`) are treated as current.
pub fn required_java_version(mc_version: &str) -> u32 {
    match parse_mc_version(mc_version) {
        Some(v) if v >= Version::new(1, 20, 5) => 21,
        Some(v) if v >= Version::new(1, 13, 0) => 17,
        Some(_) => 8,
        None => {
            tracing::warn!("Unable to parse Minecraft version '{mc_version}', assuming Java 21");
            21
        }
    }
}

/// Lowest Java major version that can still run a Minecraft version
pub fn minimum_java_version(mc_version: &str) -> u32 {
    match parse_mc_version(mc_version) {
        Some(v) if v >= Version::new(1, 20, 5) => 21,
        Some(v) if v >= Version::new(1, 17, 0) => 17,
        Some(_) => 8,
        None => 21
    }
}

/// Extract the quoted version from `java -version` output
fn parse_version_output(output: &str) -> Option<String> {
    let start = output.find("version \"")? + "version \"".len();
    let end = output[start..].find('"')?;
    Some(output[start..start + end].to_string())
}

/// Major version from a Java version string, `1.8.0_391` is 8
fn parse_major_version(version: &str) -> Option<u32> {
    let mut parts = version.split(|c: char| !c.is_ascii_digit());
    match parts.next()?.parse().ok()? {
        1 => parts.next()?.parse().ok(),
        major => Some(major)
    }
}

/// Run `<java> -version` and parse its output
pub fn detect_java(java: &Path) -> Result<JavaInstall> {
    let output = Command::new(java)
        .arg("-version")
        .output()
        .with_context(|| format!("Failed to run {}", java.display()))?;

    // java prints version info on stderr
    let text = String::from_utf8_lossy(&output.stderr);
    let version = parse_version_output(&text)
        .or_else(|| parse_version_output(&String::from_utf8_lossy(&output.stdout)))
        .ok_or_else(|| anyhow!("Unrecognized version output from {}", java.display()))?;

    let major = parse_major_version(&version)
        .ok_or_else(|| anyhow!("Unrecognized java version '{version}'"))?;

    Ok(JavaInstall { path: java.to_path_buf(), version, major, managed: false })
}

/// `bin/java` under a java home directory
pub fn java_executable(java_home: &Path) -> PathBuf {
    let exe = if cfg!(windows) { "java.exe" } else { "java" };
    java_home.join("bin").join(exe)
}

pub fn managed_java_dir(major: u32) -> Result<PathBuf> {
    Ok(pw_env::get_java_dir()?.join(format!("java-{major}")))
}

fn check_managed_version(major: u32) -> Result<()> {
    if !MANAGED_VERSIONS.contains(&major) {
        bail!(Error::UnsupportedJavaVersion(major));
    }

    Ok(())
}

/// Executable of an installed managed runtime
pub fn managed_java(major: u32) -> Result<PathBuf> {
    check_managed_version(major)?;
    installed_java(&managed_java_dir(major)?, major)
}

fn installed_java(java_home: &Path, major: u32) -> Result<PathBuf> {
    let java_exe = java_executable(java_home);
    if !java_exe.is_file() {
        bail!(Error::JavaNotInstalled(major));
    }

    Ok(java_exe)
}

/// Delete a managed runtime, `false` when it wasn't installed
pub fn remove_managed(major: u32) -> Result<bool> {
    check_managed_version(major)?;
    remove_java_home(&managed_java_dir(major)?)
}

fn remove_java_home(java_home: &Path) -> Result<bool> {
    if !java_home.exists() {
        return Ok(false);
    }

    fs::remove_dir_all(java_home)
        .with_context(|| format!("Failed to remove {}", java_home.display()))?;
    tracing::info!("Removed {}", java_home.display());

    Ok(true)
}

fn managed_installations() -> Result<Vec<JavaInstall>> {
    let java_dir = pw_env::get_java_dir()?;
    if !java_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut installs = Vec::new();
    for entry in fs::read_dir(&java_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }

        match detect_java(&java_executable(&entry.path())) {
            Ok(install) => installs.push(JavaInstall { managed: true, ..install }),
            Err(e) => tracing::debug!("Ignoring {}: {e:#}", entry.path().display())
        }
    }

    Ok(installs)
}

/// Java on PATH, under JAVA_HOME and in the managed runtime directory
pub fn find_installations() -> Vec<JavaInstall> {
    let mut candidates = vec![PathBuf::from("java")];
    if let Ok(java_home) = env::var("JAVA_HOME") {
        candidates.push(java_executable(Path::new(&java_home)));
    }

    let mut installs: Vec<JavaInstall> = candidates.iter()
        .filter_map(|c| match detect_java(c) {
            Ok(install) => Some(install),
            Err(e) => {
                tracing::debug!("No java at {}: {e:#}", c.display());
                None
            }
        })
        .collect();

    match managed_installations() {
        Ok(managed) => installs.extend(managed),
        Err(e) => tracing::warn!("Failed to scan managed java installs: {e:#}")
    }

    installs
}

/// Prefer an exact match of `required`, otherwise anything at least `minimum`
pub fn select_java(installs: &[JavaInstall], required: u32, minimum: u32) -> Option<&JavaInstall> {
    installs.iter()
        .find(|j| j.major == required)
        .or_else(|| installs.iter().find(|j| j.major >= minimum))
}

pub fn find_compatible(mc_version: &str) -> Option<JavaInstall> {
    let installs = find_installations();
    select_java(
        &installs,
        required_java_version(mc_version),
        minimum_java_version(mc_version)
    ).cloned()
}

/// Find a compatible java, installing a managed runtime when none is found
pub async fn ensure_java(mc_version: &str, progress: &mut dyn Progress) -> Result<JavaInstall> {
    if let Some(java) = find_compatible(mc_version) {
        tracing::info!("Using Java {} at {}", java.version, java.path.display());
        return Ok(java);
    }

    let required = required_java_version(mc_version);
    tracing::info!("No compatible Java found for Minecraft {mc_version}, installing Java {required}");

    install_managed(required, progress).await
        .with_context(|| Error::JavaNotFound(required))
}

/// The `java_override` executable when given, otherwise [`ensure_java`]
pub async fn resolve_java(
    mc_version: &str,
    java_override: Option<&Path>,
    progress: &mut dyn Progress
) -> Result<JavaInstall> {
    match java_override {
        Some(path) => Ok(JavaInstall {
            path: path.to_path_buf(),
            version: String::new(),
            major: required_java_version(mc_version),
            managed: false
        }),
        None => ensure_java(mc_version, progress).await
    }
}

fn temurin_asset_prefix(major: u32) -> String {
    format!(
        "OpenJDK{major}U-jre_{arch}_{os}_hotspot_",
        arch = pw_env::get_host_arch(),
        os = pw_env::get_host_os()
    )
}

/// Download and unpack the latest Temurin JRE for `major`
pub async fn install_managed(major: u32, progress: &mut dyn Progress) -> Result<JavaInstall> {
    check_managed_version(major)?;

    let client = GithubClient::new()?;
    let release = client.latest_release(&format!("adoptium/temurin{major}-binaries")).await?;

    let prefix = temurin_asset_prefix(major);
    let asset = release.find_asset(|name| name.starts_with(&prefix) && name.ends_with(".zip"))
        .ok_or_else(|| Error::AssetNotFound(format!("{prefix}*.zip")))?;

    let install_dir = managed_java_dir(major)?;
    let zip_path = install_dir.with_extension("zip");
    let temp_dir = install_dir.with_extension("temp");

    client.download_file(&asset.browser_download_url, &zip_path, progress).await?;

    if temp_dir.exists() {
        fs::remove_dir_all(&temp_dir)?;
    }

    let unpacked = archive::extract_zip(File::open(&zip_path)?, &temp_dir)
        .and_then(|_| move_jre_root(&temp_dir, &install_dir));

    fs::remove_file(&zip_path)?;
    if temp_dir.exists() {
        fs::remove_dir_all(&temp_dir)?;
    }
    unpacked?;

    let java = detect_java(&java_executable(&install_dir))?;
    tracing::info!("Installed Java {} to {}", java.version, install_dir.display());

    Ok(JavaInstall { managed: true, ..java })
}

/// Temurin archives hold a single `jdk-*-jre` directory, move it to `install_dir`
fn move_jre_root(temp_dir: &Path, install_dir: &Path) -> Result<()> {
    let root = fs::read_dir(temp_dir)?
        .filter_map(|e| e.ok())
        .find(|e| e.path().is_dir())
        .ok_or_else(|| anyhow!("No java directory found in archive"))?;

    if install_dir.exists() {
        fs::remove_dir_all(install_dir)?;
    }

    fs::rename(root.path(), install_dir)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn install(major: u32) -> JavaInstall {
        JavaInstall {
            path: PathBuf::from(format!("/opt/java-{major}/bin/java")),
            version: major.to_string(),
            major,
            managed: false
        }
    }

    #[test]
    fn required_java_for_minecraft_versions() {
        assert_eq!(required_java_version("1.20.4"), 17);
        assert_eq!(required_java_version("1.21"), 21);
        assert_eq!(required_java_version("1.20.5"), 21);
        assert_eq!(required_java_version("1.13"), 17);
        assert_eq!(required_java_version("1.12.2"), 8);
        assert_eq!(required_java_version("1.7.10"), 8);
    }

    #[test]
    fn minimum_java_for_minecraft_versions() {
        assert_eq!(minimum_java_version("1.16.5"), 8);
        assert_eq!(minimum_java_version("1.17.1"), 17);
        assert_eq!(minimum_java_version("1.20.6"), 21);
    }

    #[test]
    fn parse_java_version_output() {
        let openjdk = "openjdk version \"17.0.2\" 2022-01-18\nOpenJDK Runtime Environment";
        assert_eq!(parse_version_output(openjdk).as_deref(), Some("17.0.2"));

        let oracle = "java version \"1.8.0_391\"\nJava(TM) SE Runtime Environment";
        assert_eq!(parse_version_output(oracle).as_deref(), Some("1.8.0_391"));

        assert_eq!(parse_version_output("command not found"), None);
    }

    #[test]
    fn parse_java_major_versions() {
        assert_eq!(parse_major_version("1.8.0_391"), Some(8));
        assert_eq!(parse_major_version("17.0.2"), Some(17));
        assert_eq!(parse_major_version("21"), Some(21));
        assert_eq!(parse_major_version("21-ea"), Some(21));
        assert_eq!(parse_major_version("abc"), None);
    }

    #[test]
    fn select_prefers_exact_major() {
        let installs = vec![install(21), install(17), install(8)];
        assert_eq!(select_java(&installs, 17, 17).map(|j| j.major), Some(17));
        assert_eq!(select_java(&installs, 8, 8).map(|j| j.major), Some(8));
    }

    #[test]
    fn select_falls_back_to_newer_java() {
        let installs = vec![install(8), install(21)];
        assert_eq!(select_java(&installs, 17, 17).map(|j| j.major), Some(21));

        let installs = vec![install(8)];
        assert_eq!(select_java(&installs, 17, 17), None);
    }

    #[test]
    fn unmanaged_versions_rejected() {
        let err = managed_java(11).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::UnsupportedJavaVersion(11))));

        let err = remove_managed(11).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::UnsupportedJavaVersion(11))));
    }

    #[test]
    fn missing_runtime_is_not_installed() {
        let tmp = tempfile::tempdir().unwrap();
        let err = installed_java(&tmp.path().join("java-17"), 17).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::JavaNotInstalled(17))));
    }

    #[test]
    fn installed_runtime_resolves_to_executable() {
        let tmp = tempfile::tempdir().unwrap();
        let java_home = tmp.path().join("java-21");
        let java_exe = java_executable(&java_home);
        fs::create_dir_all(java_exe.parent().unwrap()).unwrap();
        fs::write(&java_exe, "").unwrap();

        assert_eq!(installed_java(&java_home, 21).unwrap(), java_exe);
    }

    #[test]
    fn remove_java_home_deletes_runtime() {
        let tmp = tempfile::tempdir().unwrap();
        let java_home = tmp.path().join("java-8");
        fs::create_dir_all(java_home.join("bin")).unwrap();
        fs::write(java_home.join("release"), "JAVA_VERSION=\"1.8.0\"").unwrap();

        assert!(remove_java_home(&java_home).unwrap());
        assert!(!java_home.exists());
        assert!(!remove_java_home(&java_home).unwrap());
    }

    #[tokio::test]
    async fn override_skips_discovery() {
        let java = resolve_java("1.20.1", Some(Path::new("/opt/jdk/bin/java")), &mut crate::NoProgress)
            .await
            .unwrap();

        assert_eq!(java.path, PathBuf::from("/opt/jdk/bin/java"));
        assert_eq!(java.major, 17);
        assert!(!java.managed);
    }
}
