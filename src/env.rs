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

use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;

/// Environment variable overriding the data directory
pub const DATA_HOME_VAR: &str = "PACKWRAP_DATA_HOME";

/// Environment variable overriding the java executable used for the installer
pub const JAVA_VAR: &str = "PW_JAVA";

pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(var) = env::var(DATA_HOME_VAR) {
        return Ok(PathBuf::from(var));
    }

    // get base data directory from XDG_DATA_HOME, or ~/.local/share
    let base_data_dir = match env::var("XDG_DATA_HOME") {
        Ok(var) => PathBuf::from(var),
        Err(_) if cfg!(windows) => env::var("APPDATA")
            .map(PathBuf::from)
            .map_err(|_| anyhow!("APPDATA env var not found"))?,
        Err(_) => {
            let home_dir = env::var("HOME")
                .map_err(|_| anyhow!("HOME env var not found"))?;

            PathBuf::from(home_dir).join(".local").join("share")
        }
    };

    Ok(base_data_dir.join(get_package_name()))
}

pub fn get_java_dir() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("java"))
}

/// OS name as used in Temurin release asset names
pub fn get_host_os() -> &'static str {
    match env::consts::OS {
        "macos" => "mac",
        os => os
    }
}

/// CPU architecture as used in Temurin release asset names
pub fn get_host_arch() -> &'static str {
    match env::consts::ARCH {
        "x86_64" => "x64",
        "x86" => "x86-32",
        "aarch64" => "aarch64",
        "arm" => "arm",
        _ => "x64"
    }
}

pub fn get_package_name() -> &'static str {
    env!("CARGO_PKG_NAME")
}

pub fn get_package_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
