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
use console::style;
use std::{path::Path, process::Command};

use crate::ProgressHandler;
use packwrap::{java, to_slash, Error, Session};
use super::print_success;

pub fn list_java() -> Result<()> {
    let installs = java::find_installations();

    if installs.is_empty() {
        println!("No Java installations found");
        return Ok(());
    }

    for install in installs {
        let managed = match install.managed {
            true => style(" (managed)").dim().to_string(),
            false => String::new()
        };

        println!(
            "Java {:<3} {:<14} {}{managed}",
            install.major, install.version, to_slash(&install.path)
        );
    }

    Ok(())
}

pub fn java_status(session: &Session, java_override: Option<&Path>) -> Result<()> {
    let pack = session.load_pack()?;
    let mc_version = pack.require_minecraft_version()?;

    let required = java::required_java_version(mc_version);
    let minimum = java::minimum_java_version(mc_version);

    println!("Minecraft {mc_version} requires Java {required} (minimum {minimum})");

    let selected = match java_override {
        Some(path) => Some(java::detect_java(path)?),
        None => java::find_compatible(mc_version)
    };

    match selected {
        Some(install) if install.major >= minimum => print_success(format!(
            "Using Java {} at {}", install.version, to_slash(&install.path)
        )),
        Some(install) => println!(
            "{} Java {} at {} is older than Java {minimum}",
            style("!").yellow().bold(), install.version, to_slash(&install.path)
        ),
        None => println!(
            "{} No compatible Java found, it will be installed on the next build or with `pw java install {required}`",
            style("!").yellow().bold()
        )
    }

    Ok(())
}

pub async fn install_java(version: u32) -> Result<()> {
    let mut progress = ProgressHandler::new();

    let install = java::install_managed(version, &mut progress).await?;

    print_success(format!("Installed Java {} to {}", install.version, to_slash(&install.path)));
    Ok(())
}

pub fn java_path(version: u32) -> Result<()> {
    println!("{}", to_slash(&java::managed_java(version)?));
    Ok(())
}

pub fn remove_java(version: u32) -> Result<()> {
    match java::remove_managed(version)? {
        true => print_success(format!("Removed Java {version}")),
        false => println!("Java {version} is not installed")
    }

    Ok(())
}

/// `pw java <version> [args...]`, run a managed runtime with inherited stdio
pub fn run_java(args: &[String]) -> Result<()> {
    let Some((version, args)) = args.split_first() else {
        bail!("No Java version given");
    };

    let Ok(major) = version.parse::<u32>() else {
        bail!("Unknown java command '{version}'");
    };

    let java_exe = java::managed_java(major)?;
    let status = Command::new(&java_exe)
        .args(args)
        .status()
        .with_context(|| format!("Failed to run {}", to_slash(&java_exe)))?;

    if !status.success() {
        bail!(Error::ToolFailed { tool: format!("java {major}"), status: status.to_string() });
    }

    Ok(())
}
