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
use std::process::Command;

use packwrap::{detect_remote_pack_url, to_slash, Error, Session, SessionEvent};
use super::print_success;

pub fn detect_url(session: &Session, local: bool) -> Result<()> {
    let pack = session.load_pack()?;

    let url = match local {
        true => to_slash(&pack.pack_file()),
        false => detect_remote_pack_url(&pack.dir)?
    };

    println!("{url}");
    Ok(())
}

pub fn change_field(session: &Session, key: &str, value: &str) -> Result<()> {
    let mut pack = session.load_pack()?;
    pack.set_fields(&[(key.to_string(), value.to_string())])?;
    session.notify(&SessionEvent::PackModified);

    print_success(format!("Set {key} to \"{value}\""));
    Ok(())
}

pub fn print_info(session: &Session) -> Result<()> {
    let pack = session.load_pack()?;
    let manifest = &pack.manifest;

    let or_unset = |s: &str| match s {
        "" => style(String::from("(not set)")).dim(),
        s => style(s.to_string())
    };

    println!("{}", style(&manifest.name).bold());
    println!("Author:    {}", or_unset(&manifest.author));
    println!("Version:   {}", or_unset(&manifest.version));
    println!("Minecraft: {}", or_unset(pack.minecraft_version()));

    match pack.loader() {
        Some(loader) => println!("Loader:    {} {}", loader.kind, loader.version),
        None => println!("Loader:    {}", style("none").dim())
    }

    println!("Mods:      {}", pack.mod_count()?);
    println!("Directory: {}", to_slash(&pack.dir));

    Ok(())
}

/// Run an arbitrary command with the pack directory as working directory
pub fn exec_command(session: &Session, command: &[String]) -> Result<()> {
    let pack_dir = session.require_pack_dir()?;

    let Some((program, args)) = command.split_first() else {
        bail!("No command given");
    };

    let status = Command::new(program)
        .args(args)
        .current_dir(pack_dir)
        .status()
        .with_context(|| format!("Failed to run {program}"))?;

    if !status.success() {
        bail!(Error::ToolFailed { tool: program.clone(), status: status.to_string() });
    }

    Ok(())
}

pub fn run_packwiz(session: &Session, args: &[String]) -> Result<()> {
    session.packwiz()?.run(args)
}
