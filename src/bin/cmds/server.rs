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
use console::style;
use std::path::Path;

use crate::ProgressHandler;
use packwrap::{java, to_slash, ServerStatus, Session};
use super::print_success;

pub async fn setup_server(session: &Session, java_override: Option<&Path>) -> Result<()> {
    let server = session.local_server()?;
    let mut progress = ProgressHandler::new();

    server.setup(java_override, &mut progress).await?;

    print_success(format!("Server set up in {}", to_slash(server.run_dir())));
    println!("Start it with `pw server start`");
    Ok(())
}

pub fn start_server(session: &Session, java_override: Option<&Path>) -> Result<()> {
    let server = session.local_server()?;

    println!("Starting server in {}, stop it with Ctrl+C", to_slash(server.run_dir()));
    server.start(java_override)
}

pub fn stop_server() -> Result<()> {
    println!("The server runs in the foreground of `pw server start`, stop it with Ctrl+C");
    Ok(())
}

pub async fn reset_server(session: &Session, java_override: Option<&Path>) -> Result<()> {
    let server = session.local_server()?;
    let mut progress = ProgressHandler::new();

    server.reset(java_override, &mut progress).await?;

    print_success(format!("Server reset in {}", to_slash(server.run_dir())));
    Ok(())
}

pub fn delete_server(session: &Session) -> Result<()> {
    let server = session.local_server()?;

    match server.delete()? {
        true => print_success(format!("Deleted {}", to_slash(server.run_dir()))),
        false => println!("No server directory at {}", to_slash(server.run_dir()))
    }

    Ok(())
}

fn check(present: bool) -> String {
    match present {
        true => style("yes").green().to_string(),
        false => style("no").red().to_string()
    }
}

pub fn server_status(session: &Session) -> Result<()> {
    let server = session.local_server()?;
    let pack = server.pack();
    let ServerStatus { set_up, server_jar, eula } = server.status();

    println!("Directory:  {} ({})", to_slash(server.run_dir()), check(set_up));

    let mc_version = pack.minecraft_version();
    match mc_version {
        "" => println!("Minecraft:  {}", style("not set").red()),
        v => println!("Minecraft:  {v}")
    }

    match pack.loader() {
        Some(loader) => println!("Loader:     {} {}", loader.kind, loader.version),
        None => println!("Loader:     {}", style("none").dim())
    }

    if !mc_version.is_empty() {
        match java::find_compatible(mc_version) {
            Some(install) => println!("Java:       {} at {}", install.version, to_slash(&install.path)),
            None => println!("Java:       {}", style("no compatible install").yellow())
        }
    }

    println!("server.jar: {}", check(server_jar));
    println!("eula.txt:   {}", check(eula));

    Ok(())
}
