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

#![allow(dead_code)]

use std::{fs, path::{Path, PathBuf}};
use tempfile::TempDir;

use packwrap::INSTALLER_JAR;

pub const PACK_TOML: &str = r#"name = "Cool Pack"
author = "tester"
version = "1.0.0"
pack-format = "packwiz:1.1.0"

[index]
file = "index.toml"
hash-format = "sha256"
hash = ""

[versions]
minecraft = "1.20.1"
fabric = "0.15.11"
"#;

pub const INDEX_TOML: &str = r#"hash-format = "sha256"

[[files]]
file = "config/sodium.json"
hash = ""

[[files]]
file = "mods/sodium.pw.toml"
hash = ""
metafile = true

[[files]]
file = "mods/lithium.pw.toml"
hash = ""
metafile = true
"#;

fn metafile(name: &str, side: &str, update: &str) -> String {
    format!(
        "name = \"{name}\"\n\
         filename = \"{}.jar\"\n\
         side = \"{side}\"\n\n\
         [download]\n\
         url = \"https://example.com/{}.jar\"\n\n\
         {update}",
        name.to_lowercase(), name.to_lowercase()
    )
}

pub const SODIUM_UPDATE: &str = "[update.modrinth]\nmod-id = \"AANobbMI\"\nversion = \"OihdIimA\"\n";

pub const LITHIUM_UPDATE: &str = "[update.curseforge]\nfile-id = 4712866\nproject-id = 360438\n";

pub fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Pack in `<tmp>/cool-pack` with two mods, a config file, a stray mod jar
/// and a cached installer jar so nothing is downloaded
pub fn setup_pack() -> (TempDir, PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let pack_dir = tmp.path().join("cool-pack");

    write(&pack_dir.join("pack.toml"), PACK_TOML);
    write(&pack_dir.join("index.toml"), INDEX_TOML);
    write(&pack_dir.join("mods/sodium.pw.toml"), &metafile("Sodium", "client", SODIUM_UPDATE));
    write(&pack_dir.join("mods/lithium.pw.toml"), &metafile("Lithium", "both", LITHIUM_UPDATE));
    write(&pack_dir.join("mods/local.jar"), "jar");
    write(&pack_dir.join("config/sodium.json"), "{}");
    write(&pack_dir.join("resourcepacks/faithful.zip"), "zip");
    write(&pack_dir.join(INSTALLER_JAR), "bootstrap");
    write(&pack_dir.join("icon.png"), "png");

    let pack_dir = fs::canonicalize(pack_dir).unwrap();

    (tmp, pack_dir)
}

/// Executable shell script named `name` in `dir` that runs `body`
#[cfg(unix)]
pub fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    write(&path, &format!("#!/bin/sh\n{body}\n"));
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

    path
}

/// Shell script standing in for `java`, runs `body` in the install directory
#[cfg(unix)]
pub fn fake_java(dir: &Path, body: &str) -> PathBuf {
    fake_tool(dir, "fake-java.sh", body)
}

/// Shell script standing in for `packwiz`, creates the file passed to `-o`
#[cfg(unix)]
pub fn fake_packwiz(dir: &Path) -> PathBuf {
    fake_tool(dir, "fake-packwiz.sh", r#"while [ $# -gt 0 ]; do
    if [ "$1" = "-o" ]; then touch "$2"; fi
    shift
done"#)
}

/// Unpack an export archive for inspection
pub fn unzip(archive: &Path) -> TempDir {
    let out = tempfile::tempdir().unwrap();
    packwrap::extract_zip(fs::File::open(archive).unwrap(), out.path()).unwrap();
    out
}
