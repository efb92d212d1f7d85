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
use std::{collections::BTreeMap, fs::{self, File, OpenOptions}, io, path::{Path, PathBuf}};
use walkdir::WalkDir;
use zip::{write::SimpleFileOptions, ZipArchive, ZipWriter};

use crate::{locator::to_slash, Error};

// extract/create adapted from examples here
// https://github.com/zip-rs/zip/tree/21a20584bc9e05dfa4f3c5b0bc420a1389fae2c3/examples

pub fn extract_zip(zip_file: File, out_dir: &Path) -> Result<()> {
    let mut archive = ZipArchive::new(zip_file)?;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let outpath = match file.enclosed_name() {
            Some(path) => out_dir.join(path),
            None => continue,
        };

        if file.is_dir() {
            fs::create_dir_all(&outpath)?;
        } else {
            if let Some(p) = outpath.parent() {
                fs::create_dir_all(p)?;
            }
            let mut outfile = File::create(&outpath)?;
            io::copy(&mut file, &mut outfile)?;
        }

        set_mode(&outpath, file.unix_mode())?;
    }

    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: Option<u32>) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    match mode {
        Some(mode) => fs::set_permissions(path, fs::Permissions::from_mode(mode)),
        None => Ok(())
    }
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: Option<u32>) -> io::Result<()> {
    Ok(())
}

/// Zip everything under `src_dir` into a new archive at `out`
pub fn build_zip(src_dir: &Path, out: &Path) -> Result<()> {
    write_archive(out, |zip| add_tree(zip, src_dir, ""))
}

/// Zip an explicit mapping of archive path to local file or directory.
///
/// A directory is added recursively under its archive path, an empty archive
/// path merges its contents into the archive root.
pub fn build_zip_from_map(entries: &BTreeMap<String, PathBuf>, out: &Path) -> Result<()> {
    write_archive(out, |zip| {
        let options = SimpleFileOptions::default();

        for (name, local) in entries {
            let name = name.trim_matches('/');

            if local.is_dir() {
                if !name.is_empty() {
                    zip.add_directory(format!("{name}/"), options)?;
                }
                add_tree(zip, local, name)?;
            } else {
                add_file(zip, local, name.to_string())?;
            }
        }

        Ok(())
    })
}

/// Create `out` exclusively and run `build` against it, deleting the file on failure
fn write_archive<F>(out: &Path, build: F) -> Result<()>
    where F: FnOnce(&mut ZipWriter<File>) -> Result<()>
{
    if let Some(parent) = out.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = match OpenOptions::new().write(true).create_new(true).open(out) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            bail!(Error::OutputExists(to_slash(out)))
        },
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to create {}", out.display()))
        }
    };

    let mut zip = ZipWriter::new(file);
    let result = build(&mut zip)
        .and_then(|_| Ok(zip.finish().map(|_| ())?));

    if let Err(e) = result {
        if let Err(rm) = fs::remove_file(out) {
            tracing::warn!("Failed to remove partial archive {}: {rm}", out.display());
        }
        return Err(e);
    }

    tracing::debug!("Wrote archive {}", out.display());

    Ok(())
}

fn add_tree(zip: &mut ZipWriter<File>, src_dir: &Path, prefix: &str) -> Result<()> {
    let options = SimpleFileOptions::default();

    for entry in WalkDir::new(src_dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let rel_path = to_slash(entry.path().strip_prefix(src_dir)?);

        let name = match prefix {
            "" => rel_path,
            prefix => format!("{prefix}/{rel_path}")
        };

        // Write file or directory explicitly
        // Some unzip tools unzip files with directory paths correctly, some do not!
        if entry.file_type().is_dir() {
            zip.add_directory(format!("{name}/"), options)?;
        } else {
            add_file(zip, entry.path(), name)?;
        }
    }

    Ok(())
}

fn add_file(zip: &mut ZipWriter<File>, local: &Path, name: String) -> Result<()> {
    let mut f = File::open(local)
        .with_context(|| format!("Failed to open {}", local.display()))?;

    zip.start_file(name, SimpleFileOptions::default())?;
    io::copy(&mut f, zip)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, body: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    fn entry_names(zip_path: &Path) -> Vec<String> {
        let archive = ZipArchive::new(File::open(zip_path).unwrap()).unwrap();
        archive.file_names().map(String::from).collect()
    }

    #[test]
    fn zip_then_extract_preserves_contents() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();

        write(&src.path().join("pack.toml"), "name = \"x\"");
        write(&src.path().join("config/deep/nested.json"), "{\"a\": 1}");
        write(&src.path().join("mods/a.pw.toml"), "name = \"a\"");
        fs::create_dir_all(src.path().join("empty")).unwrap();

        let zip_path = out.path().join("pack.zip");
        build_zip(src.path(), &zip_path).unwrap();

        let mut names = entry_names(&zip_path);
        names.sort();
        assert!(names.contains(&String::from("config/deep/nested.json")));
        assert!(names.contains(&String::from("config/deep/")));
        assert!(names.contains(&String::from("empty/")));
        assert!(names.iter().all(|n| !n.contains('\\')));

        let extracted = out.path().join("extracted");
        extract_zip(File::open(&zip_path).unwrap(), &extracted).unwrap();

        for rel in ["pack.toml", "config/deep/nested.json", "mods/a.pw.toml"] {
            assert_eq!(
                fs::read(src.path().join(rel)).unwrap(),
                fs::read(extracted.join(rel)).unwrap()
            );
        }
        assert!(extracted.join("empty").is_dir());
    }

    #[test]
    fn zip_refuses_to_overwrite() {
        let src = tempfile::tempdir().unwrap();
        write(&src.path().join("a.txt"), "a");

        let out = tempfile::tempdir().unwrap();
        let zip_path = out.path().join("pack.zip");
        fs::write(&zip_path, "existing").unwrap();

        let err = build_zip(src.path(), &zip_path).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::OutputExists(_))));
        assert_eq!(fs::read_to_string(&zip_path).unwrap(), "existing");
    }

    #[test]
    fn zip_from_map_renames_and_merges() {
        let src = tempfile::tempdir().unwrap();
        write(&src.path().join("icon.png"), "png");
        write(&src.path().join("game/options.txt"), "opts");
        write(&src.path().join("root/instance.cfg"), "cfg");

        let entries = BTreeMap::from([
            (String::from("cool_icon.png"), src.path().join("icon.png")),
            (String::from(".minecraft"), src.path().join("game")),
            (String::new(), src.path().join("root"))
        ]);

        let out = tempfile::tempdir().unwrap();
        let zip_path = out.path().join("pack.zip");
        build_zip_from_map(&entries, &zip_path).unwrap();

        let names = entry_names(&zip_path);
        assert!(names.contains(&String::from("cool_icon.png")));
        assert!(names.contains(&String::from(".minecraft/")));
        assert!(names.contains(&String::from(".minecraft/options.txt")));
        assert!(names.contains(&String::from("instance.cfg")));
    }

    #[test]
    fn failed_zip_leaves_no_partial_file() {
        let out = tempfile::tempdir().unwrap();
        let zip_path = out.path().join("pack.zip");

        let entries = BTreeMap::from([
            (String::from("missing.txt"), out.path().join("does-not-exist.txt"))
        ]);

        assert!(build_zip_from_map(&entries, &zip_path).is_err());
        assert!(!zip_path.exists());
    }
}
