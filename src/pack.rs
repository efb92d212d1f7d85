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
use std::{fs, path::{Path, PathBuf}};

use crate::{
    locator::{self, to_slash},
    manifest::{IndexToml, ModLoader, ModToml, PackToml, Side},
    Error
};

pub const PACK_FILE: &str = "pack.toml";
pub const INDEX_FILE: &str = "index.toml";
pub const METAFILE_SUFFIX: &str = ".pw.toml";

/// Fields of `pack.toml` that may be rewritten in place
const EDITABLE_FIELDS: [&str; 3] = ["name", "author", "version"];

#[derive(Debug)]
pub struct Pack {
    /// Absolute path of the directory containing `pack.toml`
    pub dir: PathBuf,

    pub manifest: PackToml
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModSource {
    Modrinth { mod_id: String, version: String },
    CurseForge { project_id: u64, file_id: u64 }
}

#[derive(Debug, Clone)]
pub struct Mod {
    pub name: String,
    pub filename: String,
    pub side: Side,
    pub download_url: String,
    pub source: Option<ModSource>,

    /// Metafile name without the `.pw.toml` suffix, usually the project slug
    pub parse_id: String,

    /// Metafile path relative to the pack directory
    pub metafile: String
}

impl Mod {
    fn from_toml(metafile: &str, toml: ModToml) -> Self {
        let parse_id = metafile.rsplit('/')
            .next()
            .unwrap_or(metafile)
            .trim_end_matches(METAFILE_SUFFIX)
            .to_string();

        let source = match (toml.update.modrinth, toml.update.curseforge) {
            (Some(mr), _) => Some(ModSource::Modrinth { mod_id: mr.mod_id, version: mr.version }),
            (None, Some(cf)) => Some(ModSource::CurseForge { project_id: cf.project_id, file_id: cf.file_id }),
            (None, None) => None
        };

        Mod {
            name: toml.name,
            filename: toml.filename,
            side: toml.side,
            download_url: toml.download.url,
            source,
            parse_id,
            metafile: metafile.to_string()
        }
    }
}

impl Pack {
    /// Locate and load the pack containing `start_dir`
    pub fn load(start_dir: &Path) -> Result<Pack> {
        let start_dir = fs::canonicalize(start_dir)
            .with_context(|| format!("Directory '{}' not found", start_dir.display()))?;

        match locator::locate(&start_dir) {
            Some(dir) => Pack::load_dir(&dir),
            None => bail!(Error::PackNotFound(to_slash(&start_dir)))
        }
    }

    /// Load the pack whose `pack.toml` is directly in `pack_dir`
    pub fn load_dir(pack_dir: &Path) -> Result<Pack> {
        let pack_file = pack_dir.join(PACK_FILE);
        if !pack_file.is_file() {
            bail!(Error::PackNotFound(to_slash(pack_dir)));
        }

        let text = fs::read_to_string(&pack_file)
            .with_context(|| format!("Failed to read {}", pack_file.display()))?;
        let manifest: PackToml = toml::from_str(&text)
            .with_context(|| format!("Failed to parse {}", pack_file.display()))?;

        Ok(Pack { dir: pack_dir.to_path_buf(), manifest })
    }

    pub fn pack_file(&self) -> PathBuf {
        self.dir.join(PACK_FILE)
    }

    pub fn index_file(&self) -> PathBuf {
        self.dir.join(&self.manifest.index.file)
    }

    /// Empty when neither `[versions].minecraft` nor `mc-version` is set
    pub fn minecraft_version(&self) -> &str {
        self.manifest.minecraft_version()
    }

    pub fn require_minecraft_version(&self) -> Result<&str> {
        match self.minecraft_version() {
            "" => bail!(Error::MissingMinecraftVersion),
            v => Ok(v)
        }
    }

    pub fn loader(&self) -> Option<ModLoader> {
        self.manifest.loader()
    }

    pub fn project_root(&self) -> PathBuf {
        locator::project_root(&self.dir)
    }

    /// `icon.png` from the pack directory or the project root
    pub fn icon(&self) -> Option<PathBuf> {
        [self.dir.join("icon.png"), self.project_root().join("icon.png")]
            .into_iter()
            .find(|p| p.is_file())
    }

    /// Archive base name derived from the project directory name
    pub fn project_name(&self) -> String {
        let root = self.project_root();
        let dir_name = root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        sanitize_name(&dir_name)
    }

    pub fn index(&self) -> Result<IndexToml> {
        let index_file = self.index_file();
        let text = fs::read_to_string(&index_file)
            .with_context(|| format!("Failed to read {}", index_file.display()))?;

        Ok(toml::from_str(&text)
            .with_context(|| format!("Failed to parse {}", index_file.display()))?)
    }

    /// Decode every metafile listed in the index.
    ///
    /// A metafile that can't be read or parsed is logged and skipped.
    pub fn mods(&self) -> Result<Vec<Mod>> {
        let index = self.index()?;

        let mods = index.metafiles()
            .filter_map(|entry| match self.read_metafile(&entry.file) {
                Ok(m) => Some(m),
                Err(e) => {
                    tracing::warn!("Skipping mod {}: {e:#}", entry.file);
                    None
                }
            })
            .collect();

        Ok(mods)
    }

    pub fn mod_count(&self) -> Result<usize> {
        Ok(self.mods()?.len())
    }

    fn read_metafile(&self, rel_path: &str) -> Result<Mod> {
        let text = fs::read_to_string(self.dir.join(rel_path))?;
        let toml: ModToml = toml::from_str(&text)?;
        Ok(Mod::from_toml(rel_path, toml))
    }

    /// Rewrite `name`, `author` or `version` in `pack.toml`, leaving other lines untouched
    pub fn set_fields(&mut self, fields: &[(String, String)]) -> Result<()> {
        for (key, _) in fields {
            if !EDITABLE_FIELDS.contains(&key.as_str()) {
                bail!(Error::InvalidPackField(key.clone()));
            }
        }

        let pack_file = self.pack_file();
        let text = fs::read_to_string(&pack_file)?;
        let updated = set_toml_fields(&text, fields);
        fs::write(&pack_file, updated)?;

        self.manifest = toml::from_str(&fs::read_to_string(&pack_file)?)?;
        tracing::info!("Updated {}", pack_file.display());

        Ok(())
    }
}

/// Lowercase the name, turn spaces into `-` and drop anything else unsafe
pub fn sanitize_name(name: &str) -> String {
    let name: String = name.to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_')
        .collect();

    if name.is_empty() {
        String::from("modpack")
    } else {
        name
    }
}

fn is_key_line(line: &str, key: &str) -> bool {
    line.trim_start()
        .strip_prefix(key)
        .map(|rest| rest.trim_start().starts_with('='))
        .unwrap_or(false)
}

/// Replace top-level `key = ...` lines, appending missing keys before the first table
fn set_toml_fields(text: &str, fields: &[(String, String)]) -> String {
    let mut lines: Vec<String> = text.lines().map(String::from).collect();

    let first_table = lines.iter()
        .position(|l| l.trim_start().starts_with('['))
        .unwrap_or(lines.len());

    let mut missing = Vec::new();
    for (key, value) in fields {
        let line = format!("{key} = {}", toml::Value::String(value.clone()));

        match lines[..first_table].iter().position(|l| is_key_line(l, key)) {
            Some(i) => lines[i] = line,
            None => missing.push(line)
        }
    }

    // insert after the last non-blank top-level line
    let insert_at = lines[..first_table].iter()
        .rposition(|l| !l.trim().is_empty())
        .map(|i| i + 1)
        .unwrap_or(0);

    for (offset, line) in missing.into_iter().enumerate() {
        lines.insert(insert_at + offset, line);
    }

    let mut out = lines.join("\n");
    if text.ends_with('\n') {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACK: &str = r#"name = "Cool Pack"
author = "someone"
version = "1.0.0"
pack-format = "packwiz:1.1.0"

[index]
file = "index.toml"
hash-format = "sha256"
hash = "abc"

[versions]
minecraft = "1.20.1"
name = "not a top level key"
"#;

    #[test]
    fn loaded_pack_debug_names_dir_and_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(PACK_FILE), PACK).unwrap();

        let pack = Pack::load_dir(tmp.path()).unwrap();
        let debug = format!("{pack:?}");

        assert!(debug.contains("Cool Pack"));
        assert!(debug.contains(&tmp.path().display().to_string()));
    }

    #[test]
    fn icon_found_in_project_root_of_minecraft_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let mc_dir = tmp.path().join(".minecraft");
        std::fs::create_dir_all(&mc_dir).unwrap();
        std::fs::write(mc_dir.join(PACK_FILE), PACK).unwrap();

        let pack = Pack::load_dir(&mc_dir).unwrap();
        assert_eq!(pack.icon(), None);

        std::fs::write(tmp.path().join("icon.png"), "png").unwrap();
        assert_eq!(pack.icon(), Some(tmp.path().join("icon.png")));
    }

    #[test]
    fn set_fields_replaces_existing_keys() {
        let out = set_toml_fields(PACK, &[
            (String::from("version"), String::from("1.1.0")),
            (String::from("name"), String::from("Cooler \"Pack\""))
        ]);

        let parsed: PackToml = toml::from_str(&out).unwrap();
        assert_eq!(parsed.version, "1.1.0");
        assert_eq!(parsed.name, "Cooler \"Pack\"");
        assert_eq!(parsed.author, "someone");
        assert_eq!(parsed.versions.minecraft.as_deref(), Some("1.20.1"));
        assert!(out.contains("name = \"not a top level key\""));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn set_fields_appends_missing_key_before_tables() {
        let text = "name = \"Pack\"\n\n[versions]\nminecraft = \"1.21\"\n";
        let out = set_toml_fields(text, &[(String::from("author"), String::from("me"))]);

        assert_eq!(out, "name = \"Pack\"\nauthor = \"me\"\n\n[versions]\nminecraft = \"1.21\"\n");
    }

    #[test]
    fn key_line_requires_exact_key() {
        assert!(is_key_line("version = \"1\"", "version"));
        assert!(is_key_line("  version=\"1\"", "version"));
        assert!(!is_key_line("versions = 1", "version"));
    }

    #[test]
    fn sanitize_project_names() {
        assert_eq!(sanitize_name("My Cool Pack!"), "my-cool-pack");
        assert_eq!(sanitize_name("pack_v2"), "pack_v2");
        assert_eq!(sanitize_name("???"), "modpack");
    }

    #[test]
    fn parse_id_strips_metafile_suffix() {
        let toml: ModToml = toml::from_str("name = \"Sodium\"").unwrap();
        let m = Mod::from_toml("mods/sodium.pw.toml", toml);

        assert_eq!(m.parse_id, "sodium");
        assert_eq!(m.source, None);
    }
}
