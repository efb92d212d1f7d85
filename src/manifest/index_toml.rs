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

use serde::Deserialize;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
pub struct IndexToml {
    #[serde(default)]
    pub hash_format: String,

    #[serde(default)]
    pub files: Vec<IndexEntry>
}

#[derive(Deserialize, Debug, Clone)]
pub struct IndexEntry {
    /// Path relative to the pack directory, always `/` separated
    pub file: String,

    #[serde(default)]
    pub hash: String,

    /// True for `.pw.toml` mod descriptors
    #[serde(default)]
    pub metafile: bool
}

impl IndexToml {
    pub fn metafiles(&self) -> impl Iterator<Item = &IndexEntry> {
        self.files.iter().filter(|f| f.metafile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_index_with_metafiles() {
        let index: IndexToml = toml::from_str(r#"
            hash-format = "sha256"

            [[files]]
            file = "config/foo.json"
            hash = "abc"

            [[files]]
            file = "mods/sodium.pw.toml"
            hash = "def"
            metafile = true
        "#).unwrap();

        assert_eq!(index.hash_format, "sha256");
        assert_eq!(index.files.len(), 2);

        let metafiles: Vec<_> = index.metafiles().map(|f| f.file.as_str()).collect();
        assert_eq!(metafiles, vec!["mods/sodium.pw.toml"]);
    }
}
