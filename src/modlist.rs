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

use std::fmt::Write;

use crate::{manifest::Side, pack::{Mod, ModSource}};

pub const MODLIST_FILE: &str = "modlist.md";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModlistFormat {
    /// `# Modlist` document with a section per side
    Markdown,

    /// Name and url pairs separated by blank lines
    Raw
}

/// Mods of a pack grouped by side, in index order
pub struct Modlist {
    pub client: Vec<Mod>,
    pub shared: Vec<Mod>,
    pub server: Vec<Mod>
}

impl Modlist {
    pub fn new(mods: Vec<Mod>) -> Self {
        let mut list = Modlist { client: Vec::new(), shared: Vec::new(), server: Vec::new() };

        for m in mods {
            match m.side {
                Side::Client => list.client.push(m),
                Side::Server => list.server.push(m),
                Side::Both => list.shared.push(m)
            }
        }

        list
    }

    pub fn len(&self) -> usize {
        self.client.len() + self.shared.len() + self.server.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sections(&self) -> [(&'static str, &Vec<Mod>); 3] {
        [
            ("Client Mods", &self.client),
            ("Shared Mods", &self.shared),
            ("Server Mods", &self.server)
        ]
    }

    pub fn render(&self, format: ModlistFormat, with_versions: bool) -> String {
        let mut out = String::new();

        match format {
            ModlistFormat::Markdown => {
                out.push_str("# Modlist\n\n");

                for (title, mods) in self.sections() {
                    if mods.is_empty() {
                        continue;
                    }

                    let _ = writeln!(out, "## {title}\n");
                    for m in mods {
                        let _ = writeln!(out, "- [{}]({})", m.name, mod_url(m, with_versions));
                    }
                    out.push('\n');
                }
            },
            ModlistFormat::Raw => {
                for (_, mods) in self.sections() {
                    for m in mods {
                        let _ = writeln!(out, "{}\n{}\n", m.name, mod_url(m, with_versions));
                    }
                }
            }
        }

        out
    }
}

/// Project page of a mod, or its download url when the source is unknown
pub fn mod_url(m: &Mod, with_versions: bool) -> String {
    match &m.source {
        Some(ModSource::Modrinth { mod_id, version }) => {
            let mut url = format!("https://modrinth.com/mod/{mod_id}");
            if with_versions && !version.is_empty() {
                let _ = write!(url, "/version/{version}");
            }
            url
        },
        Some(ModSource::CurseForge { project_id, file_id }) => {
            let slug = match m.parse_id.as_str() {
                "" => project_id.to_string(),
                slug => slug.to_string()
            };
            let mut url = format!("https://www.curseforge.com/minecraft/mc-mods/{slug}");
            if with_versions && *file_id != 0 {
                let _ = write!(url, "/files/{file_id}");
            }
            url
        },
        None if !m.download_url.is_empty() => m.download_url.clone(),
        None => String::from("#")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mod_with(name: &str, side: Side, source: Option<ModSource>, download_url: &str) -> Mod {
        Mod {
            name: name.to_string(),
            filename: format!("{name}.jar"),
            side,
            download_url: download_url.to_string(),
            source,
            parse_id: name.to_lowercase(),
            metafile: format!("mods/{}.pw.toml", name.to_lowercase())
        }
    }

    #[test]
    fn modrinth_url_with_version() {
        let m = mod_with("Sodium", Side::Client, Some(ModSource::Modrinth {
            mod_id: String::from("AANobbMI"),
            version: String::from("abc")
        }), "");

        assert_eq!(mod_url(&m, false), "https://modrinth.com/mod/AANobbMI");
        assert_eq!(mod_url(&m, true), "https://modrinth.com/mod/AANobbMI/version/abc");
    }

    #[test]
    fn curseforge_url_uses_parse_id() {
        let m = mod_with("JEI", Side::Both, Some(ModSource::CurseForge {
            project_id: 238222,
            file_id: 4712866
        }), "");

        assert_eq!(mod_url(&m, false), "https://www.curseforge.com/minecraft/mc-mods/jei");
        assert_eq!(mod_url(&m, true), "https://www.curseforge.com/minecraft/mc-mods/jei/files/4712866");
    }

    #[test]
    fn fallback_urls() {
        let m = mod_with("Custom", Side::Both, None, "https://example.com/custom.jar");
        assert_eq!(mod_url(&m, true), "https://example.com/custom.jar");

        let m = mod_with("Nothing", Side::Both, None, "");
        assert_eq!(mod_url(&m, true), "#");
    }

    #[test]
    fn markdown_sections_in_order() {
        let list = Modlist::new(vec![
            mod_with("Lithium", Side::Both, None, "https://example.com/l.jar"),
            mod_with("Sodium", Side::Client, None, "https://example.com/s.jar")
        ]);

        assert_eq!(
            list.render(ModlistFormat::Markdown, false),
            "# Modlist\n\n\
             ## Client Mods\n\n- [Sodium](https://example.com/s.jar)\n\n\
             ## Shared Mods\n\n- [Lithium](https://example.com/l.jar)\n\n"
        );
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn raw_lists_name_and_url() {
        let list = Modlist::new(vec![mod_with("Lithium", Side::Server, None, "")]);
        assert_eq!(list.render(ModlistFormat::Raw, false), "Lithium\n#\n\n");
    }
}
