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

use crate::{
    export::ExportTarget, installer::INSTALLER_JAR, local_server::RUN_DIR, pack::METAFILE_SUFFIX
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Include,
    Skip,
    SkipSubtree
}

/// Build output, vcs and staging directories never copied by any target
const ALWAYS_EXCLUDED: [&str; 10] = [
    ".build", ".git", ".temp", RUN_DIR,
    ".cf-temp", ".mr-temp", ".mmc-temp", ".technic", ".server",
    INSTALLER_JAR
];

const SERVER_EXCLUDED: [&str; 8] = [
    "resourcepacks", "shaderpacks", "screenshots", "saves", "logs", "crash-reports",
    "options.txt", "optionsof.txt"
];

const MULTIMC_EXCLUDED: [&str; 1] = ["mods"];

/// Per-target rules for copying the pack into a staging directory
pub struct FileFilter {
    excluded: Vec<&'static str>,

    /// Always copy `*.pw.toml` so the installer can read them
    allow_metafiles: bool,

    /// Never copy `mods/**.jar`, the installer fetches them again
    skip_mod_jars: bool
}

impl FileFilter {
    pub fn for_target(target: ExportTarget) -> Self {
        let mut excluded = ALWAYS_EXCLUDED.to_vec();

        let (allow_metafiles, skip_mod_jars) = match target {
            ExportTarget::Server => {
                excluded.extend(SERVER_EXCLUDED);
                (true, true)
            },
            ExportTarget::Technic => (true, true),
            ExportTarget::MultiMC => {
                excluded.extend(MULTIMC_EXCLUDED);
                (false, false)
            },
            ExportTarget::CurseForge | ExportTarget::Modrinth => (false, false)
        };

        FileFilter { excluded, allow_metafiles, skip_mod_jars }
    }

    /// Decide what to do with `rel_path`, a `/` separated path relative to the pack
    pub fn decide(&self, rel_path: &str, is_dir: bool) -> Decision {
        if !is_dir {
            if self.allow_metafiles && rel_path.ends_with(METAFILE_SUFFIX) {
                return Decision::Include;
            }

            if self.skip_mod_jars && rel_path.starts_with("mods/") && rel_path.ends_with(".jar") {
                return Decision::Skip;
            }
        }

        if self.excluded.iter().any(|prefix| matches_prefix(rel_path, prefix)) {
            return match is_dir {
                true => Decision::SkipSubtree,
                false => Decision::Skip
            };
        }

        Decision::Include
    }
}

fn matches_prefix(rel_path: &str, prefix: &str) -> bool {
    rel_path == prefix
        || rel_path.strip_prefix(prefix).map(|rest| rest.starts_with('/')).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metafiles_included_and_jars_skipped_for_server_and_technic() {
        for target in [ExportTarget::Server, ExportTarget::Technic] {
            let filter = FileFilter::for_target(target);
            assert_eq!(filter.decide("mods/foo.pw.toml", false), Decision::Include);
            assert_eq!(filter.decide("mods/foo.jar", false), Decision::Skip);
            assert_eq!(filter.decide("mods", true), Decision::Include);
            assert_eq!(filter.decide("config/foo.toml", false), Decision::Include);
        }
    }

    #[test]
    fn server_skips_client_only_content() {
        let filter = FileFilter::for_target(ExportTarget::Server);
        assert_eq!(filter.decide("resourcepacks", true), Decision::SkipSubtree);
        assert_eq!(filter.decide("shaderpacks/pack.zip", false), Decision::Skip);
        assert_eq!(filter.decide("options.txt", false), Decision::Skip);
        assert_eq!(filter.decide(".build", true), Decision::SkipSubtree);
        assert_eq!(filter.decide("resourcepacks-extra", true), Decision::Include);
    }

    #[test]
    fn technic_keeps_client_content() {
        let filter = FileFilter::for_target(ExportTarget::Technic);
        assert_eq!(filter.decide("resourcepacks", true), Decision::Include);
        assert_eq!(filter.decide("options.txt", false), Decision::Include);
        assert_eq!(filter.decide(".git", true), Decision::SkipSubtree);
    }

    #[test]
    fn multimc_skips_mods_and_installer() {
        let filter = FileFilter::for_target(ExportTarget::MultiMC);
        assert_eq!(filter.decide("mods", true), Decision::SkipSubtree);
        assert_eq!(filter.decide("mods/foo.pw.toml", false), Decision::Skip);
        assert_eq!(filter.decide(INSTALLER_JAR, false), Decision::Skip);
        assert_eq!(filter.decide(".mmc-temp", true), Decision::SkipSubtree);
        assert_eq!(filter.decide("config", true), Decision::Include);
    }

    #[test]
    fn platform_targets_copy_everything_but_build_dirs() {
        let filter = FileFilter::for_target(ExportTarget::Modrinth);
        assert_eq!(filter.decide("mods/foo.pw.toml", false), Decision::Include);
        assert_eq!(filter.decide("mods/foo.jar", false), Decision::Include);
        assert_eq!(filter.decide(".build", true), Decision::SkipSubtree);
    }

    #[test]
    fn local_server_dir_never_exported() {
        for target in ExportTarget::ALL {
            let filter = FileFilter::for_target(target);
            assert_eq!(filter.decide(".run", true), Decision::SkipSubtree);
            assert_eq!(filter.decide(".run/server.jar", false), Decision::Skip);
        }
    }
}
