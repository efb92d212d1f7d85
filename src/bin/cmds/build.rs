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

use anyhow::{bail, Result};
use console::style;
use std::path::PathBuf;

use crate::ProgressHandler;
use packwrap::{to_slash, ExportOptions, ExportTarget, Session};
use super::{print_failure, print_success};

pub async fn build(session: &Session, target: &str, use_local: bool, java: Option<PathBuf>) -> Result<()> {
    let targets = ExportTarget::parse_list(target)?;
    let pipeline = session.export_pipeline(ExportOptions { use_local, java, packwiz: None })?;

    let mut progress = ProgressHandler::new();

    let report = pipeline.export_many(&targets, &mut progress, |target, result| match result {
        Ok(path) => print_success(format!("{target} pack written to {}", to_slash(path))),
        Err(e) => print_failure(e)
    }).await;

    if targets.len() > 1 {
        println!(
            "\n{} succeeded, {} failed",
            style(report.succeeded.len()).green(),
            style(report.failed.len()).red()
        );
    }

    if !report.is_success() {
        bail!("{} of {} exports failed", report.failed.len(), targets.len());
    }

    Ok(())
}
