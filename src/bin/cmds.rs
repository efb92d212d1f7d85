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

mod build;
mod import;
mod java;
mod modlist;
mod mods;
mod pack;
mod server;

pub use {
    build::build,
    import::import_urls,
    java::{install_java, java_path, java_status, list_java, remove_java, run_java},
    modlist::write_modlist,
    mods::{add_mod, list_mods, remove_mod, update_mods},
    pack::{change_field, detect_url, exec_command, print_info, run_packwiz},
    server::{delete_server, reset_server, server_status, setup_server, start_server, stop_server}
};

use console::style;
use dialoguer::{Confirm, theme::ColorfulTheme};
use std::fmt::Display;

fn console_theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

fn prompt_confirm<S: Into<String>>(prompt: S) -> dialoguer::Result<bool> {
    Confirm::with_theme(&console_theme())
        .with_prompt(prompt)
        .wait_for_newline(true)
        .default(false)
        .interact()
}

fn print_success<D: Display>(message: D) {
    println!("{} {message}", style("✔").green().bold());
}

fn print_failure<D: Display>(message: D) {
    eprintln!("{} {message}", style("✘").red().bold());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_errors_convert_to_anyhow() {
        fn confirmed(prompt: &str) -> anyhow::Result<bool> {
            Ok(prompt_confirm(prompt)?)
        }

        let _: fn(&str) -> anyhow::Result<bool> = confirmed;
    }
}
