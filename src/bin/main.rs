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

mod cli;
mod cmds;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, JavaCommands, ModCommands, Parser, ServerCommands};
use cmds::{
    add_mod, build, change_field, delete_server, detect_url, exec_command, import_urls,
    install_java, java_path, java_status, list_java, list_mods, print_info, remove_java,
    remove_mod, reset_server, run_java, run_packwiz, server_status, setup_server,
    start_server, stop_server, update_mods, write_modlist
};
use packwrap::{env, Progress, Session};

/// Environment variable holding a tracing filter, eg. `PW_LOG=packwrap=debug`
const LOG_VAR: &str = "PW_LOG";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let start_dir = match &cli.dir {
        Some(dir) => PathBuf::from(shellexpand::tilde(dir).into_owned()),
        None => std::env::current_dir()?
    };
    let start_dir = absolute_path(start_dir)?;

    let java = cli.java.or_else(|| std::env::var_os(env::JAVA_VAR).map(PathBuf::from));

    let mut session = Session::new(&start_dir);
    session.subscribe(|event| tracing::debug!("Session event {event:?}"));

    match cli.command {
        Commands::Build { target, local } => build(&session, &target, local, java).await,
        Commands::Mod { command } => match command {
            ModCommands::Add { id } => add_mod(&session, &id),
            ModCommands::Remove { name } => remove_mod(&session, &name),
            ModCommands::Update { name } => update_mods(&session, name.as_deref()),
            ModCommands::List => list_mods(&session)
        },
        Commands::Modlist { raw, versions, print } => write_modlist(&session, raw, versions, print),
        Commands::Import { input, yes, urls } => import_urls(&session, input.as_deref(), yes, &urls),
        Commands::Detect { local } => detect_url(&session, local),
        Commands::Change { key, value } => change_field(&session, &key, &value.join(" ")),
        Commands::Info => print_info(&session),
        Commands::Java { command } => match command {
            JavaCommands::List => list_java(),
            JavaCommands::Status => java_status(&session, java.as_deref()),
            JavaCommands::Install { version } => install_java(version).await,
            JavaCommands::Path { version } => java_path(version),
            JavaCommands::Remove { version } => remove_java(version),
            JavaCommands::Run(args) => run_java(&args)
        },
        Commands::Server { command } => match command {
            ServerCommands::Setup => setup_server(&session, java.as_deref()).await,
            ServerCommands::Start => start_server(&session, java.as_deref()),
            ServerCommands::Stop => stop_server(),
            ServerCommands::Reset => reset_server(&session, java.as_deref()).await,
            ServerCommands::Delete => delete_server(&session),
            ServerCommands::Status => server_status(&session)
        },
        Commands::Refresh => session.packwiz()?.refresh(),
        Commands::Exec { command } => exec_command(&session, &command),
        Commands::Packwiz { args } => run_packwiz(&session, &args)
    }
}

/// Log warnings by default, `-v` for info and `-vv` for debug, `PW_LOG` overrides both
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug"
    };

    let filter = EnvFilter::try_from_env(LOG_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn absolute_path(path: PathBuf) -> std::io::Result<PathBuf> {
    Ok(if !path.is_absolute() {
        std::env::current_dir()?.join(path)
    } else {
        path
    })
}

struct ProgressHandler {
    progress: ProgressBar
}

impl ProgressHandler {
    fn new() -> Self {
        let style = ProgressStyle::with_template("{bar:40.cyan/blue} {msg} {bytes}/{total_bytes}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());

        ProgressHandler {
            progress: ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr())
                .with_style(style)
        }
    }
}

impl Progress for ProgressHandler {
    fn advance(&mut self, current: usize) {
        self.progress.set_position(current as u64);
    }

    fn begin(&mut self, message: &'static str, total: usize) {
        self.progress.set_length(total as u64);
        self.progress.set_message(message);
        self.progress.reset();
    }

    fn end(&mut self) {
        self.progress.finish_and_clear();
    }
}
