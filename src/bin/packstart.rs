// Copyright 2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::path::Path;

use clap::Command;
use env_logger::Env;
use log::info;
use tokio::runtime;

use packstart::config::{self, ConfigFile};
use packstart::lock::{self, LockFile};
use packstart::supervisor::Supervisor;
use packstart::{eula, forge, install, Error};

const INSTALL: &str = "install";

trait SetupClapApp {
    fn setup_clap_app(self) -> Self;
}

impl SetupClapApp for Command {
    fn setup_clap_app(self) -> Self {
        self.version(env!("CARGO_PKG_VERSION"))
            .author(env!("CARGO_PKG_AUTHORS"))
    }
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Command::new(env!("CARGO_PKG_NAME"))
        .setup_clap_app()
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .subcommand(
            Command::new(INSTALL)
                .setup_clap_app()
                .about("install the pack and the server, then exit without launching"),
        )
        .get_matches();

    let install_only = args.subcommand_matches(INSTALL).is_some();

    let runtime = runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to initialize Tokio Runtime");

    runtime.block_on(run(install_only))
}

async fn run(install_only: bool) -> Result<(), Error> {
    let config = ConfigFile::load(Path::new(config::CONFIG_PATH))?;
    let lock_path = Path::new(lock::LOCK_PATH);
    let mut lock = LockFile::load(lock_path)?;

    let client = reqwest::Client::builder().build()?;

    if install::should_install(&config, &lock, install_only) {
        install::run_install(&config, &mut lock, lock_path, &client).await?;
    } else {
        info!(
            "server is already installed to the configured pack, delete {} to force a reinstall",
            lock::LOCK_PATH
        );
    }

    if install_only {
        info!("install only mode, exiting now");
        return Ok(());
    }

    eula::ensure_accepted(&config.base_dir())?;

    let launch = forge::server_launch_spec(&config, &lock);
    let mut supervisor = Supervisor::new(launch, &config.launch)?;
    supervisor.run().await
}
