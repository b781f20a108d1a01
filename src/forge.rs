// Copyright 2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Installing the Forge server runtime and composing its launch.

use std::fs;
use std::path::Path;

use log::{debug, info};
use reqwest::Client;

use crate::config::ConfigFile;
use crate::fetch;
use crate::lock::LockFile;
use crate::pack::PackVersions;
use crate::proc::{self, LaunchSpec};
use crate::Error;

const FORGE_MAVEN: &str = "http://files.minecraftforge.net/maven/net/minecraftforge/forge";

/// Where the versioned installer jar lives on the Forge maven.
///
/// e.g. <http://files.minecraftforge.net/maven/net/minecraftforge/forge/1.12.2-14.23.3.2682/forge-1.12.2-14.23.3.2682-installer.jar>
fn installer_url(versions: &PackVersions) -> String {
    format!(
        "{0}/{1}-{2}/forge-{1}-{2}-installer.jar",
        FORGE_MAVEN, versions.mc_version, versions.loader_version
    )
}

fn installer_name(versions: &PackVersions) -> String {
    format!(
        "forge-{}-{}-installer.jar",
        versions.mc_version, versions.loader_version
    )
}

/// Download the versioned installer and run it against the base path.
///
/// The installer's own exit is the completion signal, its exit code carries
/// no contract. The lock is updated and persisted right after, before the
/// best-effort cleanup of the downloaded jar.
pub async fn install(
    config: &ConfigFile,
    versions: &PackVersions,
    lock: &mut LockFile,
    lock_path: &Path,
    client: &Client,
) -> Result<(), Error> {
    let base = config.base_dir();
    let installer = base.join(installer_name(versions));
    let url = installer_url(versions);

    info!("attempting to download the forge installer from {}", url);
    fetch::download_to_file(client, &url, &installer).await?;

    info!("running the forge installer, its output follows");
    let installer_jar = installer.canonicalize()?;
    let spec = LaunchSpec::new(
        "java",
        vec![
            "-jar".to_string(),
            installer_jar.display().to_string(),
            "--installServer".to_string(),
        ],
        &base,
    );
    proc::run_to_exit(&spec).await?;

    lock.loader_installed = true;
    lock.loader_version = versions.loader_version.clone();
    lock.mc_version = versions.mc_version.clone();
    lock.save_or_warn(lock_path);

    info!(
        "done installing forge {} for minecraft {}, deleting the installer",
        versions.loader_version, versions.mc_version
    );
    if let Err(e) = fs::remove_file(&installer) {
        debug!("could not delete {}: {}", installer.display(), e);
    }

    Ok(())
}

/// The server launch, composed from the setup file and the installed versions.
///
/// The jar name is fully determined by the version pair the installer was run
/// with, so this must only be called once the lock says the loader is in place.
pub fn server_launch_spec(config: &ConfigFile, lock: &LockFile) -> LaunchSpec {
    let base = config.base_dir();
    let jar = base.join(format!(
        "forge-{}-{}-universal.jar",
        lock.mc_version, lock.loader_version
    ));

    let mut args = config.launch.java_args.clone();
    args.push("-jar".to_string());
    args.push(jar.display().to_string());
    args.push("nogui".to_string());

    LaunchSpec::new("java", args, base)
}
