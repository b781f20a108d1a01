// Copyright 2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Supervision against real child processes, and the decisions around it.

use std::fs;

use packstart::config::{ConfigFile, InstallConfig, LaunchConfig};
use packstart::install;
use packstart::lock::LockFile;
use packstart::pack::PackFormat;
use packstart::proc::LaunchSpec;
use packstart::supervisor::Supervisor;

/// A child that appends a line per launch, so launches can be counted.
fn counting_launch(dir: &std::path::Path) -> LaunchSpec {
    LaunchSpec::new(
        "sh",
        vec!["-c".to_string(), "echo started >> launches.txt".to_string()],
        dir,
    )
}

fn launches(dir: &std::path::Path) -> usize {
    fs::read_to_string(dir.join("launches.txt"))
        .expect("the server never ran")
        .lines()
        .count()
}

#[tokio::test]
async fn server_runs_exactly_once_without_auto_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = LaunchConfig {
        auto_restart: false,
        ..LaunchConfig::default()
    };

    let mut supervisor = Supervisor::new(counting_launch(dir.path()), &config).expect("valid");
    supervisor.run().await.expect("run");

    assert_eq!(launches(dir.path()), 1);
}

#[tokio::test]
async fn exhausted_crash_limit_stops_the_loop() {
    let dir = tempfile::tempdir().expect("tempdir");
    // a limit of zero is exhausted by the very first start
    let config = LaunchConfig {
        auto_restart: true,
        crash_limit: 0,
        ..LaunchConfig::default()
    };

    let mut supervisor = Supervisor::new(counting_launch(dir.path()), &config).expect("valid");
    supervisor.run().await.expect("run");

    assert_eq!(launches(dir.path()), 1);
}

#[tokio::test]
async fn spawn_failure_counts_as_a_crash_not_an_error() {
    let config = LaunchConfig {
        auto_restart: false,
        ..LaunchConfig::default()
    };
    let launch = LaunchSpec::new("definitely-not-a-real-server", Vec::new(), ".");

    // the loop absorbs the failed launch and ends via the restart decision
    let mut supervisor = Supervisor::new(launch, &config).expect("valid");
    supervisor.run().await.expect("run");
}

#[test]
fn fresh_directory_decides_to_install() {
    let dir = tempfile::tempdir().expect("tempdir");

    let lock = LockFile::load(&dir.path().join("packstart.lock")).expect("load");
    let config = ConfigFile {
        install: InstallConfig {
            base_install_path: String::new(),
            modpack_url: "https://example.org/pack/index.json".to_string(),
            modpack_format: PackFormat::Modrinth,
            mc_version: String::new(),
            loader_version: String::new(),
            additional_files: Vec::new(),
        },
        launch: LaunchConfig::default(),
    };

    assert!(install::should_install(&config, &lock, false));
}

#[test]
fn installed_state_survives_a_restart_of_the_launcher() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("packstart.lock");

    let lock = LockFile {
        pack_installed: true,
        pack_url: "https://example.org/pack/index.json".to_string(),
        loader_installed: true,
        loader_version: "47.2.0".to_string(),
        mc_version: "1.20.1".to_string(),
    };
    lock.save(&path).expect("save");

    let reloaded = LockFile::load(&path).expect("load");
    assert_eq!(reloaded, lock);

    let config = ConfigFile {
        install: InstallConfig {
            base_install_path: String::new(),
            modpack_url: "https://example.org/pack/index.json".to_string(),
            modpack_format: PackFormat::Modrinth,
            mc_version: String::new(),
            loader_version: String::new(),
            additional_files: Vec::new(),
        },
        launch: LaunchConfig::default(),
    };

    // the reloaded lock makes the next run skip installation entirely
    assert!(!install::should_install(&config, &reloaded, false));
}
