// Copyright 2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Launch and monitor the server process.
//!
//! Rules:
//!   - restart the server whenever it stops, if the setup file says so
//!   - stop restarting once it has crash-looped past the limit
//!   - pause before every relaunch, a ctrl-c during the pause ends the loop

use std::time::{Duration, Instant};

use futures::future::FutureExt;
use futures::{pin_mut, select};
use log::{error, info, warn};

use crate::config::LaunchConfig;
use crate::proc::{self, LaunchSpec};
use crate::Error;

/// Fixed pause before every relaunch.
const GRACE_PAUSE: Duration = Duration::from_secs(10);

/// Parse a crash window like "2h", "30min", "45s" or plain seconds "45".
///
/// Hours are 3600 seconds here. An unparseable value is rejected up front so
/// the loop never starts with a broken policy.
pub fn parse_crash_timer(timer: &str) -> Result<Duration, Error> {
    let (digits, multiplier) = if let Some(hours) = timer.strip_suffix('h') {
        (hours, 60 * 60)
    } else if let Some(minutes) = timer.strip_suffix("min") {
        (minutes, 60)
    } else if let Some(seconds) = timer.strip_suffix('s') {
        (seconds, 1)
    } else {
        (timer, 1)
    };

    let value: u64 = digits
        .trim()
        .parse()
        .map_err(|_| format!("invalid crash timer given: {}", timer))?;

    Ok(Duration::from_secs(value * multiplier))
}

/// The sliding window of recent server start times.
///
/// Only lives for the duration of one launcher run, nothing here is persisted.
#[derive(Debug)]
pub struct CrashWindow {
    window: Duration,
    starts: Vec<Instant>,
}

impl CrashWindow {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            starts: Vec::new(),
        }
    }

    /// Drop every start that has fallen out of the trailing window.
    pub fn prune(&mut self, now: Instant) {
        let window = self.window;
        self.starts
            .retain(|start| now.saturating_duration_since(*start) <= window);
    }

    pub fn record(&mut self, start: Instant) {
        self.starts.push(start);
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }
}

/// Runs the server in a loop until a stop condition is met.
pub struct Supervisor {
    launch: LaunchSpec,
    auto_restart: bool,
    crash_limit: usize,
    crash_timer: String,
    window: CrashWindow,
}

impl Supervisor {
    /// Fails fast on an unparseable crash timer, before anything is launched.
    pub fn new(launch: LaunchSpec, config: &LaunchConfig) -> Result<Self, Error> {
        let window = CrashWindow::new(parse_crash_timer(&config.crash_timer)?);

        Ok(Self {
            launch,
            auto_restart: config.auto_restart,
            crash_limit: config.crash_limit,
            crash_timer: config.crash_timer.clone(),
            window,
        })
    }

    /// The restart loop: launch, wait for exit, decide, pause, repeat.
    pub async fn run(&mut self) -> Result<(), Error> {
        loop {
            let now = Instant::now();
            self.window.prune(now);
            self.window.record(now);

            info!("starting the server, its output follows");
            if let Err(e) = proc::run_to_exit(&self.launch).await {
                // a server that cannot even spawn counts as a crash
                error!("error while running the server: {}", e);
            }

            info!(
                "server has been stopped, it has started {} times in {}",
                self.window.len(),
                self.crash_timer
            );

            if !self.should_relaunch() {
                if self.auto_restart {
                    warn!(
                        "server started more than {} times within {}, not restarting it",
                        self.crash_limit, self.crash_timer
                    );
                }
                return Ok(());
            }

            info!(
                "restarting the server in {} seconds, press ctrl-c to stop",
                GRACE_PAUSE.as_secs()
            );
            if !pause_before_restart().await {
                info!("stop requested, leaving the server down");
                return Ok(());
            }
        }
    }

    fn should_relaunch(&self) -> bool {
        self.auto_restart && self.window.len() <= self.crash_limit
    }
}

/// The grace pause, raced against ctrl-c. Returns false when interrupted.
async fn pause_before_restart() -> bool {
    let delay = tokio::time::sleep(GRACE_PAUSE).fuse();
    let interrupt = tokio::signal::ctrl_c().fuse();
    pin_mut!(delay, interrupt);

    select! {
        _ = delay => true,
        _ = interrupt => false,
    }
}
