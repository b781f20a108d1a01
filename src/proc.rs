// Copyright 2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The one way child processes are run here: spawn, inherit stdio, await exit.

use std::path::PathBuf;
use std::process::Stdio;

use log::debug;
use tokio::process::Command;

use crate::Error;

/// A fully composed child invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: String,
    pub args: Vec<String>,
    pub workdir: PathBuf,
}

impl LaunchSpec {
    pub fn new(program: impl Into<String>, args: Vec<String>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            workdir: workdir.into(),
        }
    }
}

/// Run the child to completion.
///
/// All three stdio streams are inherited so the child's output lands on the
/// operator's terminal as it happens, and nothing is left open to release
/// once it exits. The exit status is logged but deliberately not mapped to an
/// error: the installer and the server both signal completion by exiting, the
/// code itself carries no contract.
pub async fn run_to_exit(spec: &LaunchSpec) -> Result<(), Error> {
    debug!(
        "spawning {} {:?} in {}",
        spec.program,
        spec.args,
        spec.workdir.display()
    );

    let mut child = Command::new(&spec.program)
        .args(&spec.args)
        .current_dir(&spec.workdir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| format!("failed to spawn {}: {}", spec.program, e))?;

    let status = child.wait().await?;
    debug!("{} exited with {}", spec.program, status);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn non_zero_exit_is_still_completion() {
        let spec = LaunchSpec::new("sh", vec!["-c".to_string(), "exit 3".to_string()], ".");
        run_to_exit(&spec).await.expect("completion is success");
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let spec = LaunchSpec::new("definitely-not-a-real-program", Vec::new(), ".");
        assert!(run_to_exit(&spec).await.is_err());
    }
}
