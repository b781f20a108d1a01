// Copyright 2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The Mojang EULA gate.
//!
//! The server refuses to run without `eula=true` in its `eula.txt`, so the
//! launcher settles the question up front: if the marker is unset it asks the
//! operator once on stdin, and only an affirmative answer is persisted. A
//! refusal is an error, the server is not launched without acceptance.

use std::fs;
use std::io::{self, BufRead};
use std::path::Path;

use log::info;

use crate::Error;

const EULA_FILE: &str = "eula.txt";
const EULA_URL: &str = "https://account.mojang.com/documents/minecraft_eula";

/// Make sure the acceptance marker is durably set, prompting if it is not.
pub fn ensure_accepted(base: &Path) -> Result<(), Error> {
    let path = base.join(EULA_FILE);

    let lines = match fs::read_to_string(&path) {
        Ok(raw) => {
            let lines: Vec<String> = raw.lines().map(str::to_string).collect();
            // anything shorter than the three line format counts as unset
            if lines.len() < 3 {
                default_lines()
            } else {
                lines
            }
        }
        Err(_) => default_lines(),
    };

    if is_accepted(&lines) {
        return Ok(());
    }

    info!("you have not accepted the eula yet");
    info!("by typing TRUE you are indicating your agreement to the EULA of Mojang");
    info!("read it at {} before accepting it", EULA_URL);

    let stdin = io::stdin();
    let mut answer = String::new();
    stdin.lock().read_line(&mut answer)?;

    if answer.trim().eq_ignore_ascii_case("true") {
        let mut lines = lines;
        lines[2] = "eula=true".to_string();
        fs::write(&path, lines.join("\n") + "\n")?;
        info!("you have accepted the eula");
        Ok(())
    } else {
        Err(Error::from("the eula was not accepted, not starting the server"))
    }
}

fn default_lines() -> Vec<String> {
    vec![
        format!(
            "#By changing the setting below to TRUE you are indicating your agreement to our EULA ({}).",
            EULA_URL
        ),
        "#Generated by packstart".to_string(),
        "eula=false".to_string(),
    ]
}

/// Line three is `eula=<value>`, acceptance means the value contains `true`.
fn is_accepted(lines: &[String]) -> bool {
    lines.len() > 2 && lines[2].contains("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_file_passes_without_prompting() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join(EULA_FILE),
            "#line one\n#line two\neula=true\n",
        )
        .expect("write");

        ensure_accepted(dir.path()).expect("already accepted");
    }

    #[test]
    fn acceptance_is_read_from_line_three() {
        let accepted = vec![
            "#a".to_string(),
            "#b".to_string(),
            "eula=true".to_string(),
        ];
        let declined = vec![
            "#a".to_string(),
            "#b".to_string(),
            "eula=false".to_string(),
        ];
        let short = vec!["eula=true".to_string()];

        assert!(is_accepted(&accepted));
        assert!(!is_accepted(&declined));
        assert!(!is_accepted(&short));
    }

    #[test]
    fn default_lines_are_the_three_line_format() {
        let lines = default_lines();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with('#'));
        assert!(lines[1].starts_with('#'));
        assert_eq!(lines[2], "eula=false");
    }
}
