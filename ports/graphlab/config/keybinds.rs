/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Command words for driving a manual run from a terminal.

use serde::{Deserialize, Serialize};

/// Words typed at the run prompt. An empty line always means "step".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Advance one step (default: n)
    pub step: String,

    /// Step until the run finishes (default: f)
    pub finish: String,

    /// Cancel the run (default: q)
    pub cancel: String,

    /// Show the bindings (default: ?)
    pub help: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            step: "n".to_string(),
            finish: "f".to_string(),
            cancel: "q".to_string(),
            help: "?".to_string(),
        }
    }
}

impl KeyBindings {
    /// One-line summary for prompts
    pub fn describe(&self) -> String {
        format!(
            "[Enter/{}] step  [{}] finish  [{}] cancel  [{}] help",
            self.step, self.finish, self.cancel, self.help
        )
    }
}
