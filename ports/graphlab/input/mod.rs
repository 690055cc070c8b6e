/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Terminal input for manual runs.
//!
//! Parsing a line into a [`RunCommand`] is kept apart from applying it to the
//! app, so commands are testable without a terminal.

use crate::app::GraphLabApp;
use crate::config::KeyBindings;
use crate::run::StepStatus;
use crate::timer::TimerService;

/// A command typed at the run prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunCommand {
    Step,
    Finish,
    Cancel,
    Help,
    Unknown(String),
}

/// What the prompt loop should do after a command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Keep reading commands
    Continue(StepStatus),

    /// The run is over, stop reading
    Done(StepStatus),

    /// Print the bindings and keep reading
    ShowHelp,

    Unrecognised(String),
}

/// Parse one input line. Matching ignores surrounding whitespace and case.
pub fn parse_command(line: &str, keys: &KeyBindings) -> RunCommand {
    let word = line.trim();
    let is = |binding: &str| word.eq_ignore_ascii_case(binding.trim());

    if word.is_empty() || is(&keys.step) {
        RunCommand::Step
    } else if is(&keys.finish) {
        RunCommand::Finish
    } else if is(&keys.cancel) {
        RunCommand::Cancel
    } else if is(&keys.help) {
        RunCommand::Help
    } else {
        RunCommand::Unknown(word.to_string())
    }
}

/// Apply a command to the app state
pub fn apply_command<T: TimerService>(app: &mut GraphLabApp<T>, command: &RunCommand) -> CommandResult {
    match command {
        RunCommand::Step => match app.step() {
            StepStatus::Running => CommandResult::Continue(StepStatus::Running),
            status => CommandResult::Done(status),
        },
        RunCommand::Finish => CommandResult::Done(app.finish_run()),
        RunCommand::Cancel => {
            app.cancel_run();
            CommandResult::Done(StepStatus::Idle)
        },
        RunCommand::Help => CommandResult::ShowHelp,
        RunCommand::Unknown(word) => CommandResult::Unrecognised(word.clone()),
    }
}
