use std::str::SplitWhitespace;

use serde::Serialize;

use crate::intent::Intent;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("{command}: {value:?} is not a finite number")]
    BadNumber { command: &'static str, value: String },
    #[error("{command} takes no amount, got {value:?}")]
    UnexpectedArgument { command: &'static str, value: String },
    #[error("viewpoint takes 9 numbers (eye, look-at, up), got {0} words")]
    ViewpointArity(usize),
}

/// A typed navigation command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Command {
    /// Run `intent`. `amount` replaces the session's step (world units) or
    /// angle step (degrees) for this one command.
    Apply { intent: Intent, amount: Option<f32> },
    /// Place the eye at `eye` looking at `target`. `up` is read but the
    /// viewpoint never rolls.
    Viewpoint {
        eye: [f32; 3],
        target: [f32; 3],
        up: [f32; 3],
    },
}

/// Command word → intent.
const NAMED: [(&str, Intent); 17] = [
    ("move_forward", Intent::StepForward),
    ("move_backward", Intent::StepBackward),
    ("move_left", Intent::StrafeLeft),
    ("move_right", Intent::StrafeRight),
    ("move_up", Intent::MoveUp),
    ("move_down", Intent::MoveDown),
    ("turn_left", Intent::TurnLeft),
    ("turn_right", Intent::TurnRight),
    ("turn_up", Intent::LookUp),
    ("turn_down", Intent::LookDown),
    ("reset_viewpoint", Intent::ResetPose),
    ("fly_mode", Intent::FlyMode),
    ("walk_mode", Intent::WalkMode),
    ("view_mode", Intent::ViewMode),
    ("location", Intent::PrintLocation),
    ("help", Intent::Help),
    ("quit", Intent::Exit),
];

impl From<Intent> for Command {
    fn from(intent: Intent) -> Self {
        Command::Apply {
            intent,
            amount: None,
        }
    }
}

impl Command {
    /// Parse a command line such as `move_forward 2.5` or
    /// `viewpoint 1 2 3 1 2 4 0 1 0`.
    ///
    /// Returns `None` when the first word names no command, so the caller can
    /// read the line as keystrokes instead.
    pub fn parse(line: &str) -> Option<Result<Command, CommandError>> {
        let mut words = line.split_whitespace();
        let name = words.next()?;
        if name == "viewpoint" {
            return Some(parse_viewpoint(words));
        }
        let (name, intent) = NAMED.iter().find(|(n, _)| *n == name).copied()?;
        Some(parse_apply(name, intent, words))
    }

    /// Every command word, for help output.
    pub fn names() -> impl Iterator<Item = &'static str> {
        NAMED.iter().map(|(n, _)| *n).chain(["viewpoint"])
    }
}

fn parse_apply(
    command: &'static str,
    intent: Intent,
    mut words: SplitWhitespace<'_>,
) -> Result<Command, CommandError> {
    let amount = match words.next() {
        Some(value) if intent.is_translation() || intent.is_rotation() => {
            Some(parse_number(command, value)?)
        }
        Some(value) => {
            return Err(CommandError::UnexpectedArgument {
                command,
                value: value.to_string(),
            });
        }
        None => None,
    };
    if let Some(extra) = words.next() {
        return Err(CommandError::UnexpectedArgument {
            command,
            value: extra.to_string(),
        });
    }
    Ok(Command::Apply { intent, amount })
}

/// Nine numbers, optionally followed by the mode column of a location report.
fn parse_viewpoint(words: SplitWhitespace<'_>) -> Result<Command, CommandError> {
    let words: Vec<&str> = words.collect();
    if !(9..=10).contains(&words.len()) {
        return Err(CommandError::ViewpointArity(words.len()));
    }
    let mut v = [0.0_f32; 9];
    for (slot, word) in v.iter_mut().zip(&words) {
        *slot = parse_number("viewpoint", word)?;
    }
    Ok(Command::Viewpoint {
        eye: [v[0], v[1], v[2]],
        target: [v[3], v[4], v[5]],
        up: [v[6], v[7], v[8]],
    })
}

fn parse_number(command: &'static str, value: &str) -> Result<f32, CommandError> {
    value
        .parse::<f32>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| CommandError::BadNumber {
            command,
            value: value.to_string(),
        })
}
