use serde::{Deserialize, Serialize};

/// A high-level navigation request produced by any input device.
///
/// Intents are handled strictly in arrival order; each one sees the viewpoint
/// committed by the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    StepForward,
    StepBackward,
    StrafeLeft,
    StrafeRight,
    MoveUp,
    MoveDown,
    TurnLeft,
    TurnRight,
    LookUp,
    LookDown,
    /// Return to the start pose and fly mode.
    ResetPose,
    FlyMode,
    WalkMode,
    /// Rotations orbit the eye around the look-at point.
    ViewMode,
    /// Grow the translation step by 10%.
    FasterSteps,
    SlowerSteps,
    /// Grow the rotation step by 10%.
    WiderTurns,
    NarrowerTurns,
    PrintLocation,
    Help,
    Exit,
}

impl Intent {
    pub const ALL: [Intent; 21] = [
        Intent::StepForward,
        Intent::StepBackward,
        Intent::StrafeLeft,
        Intent::StrafeRight,
        Intent::MoveUp,
        Intent::MoveDown,
        Intent::TurnLeft,
        Intent::TurnRight,
        Intent::LookUp,
        Intent::LookDown,
        Intent::ResetPose,
        Intent::FlyMode,
        Intent::WalkMode,
        Intent::ViewMode,
        Intent::FasterSteps,
        Intent::SlowerSteps,
        Intent::WiderTurns,
        Intent::NarrowerTurns,
        Intent::PrintLocation,
        Intent::Help,
        Intent::Exit,
    ];

    /// Intents that displace the eye and therefore go through collision checks.
    pub fn is_translation(self) -> bool {
        matches!(
            self,
            Self::StepForward
                | Self::StepBackward
                | Self::StrafeLeft
                | Self::StrafeRight
                | Self::MoveUp
                | Self::MoveDown
        )
    }

    /// Intents that only change the heading, except in view mode where the
    /// eye orbits.
    pub fn is_rotation(self) -> bool {
        matches!(
            self,
            Self::TurnLeft | Self::TurnRight | Self::LookUp | Self::LookDown
        )
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::StepForward => "step forward",
            Self::StepBackward => "step backward",
            Self::StrafeLeft => "strafe left",
            Self::StrafeRight => "strafe right",
            Self::MoveUp => "move up",
            Self::MoveDown => "move down",
            Self::TurnLeft => "turn left",
            Self::TurnRight => "turn right",
            Self::LookUp => "look up",
            Self::LookDown => "look down",
            Self::ResetPose => "reset",
            Self::FlyMode => "fly navigation mode",
            Self::WalkMode => "walk navigation mode",
            Self::ViewMode => "view navigation mode",
            Self::FasterSteps => "increase step size by 10%",
            Self::SlowerSteps => "decrease step size by 10%",
            Self::WiderTurns => "increase angle step by 10%",
            Self::NarrowerTurns => "decrease angle step by 10%",
            Self::PrintLocation => "print viewpoint",
            Self::Help => "print this help",
            Self::Exit => "exit",
        }
    }
}
