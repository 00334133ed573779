use glam::Vec3;
use serde::{Deserialize, Serialize};
use skyline_common::{MotionMode, Viewpoint};
use skyline_input::{Command, Intent};

use crate::collision::{CollisionValidator, Verdict};
use crate::generator::City;

/// Factor applied by the step and angle tuning intents.
const TUNING_FACTOR: f32 = 1.1;

/// Navigation tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Minimum eye height above the ground plane.
    pub ground_clearance: f32,
    /// Translation per step, in world units.
    pub step: f32,
    /// Rotation per turn or look, in degrees.
    pub angle_step_degrees: f32,
    /// Explicit start pose. When unset the eye starts over the middle of the
    /// near edge at `start_height`, looking into the city.
    pub start: Option<Viewpoint>,
    pub start_height: f32,
    pub mode: MotionMode,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            ground_clearance: 0.25,
            step: 0.5,
            angle_step_degrees: 1.0,
            start: None,
            start_height: 10.0,
            mode: MotionMode::Fly,
        }
    }
}

impl NavConfig {
    fn start_pose(&self, city: &City) -> Viewpoint {
        self.start.unwrap_or_else(|| {
            let extent = city.grid().extent();
            Viewpoint::new(
                Vec3::new(extent / 2.0, self.start_height, 0.0),
                0.0,
                -15.0_f32.to_radians(),
            )
        })
    }
}

/// What handling an intent did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Outcome {
    /// A translation went through the collision validator.
    Moved(Verdict),
    Turned,
    Reset,
    /// Mode or step size changed; the viewpoint did not.
    Adjusted,
    /// The intent has no effect in the current mode.
    Ignored,
    /// The eye was placed at an explicit pose.
    Placed,
    /// An explicit pose was illegal or degenerate; the viewpoint is unchanged.
    PlacementRefused,
    /// Caller should print the location.
    LocationRequested,
    /// Caller should print the key help.
    HelpRequested,
    Exit,
}

/// Result of [`Session::handle_intent`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Response {
    pub viewpoint: Viewpoint,
    pub outcome: Outcome,
}

impl Response {
    /// Whether the view may have changed and the next frame should be drawn.
    pub fn redraw_requested(&self) -> bool {
        matches!(
            self.outcome,
            Outcome::Moved(_) | Outcome::Turned | Outcome::Reset | Outcome::Placed
        )
    }

    pub fn is_exit(&self) -> bool {
        self.outcome == Outcome::Exit
    }
}

/// One handled command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JournalEntry {
    pub command: Command,
    pub outcome: Outcome,
    pub viewpoint: Viewpoint,
}

/// Owns the city and the viewpoint moving through it.
///
/// Every command is applied synchronously against the viewpoint committed by
/// the previous one and recorded in an append-only journal. Replaying the
/// journal's commands against the same city reproduces the same viewpoint.
#[derive(Debug, Clone)]
pub struct Session {
    city: City,
    ground_clearance: f32,
    start: Viewpoint,
    viewpoint: Viewpoint,
    mode: MotionMode,
    step: f32,
    angle_step: f32,
    journal: Vec<JournalEntry>,
}

impl Session {
    pub fn new(city: City, config: &NavConfig) -> Self {
        let start = config.start_pose(&city);
        let validator = CollisionValidator::new(city.grid(), config.ground_clearance);
        if !validator.is_legal(start.position) {
            tracing::warn!(position = ?start.position, "start pose is inside solid geometry");
        }
        Self {
            city,
            ground_clearance: config.ground_clearance,
            start,
            viewpoint: start,
            mode: config.mode,
            step: config.step,
            angle_step: config.angle_step_degrees.to_radians(),
            journal: Vec::new(),
        }
    }

    /// Build a session and apply `commands` in order.
    pub fn replay(city: City, config: &NavConfig, commands: impl IntoIterator<Item = Command>) -> Self {
        let mut session = Self::new(city, config);
        for command in commands {
            session.apply_command(command);
        }
        session
    }

    pub fn city(&self) -> &City {
        &self.city
    }

    pub fn viewpoint(&self) -> Viewpoint {
        self.viewpoint
    }

    pub fn start(&self) -> Viewpoint {
        self.start
    }

    pub fn mode(&self) -> MotionMode {
        self.mode
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Rotation step in radians.
    pub fn angle_step(&self) -> f32 {
        self.angle_step
    }

    pub fn journal(&self) -> &[JournalEntry] {
        &self.journal
    }

    pub fn drain_journal(&mut self) -> Vec<JournalEntry> {
        std::mem::take(&mut self.journal)
    }

    /// Apply one intent with the current step sizes.
    pub fn handle_intent(&mut self, intent: Intent) -> Response {
        self.apply_command(Command::from(intent))
    }

    /// Apply one command and return the committed viewpoint.
    pub fn apply_command(&mut self, command: Command) -> Response {
        let outcome = match command {
            Command::Apply { intent, amount } => self.apply(intent, amount),
            Command::Viewpoint { eye, target, .. } => {
                match Viewpoint::looking_at(Vec3::from_array(eye), Vec3::from_array(target)) {
                    Some(viewpoint) => self.place(viewpoint),
                    None => {
                        tracing::debug!(?eye, ?target, "degenerate viewpoint command");
                        Outcome::PlacementRefused
                    }
                }
            }
        };

        self.journal.push(JournalEntry {
            command,
            outcome,
            viewpoint: self.viewpoint,
        });
        Response {
            viewpoint: self.viewpoint,
            outcome,
        }
    }

    /// Move the eye to `viewpoint` if it is a legal position. The pose is
    /// journaled as an eye/look-at command, so replay rebuilds yaw and pitch
    /// from those two points.
    pub fn set_viewpoint(&mut self, viewpoint: Viewpoint) -> Response {
        self.apply_command(Command::Viewpoint {
            eye: viewpoint.position.to_array(),
            target: viewpoint.target().to_array(),
            up: viewpoint.up().to_array(),
        })
    }

    fn apply(&mut self, intent: Intent, amount: Option<f32>) -> Outcome {
        let amount = amount.filter(|_| {
            let scalable = intent.is_translation() || intent.is_rotation();
            if !scalable {
                tracing::debug!(?intent, "amount ignored");
            }
            scalable
        });
        let distance = amount.unwrap_or(self.step);
        let angle = amount.map_or(self.angle_step, f32::to_radians);

        match intent {
            Intent::StepForward => self.translate(self.forward() * distance),
            Intent::StepBackward => self.translate(-self.forward() * distance),
            Intent::StrafeLeft => self.translate(self.viewpoint.left() * distance),
            Intent::StrafeRight => self.translate(-self.viewpoint.left() * distance),
            Intent::MoveUp | Intent::MoveDown if self.mode == MotionMode::Walk => Outcome::Ignored,
            Intent::MoveUp => self.translate(Vec3::Y * distance),
            Intent::MoveDown => self.translate(-Vec3::Y * distance),
            Intent::TurnLeft => self.rotate(self.viewpoint.turned(angle)),
            Intent::TurnRight => self.rotate(self.viewpoint.turned(-angle)),
            Intent::LookUp => self.rotate(self.viewpoint.tilted(angle)),
            Intent::LookDown => self.rotate(self.viewpoint.tilted(-angle)),
            Intent::ResetPose => {
                self.viewpoint = self.start;
                self.mode = MotionMode::Fly;
                Outcome::Reset
            }
            Intent::FlyMode => self.set_mode(MotionMode::Fly),
            Intent::WalkMode => self.set_mode(MotionMode::Walk),
            Intent::ViewMode => self.set_mode(MotionMode::View),
            Intent::FasterSteps => {
                self.step *= TUNING_FACTOR;
                Outcome::Adjusted
            }
            Intent::SlowerSteps => {
                self.step /= TUNING_FACTOR;
                Outcome::Adjusted
            }
            Intent::WiderTurns => {
                self.angle_step *= TUNING_FACTOR;
                Outcome::Adjusted
            }
            Intent::NarrowerTurns => {
                self.angle_step /= TUNING_FACTOR;
                Outcome::Adjusted
            }
            Intent::PrintLocation => Outcome::LocationRequested,
            Intent::Help => Outcome::HelpRequested,
            Intent::Exit => Outcome::Exit,
        }
    }

    /// Eye, look-at point, up vector and mode as one line of fixed-width
    /// columns. `header` prefixes the column titles.
    pub fn describe_location(&self, header: bool) -> String {
        let v = self.viewpoint;
        let (c, t, u) = (v.position, v.target(), v.up());
        let row = format!(
            "{:7.2} {:7.2} {:7.2}  {:7.2} {:7.2} {:7.2}  {:7.2} {:7.2} {:7.2} {}",
            c.x,
            c.y,
            c.z,
            t.x,
            t.y,
            t.z,
            u.x,
            u.y,
            u.z,
            self.mode.name()
        );
        if header {
            format!(
                "{:>7} {:>7} {:>7}  {:>7} {:>7} {:>7}  {:>7} {:>7} {:>7} mode\n{row}",
                "CX", "CY", "CZ", "VX", "VY", "VZ", "UX", "UY", "UZ"
            )
        } else {
            row
        }
    }

    /// Unit direction of a forward step in the current mode. Walk steps use
    /// the unit horizontal heading, so they cover the full step at any pitch
    /// instead of shrinking by its cosine. Strafing does the same.
    fn forward(&self) -> Vec3 {
        match self.mode {
            MotionMode::Fly | MotionMode::View => self.viewpoint.look(),
            MotionMode::Walk => self.viewpoint.heading(),
        }
    }

    fn validator(&self) -> CollisionValidator<'_> {
        CollisionValidator::new(self.city.grid(), self.ground_clearance)
    }

    fn translate(&mut self, delta: Vec3) -> Outcome {
        let from = self.viewpoint.position;
        let resolution = self.validator().resolve(from, from + delta);
        self.viewpoint = self.viewpoint.moved_to(resolution.position);
        Outcome::Moved(resolution.verdict)
    }

    /// Adopt the orientation of `next`. In view mode the eye swings around
    /// the current look-at point instead, and the swing is validated like a
    /// translation; a refused swing keeps the old orientation too.
    fn rotate(&mut self, next: Viewpoint) -> Outcome {
        if self.mode != MotionMode::View {
            self.viewpoint = next;
            return Outcome::Turned;
        }
        let pivot = self.viewpoint.target();
        let from = self.viewpoint.position;
        let resolution = self.validator().resolve(from, pivot - next.look());
        if !resolution.verdict.is_rejection() {
            self.viewpoint = next.moved_to(resolution.position);
        }
        Outcome::Moved(resolution.verdict)
    }

    fn place(&mut self, viewpoint: Viewpoint) -> Outcome {
        if !self.validator().is_legal(viewpoint.position) {
            tracing::debug!(position = ?viewpoint.position, "explicit pose refused");
            return Outcome::PlacementRefused;
        }
        self.viewpoint = viewpoint;
        Outcome::Placed
    }

    fn set_mode(&mut self, mode: MotionMode) -> Outcome {
        tracing::debug!(mode = mode.name(), "motion mode");
        self.mode = mode;
        Outcome::Adjusted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{CityConfig, CityGenerator};

    fn city(side: i64, seed: u64) -> City {
        CityGenerator::new(CityConfig::default())
            .generate_with_seed(side, seed)
            .unwrap()
    }

    fn config_at(position: Vec3) -> NavConfig {
        NavConfig {
            start: Some(Viewpoint::new(position, 0.0, 0.0)),
            ..NavConfig::default()
        }
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn default_start_overlooks_city() {
        let session = Session::new(city(5, 1), &NavConfig::default());
        let v = session.viewpoint();
        assert_eq!(v.position, Vec3::new(5.0, 10.0, 0.0));
        assert!(v.look().z > 0.0);
        assert!(v.look().y < 0.0);
    }

    #[test]
    fn step_forward_above_roofs() {
        let mut session = Session::new(city(5, 1), &config_at(Vec3::new(5.0, 50.0, 1.0)));
        let r = session.handle_intent(Intent::StepForward);
        assert!(close(r.viewpoint.position, Vec3::new(5.0, 50.0, 1.5)));
        assert_eq!(r.outcome, Outcome::Moved(Verdict::Accepted));
        assert!(r.redraw_requested());
    }

    #[test]
    fn blocked_step_leaves_viewpoint_unchanged() {
        let start = Vec3::new(5.0, 0.3, 1.0);
        let mut session = Session::new(city(5, 1), &config_at(Vec3::new(5.0, 50.0, 1.0)));
        session.viewpoint = session.viewpoint.moved_to(start);
        let r = session.handle_intent(Intent::StepForward);
        assert_eq!(r.viewpoint.position, start);
        assert!(matches!(r.outcome, Outcome::Moved(Verdict::Blocked { .. })));
    }

    #[test]
    fn end_to_end_forward_step_is_rejected() {
        let city = city(3, 42);
        assert_eq!(city.building_count(), 9);
        let start = Vec3::new(7.5, 0.3, 5.0);
        let mut session = Session::new(city, &config_at(start));
        let r = session.handle_intent(Intent::StepForward);
        assert_eq!(r.viewpoint.position, start);
        assert!(matches!(r.outcome, Outcome::Moved(v) if v.is_rejection()));
    }

    #[test]
    fn turning_never_moves_the_eye() {
        let start = Vec3::new(7.5, 0.3, 5.0);
        let mut session = Session::new(city(3, 42), &config_at(start));
        for intent in [Intent::TurnLeft, Intent::TurnRight, Intent::LookUp, Intent::LookDown] {
            let r = session.handle_intent(intent);
            assert_eq!(r.outcome, Outcome::Turned);
            assert_eq!(r.viewpoint.position, start);
        }
    }

    #[test]
    fn turn_left_rotates_toward_positive_x() {
        let mut session = Session::new(
            city(3, 1),
            &NavConfig {
                angle_step_degrees: 90.0,
                ..config_at(Vec3::new(3.0, 20.0, 3.0))
            },
        );
        session.handle_intent(Intent::TurnLeft);
        assert!(close(session.viewpoint().look(), Vec3::X));
        session.handle_intent(Intent::TurnRight);
        session.handle_intent(Intent::TurnRight);
        assert!(close(session.viewpoint().look(), -Vec3::X));
    }

    #[test]
    fn strafe_moves_sideways() {
        let mut session = Session::new(city(5, 1), &config_at(Vec3::new(5.0, 50.0, 5.0)));
        session.handle_intent(Intent::StrafeLeft);
        assert!(close(session.viewpoint().position, Vec3::new(5.5, 50.0, 5.0)));
        session.handle_intent(Intent::StrafeRight);
        session.handle_intent(Intent::StrafeRight);
        assert!(close(session.viewpoint().position, Vec3::new(4.5, 50.0, 5.0)));
    }

    #[test]
    fn walk_mode_keeps_height_and_ignores_vertical() {
        let mut config = config_at(Vec3::new(5.0, 50.0, 5.0));
        config.start = config.start.map(|v| v.tilted(0.5));
        let mut session = Session::new(city(5, 1), &config);
        session.handle_intent(Intent::WalkMode);
        assert_eq!(session.mode(), MotionMode::Walk);
        session.handle_intent(Intent::StepForward);
        assert!(close(session.viewpoint().position, Vec3::new(5.0, 50.0, 5.5)));
        let r = session.handle_intent(Intent::MoveUp);
        assert_eq!(r.outcome, Outcome::Ignored);
        assert!(!r.redraw_requested());
    }

    #[test]
    fn fly_mode_follows_pitch() {
        let mut config = config_at(Vec3::new(5.0, 50.0, 5.0));
        config.start = config.start.map(|v| v.tilted(std::f32::consts::FRAC_PI_4));
        let mut session = Session::new(city(5, 1), &config);
        session.handle_intent(Intent::StepForward);
        let p = session.viewpoint().position;
        assert!(p.y > 50.0);
        assert!(p.z > 5.0);
    }

    #[test]
    fn moving_down_clamps_above_ground_on_open_edge() {
        // The far edge belongs to no cell, so only the ground clamp applies.
        let mut session = Session::new(city(5, 1), &config_at(Vec3::new(10.0, 0.4, 10.0)));
        let r = session.handle_intent(Intent::MoveDown);
        assert_eq!(r.viewpoint.position, Vec3::new(10.0, 0.25, 10.0));
        assert_eq!(r.outcome, Outcome::Moved(Verdict::Clamped));
    }

    #[test]
    fn reset_restores_start_and_fly_mode() {
        let start = Vec3::new(5.0, 50.0, 5.0);
        let mut session = Session::new(city(5, 1), &config_at(start));
        session.handle_intent(Intent::WalkMode);
        session.handle_intent(Intent::StepForward);
        session.handle_intent(Intent::TurnLeft);
        let r = session.handle_intent(Intent::ResetPose);
        assert_eq!(r.outcome, Outcome::Reset);
        assert_eq!(r.viewpoint, session.start());
        assert_eq!(r.viewpoint.position, start);
        assert_eq!(session.mode(), MotionMode::Fly);
    }

    #[test]
    fn tuning_scales_steps() {
        let mut session = Session::new(city(3, 1), &NavConfig::default());
        session.handle_intent(Intent::FasterSteps);
        assert!((session.step() - 0.55).abs() < 1e-6);
        session.handle_intent(Intent::SlowerSteps);
        assert!((session.step() - 0.5).abs() < 1e-6);
        let before = session.angle_step();
        let r = session.handle_intent(Intent::WiderTurns);
        assert!((session.angle_step() - before * 1.1).abs() < 1e-6);
        assert_eq!(r.outcome, Outcome::Adjusted);
        assert!(!r.redraw_requested());
        session.handle_intent(Intent::NarrowerTurns);
        assert!((session.angle_step() - before).abs() < 1e-6);
    }

    #[test]
    fn reports_and_exit() {
        let mut session = Session::new(city(3, 1), &NavConfig::default());
        assert_eq!(
            session.handle_intent(Intent::PrintLocation).outcome,
            Outcome::LocationRequested
        );
        assert_eq!(session.handle_intent(Intent::Help).outcome, Outcome::HelpRequested);
        assert!(session.handle_intent(Intent::Exit).is_exit());
    }

    #[test]
    fn accepted_positions_respect_invariants() {
        let city = city(6, 99);
        let grid = city.grid().clone();
        let mut session = Session::new(city, &config_at(Vec3::new(6.0, 30.0, 1.0)));
        let validator = CollisionValidator::new(&grid, 0.25);
        let script = [
            Intent::LookDown,
            Intent::StepForward,
            Intent::MoveDown,
            Intent::StrafeLeft,
            Intent::TurnRight,
            Intent::StepBackward,
        ];
        for _ in 0..200 {
            for intent in script {
                let r = session.handle_intent(intent);
                assert!(validator.is_legal(r.viewpoint.position), "{:?}", r);
            }
        }
    }

    #[test]
    fn journal_records_and_replays() {
        let config = config_at(Vec3::new(6.0, 30.0, 1.0));
        let mut session = Session::new(city(6, 7), &config);
        let script = [
            Command::from(Intent::LookDown),
            Command::from(Intent::StepForward),
            Command::from(Intent::TurnLeft),
            Command::from(Intent::MoveDown),
            Command::from(Intent::FasterSteps),
            Command::from(Intent::StrafeRight),
            Command::Apply {
                intent: Intent::StepBackward,
                amount: Some(0.8),
            },
        ];
        for _ in 0..30 {
            for command in script {
                session.apply_command(command);
            }
        }
        session.set_viewpoint(Viewpoint::new(Vec3::new(6.0, 40.0, 6.0), 0.3, -0.2));
        assert_eq!(session.journal().len(), 211);
        let commands: Vec<Command> = session.journal().iter().map(|e| e.command).collect();
        let replayed = Session::replay(city(6, 7), &config, commands);
        assert_eq!(replayed.viewpoint(), session.viewpoint());
        assert_eq!(replayed.journal(), session.journal());

        let drained = session.drain_journal();
        assert_eq!(drained.len(), 211);
        assert!(session.journal().is_empty());
    }

    #[test]
    fn command_amounts_override_steps_once() {
        let mut session = Session::new(city(5, 1), &config_at(Vec3::new(5.0, 50.0, 5.0)));
        let r = session.apply_command(Command::Apply {
            intent: Intent::StepForward,
            amount: Some(2.0),
        });
        assert!(close(r.viewpoint.position, Vec3::new(5.0, 50.0, 7.0)));
        assert_eq!(session.step(), 0.5);

        session.apply_command(Command::Apply {
            intent: Intent::TurnLeft,
            amount: Some(90.0),
        });
        assert!(close(session.viewpoint().look(), Vec3::X));

        let r = session.apply_command(Command::Apply {
            intent: Intent::WalkMode,
            amount: Some(3.0),
        });
        assert_eq!(r.outcome, Outcome::Adjusted);
        assert_eq!(session.step(), 0.5);
    }

    #[test]
    fn command_moves_are_still_validated() {
        let mut session = Session::new(city(5, 1), &config_at(Vec3::new(5.0, 50.0, 5.0)));
        let r = session.apply_command(Command::Apply {
            intent: Intent::StepForward,
            amount: Some(100.0),
        });
        assert_eq!(r.outcome, Outcome::Moved(Verdict::OutOfBounds { clamped: false }));
        assert_eq!(r.viewpoint.position, Vec3::new(5.0, 50.0, 5.0));
        let r = session.apply_command(Command::Apply {
            intent: Intent::MoveDown,
            amount: Some(49.9),
        });
        assert!(matches!(r.outcome, Outcome::Moved(Verdict::Blocked { .. })));
    }

    #[test]
    fn set_viewpoint_accepts_legal_poses_only() {
        let mut session = Session::new(city(5, 1), &config_at(Vec3::new(5.0, 50.0, 5.0)));
        let target = Viewpoint::new(Vec3::new(2.0, 30.0, 8.0), 1.0, -0.4);
        let r = session.set_viewpoint(target);
        assert_eq!(r.outcome, Outcome::Placed);
        assert!(r.redraw_requested());
        assert_eq!(r.viewpoint.position, target.position);
        assert!(close(r.viewpoint.look(), target.look()));

        for illegal in [
            Vec3::new(3.0, 0.3, 3.0),
            Vec3::new(3.0, 0.1, 9.9),
            Vec3::new(-1.0, 50.0, 3.0),
        ] {
            let r = session.set_viewpoint(Viewpoint::new(illegal, 0.0, 0.0));
            assert_eq!(r.outcome, Outcome::PlacementRefused);
            assert_eq!(r.viewpoint.position, target.position);
        }
    }

    #[test]
    fn degenerate_viewpoint_command_is_refused() {
        let mut session = Session::new(city(3, 1), &config_at(Vec3::new(3.0, 20.0, 3.0)));
        let r = session.apply_command(Command::Viewpoint {
            eye: [1.0, 20.0, 1.0],
            target: [1.0, 20.0, 1.0],
            up: [0.0, 1.0, 0.0],
        });
        assert_eq!(r.outcome, Outcome::PlacementRefused);
        assert_eq!(r.viewpoint.position, Vec3::new(3.0, 20.0, 3.0));
    }

    #[test]
    fn location_report_feeds_viewpoint_command() {
        let here = Session::new(city(5, 1), &config_at(Vec3::new(1.0, 50.0, 3.0)));
        let line = format!("viewpoint {}", here.describe_location(false));
        let command = Command::parse(&line).unwrap().unwrap();

        let mut there = Session::new(city(5, 1), &config_at(Vec3::new(5.0, 50.0, 5.0)));
        let r = there.apply_command(command);
        assert_eq!(r.outcome, Outcome::Placed);
        assert_eq!(there.viewpoint(), here.viewpoint());
    }

    #[test]
    fn view_mode_orbits_the_look_at_point() {
        let mut session = Session::new(city(5, 1), &config_at(Vec3::new(5.0, 50.0, 5.0)));
        let pivot = session.viewpoint().target();
        session.handle_intent(Intent::ViewMode);
        assert_eq!(session.mode(), MotionMode::View);
        let r = session.apply_command(Command::Apply {
            intent: Intent::TurnLeft,
            amount: Some(90.0),
        });
        assert_eq!(r.outcome, Outcome::Moved(Verdict::Accepted));
        assert!(close(r.viewpoint.position, Vec3::new(4.0, 50.0, 6.0)));
        assert!(close(r.viewpoint.target(), pivot));

        let r = session.apply_command(Command::Apply {
            intent: Intent::LookUp,
            amount: Some(30.0),
        });
        assert!(close(r.viewpoint.target(), pivot));
        assert!(r.viewpoint.position.y < 50.0);
    }

    #[test]
    fn view_mode_orbit_off_the_map_is_refused() {
        let start = Viewpoint::new(Vec3::new(0.5, 50.0, 5.0), 0.0, 0.0);
        let mut session = Session::new(city(5, 1), &config_at(start.position));
        session.handle_intent(Intent::ViewMode);
        let r = session.apply_command(Command::Apply {
            intent: Intent::TurnLeft,
            amount: Some(90.0),
        });
        assert_eq!(r.outcome, Outcome::Moved(Verdict::OutOfBounds { clamped: false }));
        assert_eq!(r.viewpoint, start);
    }

    #[test]
    fn view_mode_steps_follow_pitch_and_reset_leaves_it() {
        let mut session = Session::new(city(5, 1), &config_at(Vec3::new(5.0, 50.0, 5.0)));
        session.handle_intent(Intent::ViewMode);
        session.handle_intent(Intent::MoveUp);
        assert!(close(session.viewpoint().position, Vec3::new(5.0, 50.5, 5.0)));
        session.handle_intent(Intent::ResetPose);
        assert_eq!(session.mode(), MotionMode::Fly);
    }

    #[test]
    fn location_line_has_columns() {
        let session = Session::new(city(3, 1), &config_at(Vec3::new(1.0, 2.0, 3.0)));
        let text = session.describe_location(true);
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("     CX"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("   1.00    2.00    3.00"));
        assert!(row.ends_with("fly"));
        assert_eq!(session.describe_location(false), row);
    }
}
