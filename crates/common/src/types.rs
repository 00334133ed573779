use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Pitch is clamped short of vertical so the horizontal heading stays defined.
pub const MAX_PITCH: f32 = 89.0_f32 * std::f32::consts::PI / 180.0;

/// How steps and rotations move the eye.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionMode {
    /// Forward steps follow the pitch; vertical moves are allowed.
    #[default]
    Fly,
    /// Forward steps keep the eye height; vertical moves are ignored.
    Walk,
    /// Turning and looking orbit the eye around the look-at point.
    View,
}

impl MotionMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Fly => "fly",
            Self::Walk => "walk",
            Self::View => "view",
        }
    }
}

/// Eye position plus heading.
///
/// Orientation is stored as yaw/pitch in radians. Yaw 0 looks along +Z and a
/// positive yaw turns the view toward +X (a left turn when Y is up).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewpoint {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for Viewpoint {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl Viewpoint {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            yaw,
            pitch: pitch.clamp(-MAX_PITCH, MAX_PITCH),
        }
    }

    /// Eye at `position` looking toward `target`. `None` when the two
    /// coincide or either is not finite.
    pub fn looking_at(position: Vec3, target: Vec3) -> Option<Self> {
        let dir = (target - position).try_normalize()?;
        if !position.is_finite() {
            return None;
        }
        let yaw = dir.x.atan2(dir.z);
        let pitch = dir.y.clamp(-1.0, 1.0).asin();
        Some(Self::new(position, yaw, pitch))
    }

    /// Unit look direction including pitch.
    pub fn look(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        )
    }

    /// Unit look direction projected onto the ground plane.
    pub fn heading(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }

    /// Unit vector pointing to the viewer's left on the ground plane.
    pub fn left(&self) -> Vec3 {
        Vec3::Y.cross(self.heading())
    }

    /// The up vector never rolls.
    pub fn up(&self) -> Vec3 {
        Vec3::Y
    }

    /// Point one unit ahead of the eye.
    pub fn target(&self) -> Vec3 {
        self.position + self.look()
    }

    /// Same orientation, different position.
    pub fn moved_to(&self, position: Vec3) -> Self {
        Self { position, ..*self }
    }

    pub fn turned(&self, dyaw: f32) -> Self {
        Self {
            yaw: self.yaw + dyaw,
            ..*self
        }
    }

    pub fn tilted(&self, dpitch: f32) -> Self {
        Self {
            pitch: (self.pitch + dpitch).clamp(-MAX_PITCH, MAX_PITCH),
            ..*self
        }
    }
}
