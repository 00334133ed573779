use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use skyline_kernel::WallTexture;

/// Texture bound for one group of faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureSlot {
    Ground,
    Roof,
    Wall(WallTexture),
}

impl TextureSlot {
    /// Every slot, in draw order.
    pub fn all() -> impl Iterator<Item = TextureSlot> {
        [TextureSlot::Ground, TextureSlot::Roof]
            .into_iter()
            .chain(WallTexture::ALL.into_iter().map(TextureSlot::Wall))
    }
}

impl fmt::Display for TextureSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ground => f.write_str("ground"),
            Self::Roof => f.write_str("roof"),
            Self::Wall(wall) => write!(f, "wall/{}", wall.name()),
        }
    }
}

/// Image asset for each texture slot. Relative paths resolve against the
/// asset root handed to [`TextureSet::missing`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureSet {
    pub ground: PathBuf,
    pub roof: PathBuf,
    pub apartment: PathBuf,
    pub office: PathBuf,
    pub business: PathBuf,
    pub new_apartment: PathBuf,
}

impl Default for TextureSet {
    fn default() -> Self {
        Self {
            ground: "textures/ground.png".into(),
            roof: "textures/roof.png".into(),
            apartment: "textures/apartment.png".into(),
            office: "textures/office.png".into(),
            business: "textures/business.png".into(),
            new_apartment: "textures/new_apartment.png".into(),
        }
    }
}

impl TextureSet {
    pub fn path(&self, slot: TextureSlot) -> &Path {
        match slot {
            TextureSlot::Ground => &self.ground,
            TextureSlot::Roof => &self.roof,
            TextureSlot::Wall(WallTexture::Apartment) => &self.apartment,
            TextureSlot::Wall(WallTexture::Office) => &self.office,
            TextureSlot::Wall(WallTexture::Business) => &self.business,
            TextureSlot::Wall(WallTexture::NewApartment) => &self.new_apartment,
        }
    }

    /// Slots whose asset file does not exist under `root`.
    pub fn missing(&self, root: &Path) -> Vec<TextureSlot> {
        TextureSlot::all()
            .filter(|slot| !root.join(self.path(*slot)).is_file())
            .collect()
    }
}
