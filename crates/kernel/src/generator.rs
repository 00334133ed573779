use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use skyline_grid::{CellCoord, CellId, GridError, GridModel};

/// Wall texture class of a building. Roofs always use their own texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WallTexture {
    Apartment,
    Office,
    Business,
    NewApartment,
}

/// Class for each value of a uniform draw in `1..=11`, at index `draw - 1`.
const FACADE_DRAW: [WallTexture; 11] = [
    WallTexture::Apartment,
    WallTexture::Apartment,
    WallTexture::Apartment,
    WallTexture::Apartment,
    WallTexture::Apartment,
    WallTexture::Office,
    WallTexture::Office,
    WallTexture::Office,
    WallTexture::Business,
    WallTexture::Business,
    WallTexture::NewApartment,
];

impl WallTexture {
    pub const ALL: [WallTexture; 4] = [
        WallTexture::Apartment,
        WallTexture::Office,
        WallTexture::Business,
        WallTexture::NewApartment,
    ];

    /// Class for a draw in `1..=11`; `None` outside that range.
    pub fn from_draw(draw: u8) -> Option<Self> {
        let index = usize::from(draw).checked_sub(1)?;
        FACADE_DRAW.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Apartment => "apartment",
            Self::Office => "office",
            Self::Business => "business",
            Self::NewApartment => "new-apartment",
        }
    }
}

/// Height distribution and seeding for generated cities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CityConfig {
    pub mean_height: f32,
    pub height_std_dev: f32,
    /// Fixed seed for reproducible cities; a random one is drawn when unset.
    pub seed: Option<u64>,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            mean_height: 4.0,
            height_std_dev: 1.0,
            seed: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("invalid height distribution: mean {mean}, std-dev {std_dev}")]
    InvalidDistribution { mean: f32, std_dev: f32 },
}

/// One generated building, as seen by renderers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Building {
    pub id: CellId,
    pub coord: CellCoord,
    pub height: f32,
    pub facade: WallTexture,
}

/// A generated city: the grid plus a wall texture for every building.
#[derive(Debug, Clone)]
pub struct City {
    grid: GridModel,
    facades: Vec<Option<WallTexture>>,
    seed: u64,
}

impl City {
    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    /// Seed the city was generated from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn facade(&self, id: CellId) -> Option<WallTexture> {
        self.facades.get(id.index()).copied().flatten()
    }

    pub fn building_count(&self) -> usize {
        self.grid.occupied_count()
    }

    /// Buildings in cell id order.
    pub fn buildings(&self) -> impl Iterator<Item = Building> + '_ {
        self.grid.buildings().filter_map(|(id, height)| {
            self.facade(id).map(|facade| Building {
                id,
                coord: self.grid.coord(id),
                height,
                facade,
            })
        })
    }
}

/// Populates a city grid with Gaussian building heights.
#[derive(Debug, Clone, Default)]
pub struct CityGenerator {
    config: CityConfig,
}

impl CityGenerator {
    pub fn new(config: CityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CityConfig {
        &self.config
    }

    /// Generate with the configured seed, or a fresh random one.
    pub fn generate(&self, side_length: i64) -> Result<City, GenerateError> {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        self.generate_with_seed(side_length, seed)
    }

    /// Generate a `side_length × side_length` city. Every cell gets a building.
    ///
    /// Cells are visited in id order; each draws its height first and then its
    /// wall class, so a seed fully determines the city.
    pub fn generate_with_seed(&self, side_length: i64, seed: u64) -> Result<City, GenerateError> {
        let _span = tracing::info_span!("generate_city", side_length, seed).entered();

        let (mean, std_dev) = (self.config.mean_height, self.config.height_std_dev);
        if !mean.is_finite() || !std_dev.is_finite() || std_dev < 0.0 {
            return Err(GenerateError::InvalidDistribution { mean, std_dev });
        }
        let heights = Normal::new(mean, std_dev)
            .map_err(|_| GenerateError::InvalidDistribution { mean, std_dev })?;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut facades = Vec::new();
        let grid = GridModel::from_fn(side_length, |_| {
            let height = reflect(heights.sample(&mut rng));
            facades.push(Some(draw_facade(&mut rng)));
            Some(height)
        })?;

        tracing::debug!(
            buildings = grid.occupied_count(),
            max_height = grid.max_height(),
            "city generated"
        );
        Ok(City {
            grid,
            facades,
            seed,
        })
    }
}

/// Negative samples are mirrored rather than redrawn.
fn reflect(sample: f32) -> f32 {
    // An exact zero would be a building with no volume.
    sample.abs().max(f32::MIN_POSITIVE)
}

fn draw_facade(rng: &mut impl Rng) -> WallTexture {
    let draw: u8 = rng.random_range(1..=11);
    FACADE_DRAW[usize::from(draw - 1)]
}
