// ---------------------------------------------------------------------------
// TerrainError: rejected configurations
// ---------------------------------------------------------------------------

use std::fmt;

use crate::config::MAX_TERRAIN_SIZE;

/// Errors returned when a terrain cannot be built from its configuration.
///
/// Generation itself has no recoverable failure modes; everything here is
/// caught by `TerrainConfig::validate` before the grid is allocated.
#[derive(Debug, Clone, PartialEq)]
pub enum TerrainError {
    /// Grid dimension is not `2^k + 1`, or exceeds `MAX_TERRAIN_SIZE`.
    InvalidSize { size: usize },
    /// A numeric parameter is non-finite or outside its allowed range.
    InvalidParameter { name: &'static str, value: f64 },
}

impl fmt::Display for TerrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerrainError::InvalidSize { size } => write!(
                f,
                "Invalid terrain size {size}: must be 2^k + 1 (e.g. 5, 9, 17, 129) and at most {MAX_TERRAIN_SIZE}"
            ),
            TerrainError::InvalidParameter { name, value } => {
                write!(f, "Invalid terrain parameter {name}: {value}")
            }
        }
    }
}

impl std::error::Error for TerrainError {}
