use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::TILE_SIZE;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read map file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid character {found:?} at line {line}, column {column}")]
    InvalidCharacter {
        found: char,
        line: usize,
        column: usize,
    },
    #[error("map row {line} has {found} cells, expected {expected}")]
    RaggedRow {
        line: usize,
        found: usize,
        expected: usize,
    },
    #[error("map file is empty")]
    Empty,
    #[error("map has no empty cell to place the player")]
    NoSpawn,
}

/// Static rectangular occupancy grid. Immutable for the session;
/// continuous coordinates map to cells by floor division with TILE_SIZE.
#[derive(Debug)]
pub struct WorldGrid {
    width: usize,
    height: usize,
    cells: Vec<bool>, // row-major, true = solid
}

impl WorldGrid {
    pub fn load(path: &Path) -> Result<Self, MapError> {
        let text = fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parses one row per line, `0` = empty and `1` = solid. Rejects any
    /// other character and ragged rows.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let mut width = 0;
        let mut height = 0;
        let mut cells = Vec::new();

        for (row, line) in text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let mut row_len = 0;
            for (col, ch) in line.chars().enumerate() {
                match ch {
                    '0' => cells.push(false),
                    '1' => cells.push(true),
                    _ => {
                        return Err(MapError::InvalidCharacter {
                            found: ch,
                            line: row + 1,
                            column: col + 1,
                        });
                    }
                }
                row_len += 1;
            }
            if height == 0 {
                width = row_len;
            } else if row_len != width {
                return Err(MapError::RaggedRow {
                    line: row + 1,
                    found: row_len,
                    expected: width,
                });
            }
            height += 1;
        }

        if width == 0 || height == 0 {
            return Err(MapError::Empty);
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn cell(&self, col: isize, row: isize) -> Option<bool> {
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return None;
        }
        Some(self.cells[row as usize * self.width + col as usize])
    }

    /// Spatial query for ray marching: true iff the point lies inside the
    /// grid and its cell is solid. Out-of-bounds points read as empty, so
    /// a ray past the map edge runs on until max depth and reports no hit.
    pub fn is_solid(&self, x: f32, y: f32) -> bool {
        let col = (x / TILE_SIZE).floor() as isize;
        let row = (y / TILE_SIZE).floor() as isize;
        self.cell(col, row).unwrap_or(false)
    }

    /// Spatial query for movement: out-of-bounds counts as solid, so the
    /// world is bounded and the player cannot leave the grid.
    pub fn blocks_movement(&self, x: f32, y: f32) -> bool {
        let col = (x / TILE_SIZE).floor() as isize;
        let row = (y / TILE_SIZE).floor() as isize;
        self.cell(col, row).unwrap_or(true)
    }

    /// World coordinates of the center of the first empty cell in
    /// row-major order.
    pub fn spawn_point(&self) -> Result<(f32, f32), MapError> {
        for row in 0..self.height {
            for col in 0..self.width {
                if !self.cells[row * self.width + col] {
                    return Ok((
                        (col as f32 + 0.5) * TILE_SIZE,
                        (row as f32 + 0.5) * TILE_SIZE,
                    ));
                }
            }
        }
        Err(MapError::NoSpawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring3() -> WorldGrid {
        WorldGrid::parse("111\n101\n111\n").unwrap()
    }

    #[test]
    fn parse_dimensions() {
        let grid = ring3();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
    }

    #[test]
    fn parse_rejects_bad_character() {
        let err = WorldGrid::parse("101\n1x1\n").unwrap_err();
        match err {
            MapError::InvalidCharacter {
                found,
                line,
                column,
            } => {
                assert_eq!(found, 'x');
                assert_eq!(line, 2);
                assert_eq!(column, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        let err = WorldGrid::parse("111\n10\n").unwrap_err();
        assert!(matches!(err, MapError::RaggedRow { line: 2, .. }));
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert!(matches!(WorldGrid::parse(""), Err(MapError::Empty)));
        assert!(matches!(WorldGrid::parse("\n\n"), Err(MapError::Empty)));
    }

    #[test]
    fn solid_and_empty_cells() {
        let grid = ring3();
        // center of cell (1, 1) is empty
        assert!(!grid.is_solid(1.5 * TILE_SIZE, 1.5 * TILE_SIZE));
        // center of cell (0, 0) is solid
        assert!(grid.is_solid(0.5 * TILE_SIZE, 0.5 * TILE_SIZE));
    }

    #[test]
    fn out_of_bounds_is_empty_for_rays() {
        let grid = ring3();
        assert!(!grid.is_solid(-1.0, 40.0));
        assert!(!grid.is_solid(40.0, -1.0));
        assert!(!grid.is_solid(3.0 * TILE_SIZE + 1.0, 40.0));
        assert!(!grid.is_solid(40.0, 3.0 * TILE_SIZE + 1.0));
    }

    #[test]
    fn out_of_bounds_blocks_movement() {
        let grid = ring3();
        assert!(grid.blocks_movement(-1.0, 40.0));
        assert!(grid.blocks_movement(40.0, -1.0));
        assert!(grid.blocks_movement(3.0 * TILE_SIZE + 1.0, 40.0));
    }

    #[test]
    fn spawn_is_first_empty_cell_center() {
        let grid = ring3();
        let (x, y) = grid.spawn_point().unwrap();
        assert_eq!(x, 1.5 * TILE_SIZE);
        assert_eq!(y, 1.5 * TILE_SIZE);
    }

    #[test]
    fn spawn_fails_on_all_solid_grid() {
        let grid = WorldGrid::parse("11\n11\n").unwrap();
        assert!(matches!(grid.spawn_point(), Err(MapError::NoSpawn)));
    }
}
