use crate::error::{GridSenseError, Result};
use rand::Rng;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Unit moves of the random walk: east, west, south, north
const MOVES: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Random walk obstacle generation settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleParams {
    /// Share of the grid that ends up blocked, in [0, 1]
    pub density: f64,
    /// Rocks started per generation round
    pub rock_count: usize,
    /// Longest walk of a single rock, in cells
    pub max_rock_length: i32,
}

/// Number of obstacles a grid receives at `density`
pub fn target_obstacle_count(rows: i32, cols: i32, density: f64) -> usize {
    let total = (rows as i64 * cols as i64).max(0) as usize;
    ((total as f64 * density).floor() as usize).min(total)
}

/// Generate obstacles by random walks.
///
/// Rounds of `rock_count` rocks are walked until at least the target count
/// is reached; each rock starts on a uniformly chosen cell and takes up to
/// `max_rock_length - 1` steps, each to a uniformly chosen in-bounds
/// neighbour. Surplus ids are then removed at random. Returned sorted.
pub fn generate_obstacles<R: Rng>(
    rows: i32,
    cols: i32,
    params: &ObstacleParams,
    rng: &mut R,
) -> Vec<i32> {
    let total = rows * cols;
    let target = target_obstacle_count(rows, cols, params.density);
    let max_length = params.max_rock_length.max(1);

    let mut blocked = HashSet::new();
    while blocked.len() < target {
        for _ in 0..params.rock_count.max(1) {
            let length = rng.gen_range(1..=max_length);
            let start = rng.gen_range(0..total);
            blocked.insert(start);

            let (mut x, mut y) = (start % cols, start / cols);
            for _ in 1..length {
                let moves: Vec<(i32, i32)> = MOVES
                    .iter()
                    .copied()
                    .filter(|&(dx, dy)| {
                        x + dx >= 0 && x + dx < cols && y + dy >= 0 && y + dy < rows
                    })
                    .collect();
                if moves.is_empty() {
                    break; // 1x1 grid
                }
                let (dx, dy) = moves[rng.gen_range(0..moves.len())];
                x += dx;
                y += dy;
                blocked.insert(x + y * cols);
            }
        }
    }

    // Sort before trimming so a seeded rng gives the same layout every run
    let mut ids: Vec<i32> = blocked.into_iter().collect();
    ids.sort_unstable();
    while ids.len() > target {
        let index = rng.gen_range(0..ids.len());
        ids.remove(index);
    }
    ids
}

/// Obstacle layout read from a character grid
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub rows: i32,
    pub cols: i32,
    pub obstacles: Vec<i32>,
}

/// Parse a layout.
/// Format:
/// - ■ or #: obstacle
/// - □, ., o, s or space: free cell
///
/// Blank lines are skipped. All rows must have the same width.
pub fn parse_layout(text: &str) -> Result<Layout> {
    let mut cols: Option<usize> = None;
    let mut rows = 0;
    let mut obstacles = Vec::new();

    for (line_index, line) in text.lines().enumerate() {
        let line_no = line_index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let width = line.chars().count();
        match cols {
            None => cols = Some(width),
            Some(expected) if expected != width => {
                return Err(GridSenseError::Layout {
                    line: line_no,
                    message: format!("row has {} cells, expected {}", width, expected),
                });
            }
            Some(_) => {}
        }

        for (x, ch) in line.chars().enumerate() {
            match ch {
                '■' | '#' => obstacles.push(x as i32 + rows * width as i32),
                '□' | '.' | 'o' | 's' | ' ' => {}
                other => {
                    return Err(GridSenseError::Layout {
                        line: line_no,
                        message: format!("unexpected character '{}' at column {}", other, x + 1),
                    });
                }
            }
        }
        rows += 1;
    }

    let Some(cols) = cols else {
        return Err(GridSenseError::Layout {
            line: 0,
            message: "layout has no rows".to_string(),
        });
    };

    Ok(Layout {
        rows,
        cols: cols as i32,
        obstacles,
    })
}

pub fn load_layout(path: &Path) -> Result<Layout> {
    let contents = fs::read_to_string(path)?;
    parse_layout(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params(density: f64) -> ObstacleParams {
        ObstacleParams {
            density,
            rock_count: 4,
            max_rock_length: 5,
        }
    }

    #[test]
    fn test_target_count() {
        assert_eq!(target_obstacle_count(100, 100, 0.2), 2000);
        assert_eq!(target_obstacle_count(3, 3, 0.5), 4);
        assert_eq!(target_obstacle_count(3, 3, 0.0), 0);
        assert_eq!(target_obstacle_count(3, 3, 1.0), 9);
    }

    #[test]
    fn test_generates_exact_count_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let ids = generate_obstacles(20, 30, &params(0.25), &mut rng);

        assert_eq!(ids.len(), 150);
        assert!(ids.iter().all(|&id| (0..600).contains(&id)));
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate_obstacles(15, 15, &params(0.3), &mut StdRng::seed_from_u64(42));
        let b = generate_obstacles(15, 15, &params(0.3), &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_extreme_densities() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_obstacles(10, 10, &params(0.0), &mut rng).is_empty());
        assert_eq!(generate_obstacles(3, 4, &params(1.0), &mut rng).len(), 12);
        assert_eq!(generate_obstacles(1, 1, &params(1.0), &mut rng), vec![0]);
    }

    #[test]
    fn test_single_column_walks_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let ids = generate_obstacles(50, 1, &params(0.5), &mut rng);
        assert_eq!(ids.len(), 25);
        assert!(ids.iter().all(|&id| (0..50).contains(&id)));
    }

    #[test]
    fn test_parse_layout() {
        let layout = parse_layout("\n□□■\n#.o\n\ns  \n").unwrap();
        assert_eq!(layout.rows, 3);
        assert_eq!(layout.cols, 3);
        assert_eq!(layout.obstacles, vec![2, 3]);
    }

    #[test]
    fn test_parse_layout_errors() {
        assert!(matches!(
            parse_layout("...\n....\n"),
            Err(GridSenseError::Layout { line: 2, .. })
        ));
        assert!(matches!(
            parse_layout("..x\n"),
            Err(GridSenseError::Layout { line: 1, .. })
        ));
        assert!(matches!(
            parse_layout("\n\n"),
            Err(GridSenseError::Layout { line: 0, .. })
        ));
    }
}
