use ndarray::Array2;

use crate::frame::{BoundingBox, Point};

/// Statistics for a single connected component.
#[derive(Clone, Debug)]
pub struct ComponentStats {
    /// Unique label for this component.
    pub label: u32,
    /// Number of pixels in the component.
    pub area: usize,
    /// Bounding box: (min_row, max_row, min_col, max_col).
    pub bbox: (usize, usize, usize, usize),
    sum_row: f64,
    sum_col: f64,
}

impl ComponentStats {
    /// Mean pixel position (x = column, y = row).
    pub fn centroid(&self) -> Point {
        Point::new(self.sum_col / self.area as f64, self.sum_row / self.area as f64)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let (min_row, max_row, min_col, max_col) = self.bbox;
        BoundingBox {
            x: min_col,
            y: min_row,
            width: max_col - min_col + 1,
            height: max_row - min_row + 1,
        }
    }
}

/// Perform connected component analysis on a binary mask using two-pass
/// labeling with union-find. Uses 8-connectivity.
///
/// Returns component statistics sorted by area descending. Components of equal
/// area keep raster-scan order of their first pixel.
pub fn connected_components(mask: &Array2<bool>) -> Vec<ComponentStats> {
    let (h, w) = mask.dim();
    if h == 0 || w == 0 {
        return Vec::new();
    }

    let mut labels = Array2::<u32>::zeros((h, w));
    let mut next_label: u32 = 1;
    // Union-find parent array. Index 0 unused; labels start at 1.
    let mut parent: Vec<u32> = vec![0; h * w / 2 + 2];

    // Pass 1: assign provisional labels from the already-visited neighbors
    // (up-left, up, up-right, left).
    for row in 0..h {
        for col in 0..w {
            if !mask[[row, col]] {
                continue;
            }

            let mut neighbors = [0u32; 4];
            if row > 0 {
                if col > 0 {
                    neighbors[0] = labels[[row - 1, col - 1]];
                }
                neighbors[1] = labels[[row - 1, col]];
                if col + 1 < w {
                    neighbors[2] = labels[[row - 1, col + 1]];
                }
            }
            if col > 0 {
                neighbors[3] = labels[[row, col - 1]];
            }

            match neighbors.iter().copied().filter(|&l| l > 0).min() {
                None => {
                    if next_label as usize >= parent.len() {
                        parent.resize(parent.len() * 2, 0);
                    }
                    parent[next_label as usize] = next_label;
                    labels[[row, col]] = next_label;
                    next_label += 1;
                }
                Some(smallest) => {
                    labels[[row, col]] = smallest;
                    for &other in neighbors.iter().filter(|&&l| l > 0 && l != smallest) {
                        union(&mut parent, smallest, other);
                    }
                }
            }
        }
    }

    // Flatten parent references.
    for i in 1..next_label as usize {
        parent[i] = find(&parent, i as u32);
    }

    // Pass 2: resolve labels and collect stats. Roots are the smallest label of
    // their set, so indexing by root keeps first-seen order.
    let mut slots: Vec<Option<ComponentStats>> = vec![None; next_label as usize];

    for row in 0..h {
        for col in 0..w {
            let lbl = labels[[row, col]];
            if lbl == 0 {
                continue;
            }
            let root = parent[lbl as usize];

            let entry = slots[root as usize].get_or_insert(ComponentStats {
                label: root,
                area: 0,
                bbox: (row, row, col, col),
                sum_row: 0.0,
                sum_col: 0.0,
            });

            entry.area += 1;
            entry.sum_row += row as f64;
            entry.sum_col += col as f64;
            entry.bbox.0 = entry.bbox.0.min(row);
            entry.bbox.1 = entry.bbox.1.max(row);
            entry.bbox.2 = entry.bbox.2.min(col);
            entry.bbox.3 = entry.bbox.3.max(col);
        }
    }

    let mut components: Vec<ComponentStats> = slots.into_iter().flatten().collect();
    components.sort_by(|a, b| b.area.cmp(&a.area));
    components
}

/// Fill every background pocket that is not 4-connected to the border.
///
/// Foreground is 8-connected, so background must be 4-connected for closed
/// outlines (such as a Canny ring) to enclose their interior.
pub fn fill_holes(mask: &Array2<bool>) -> Array2<bool> {
    let (h, w) = mask.dim();
    let mut outside = Array2::from_elem((h, w), false);
    let mut stack = Vec::new();

    for row in 0..h {
        for col in 0..w {
            let on_border = row == 0 || col == 0 || row + 1 == h || col + 1 == w;
            if on_border && !mask[[row, col]] {
                outside[[row, col]] = true;
                stack.push((row, col));
            }
        }
    }

    while let Some((row, col)) = stack.pop() {
        let neighbors = [
            (row.wrapping_sub(1), col),
            (row + 1, col),
            (row, col.wrapping_sub(1)),
            (row, col + 1),
        ];
        for (r, c) in neighbors {
            if r < h && c < w && !mask[[r, c]] && !outside[[r, c]] {
                outside[[r, c]] = true;
                stack.push((r, c));
            }
        }
    }

    outside.mapv(|o| !o)
}

fn find(parent: &[u32], mut x: u32) -> u32 {
    while parent[x as usize] != x {
        x = parent[x as usize];
    }
    x
}

fn union(parent: &mut [u32], a: u32, b: u32) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        // Merge larger root into smaller root to keep labels consistent.
        let (small, big) = if ra < rb { (ra, rb) } else { (rb, ra) };
        parent[big as usize] = small;
    }
}
