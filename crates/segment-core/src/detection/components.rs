use ndarray::Array2;

use crate::frame::BoundingBox;

use super::morphology::fill_holes;
use super::threshold::Mask;

/// Per-pixel region ids: 0 is background, regions are numbered `1..=count`
/// in the raster order of their first pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelMap {
    labels: Array2<u32>,
    count: usize,
}

impl LabelMap {
    pub fn labels(&self) -> &Array2<u32> {
        &self.labels
    }

    /// Number of distinct regions.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn dim(&self) -> (usize, usize) {
        self.labels.dim()
    }

    /// Minimal box around each region, indexed by `label - 1`.
    pub fn bounding_boxes(&self) -> Vec<BoundingBox> {
        let mut extents: Vec<Option<(usize, usize, usize, usize)>> = vec![None; self.count];

        for ((row, col), &label) in self.labels.indexed_iter() {
            if label == 0 {
                continue;
            }
            let entry = &mut extents[label as usize - 1];
            *entry = Some(match *entry {
                None => (row, col, row, col),
                Some((min_row, min_col, max_row, max_col)) => (
                    min_row.min(row),
                    min_col.min(col),
                    max_row.max(row),
                    max_col.max(col),
                ),
            });
        }

        extents
            .into_iter()
            .flatten()
            .map(|(min_row, min_col, max_row, max_col)| {
                BoundingBox::new(min_row, min_col, max_row + 1, max_col + 1)
            })
            .collect()
    }
}

/// Fill enclosed holes, then label the foreground regions.
pub fn extract_components(mask: &Mask) -> LabelMap {
    let filled = fill_holes(mask);
    label_components(&filled)
}

/// Label 4-connected foreground regions using two-pass labeling with
/// union-find.
pub fn label_components(mask: &Mask) -> LabelMap {
    let (rows, cols) = mask.dim();
    let mut labels = Array2::<u32>::zeros((rows, cols));
    if rows == 0 || cols == 0 {
        return LabelMap { labels, count: 0 };
    }

    // Slot 0 is the background sentinel; provisional labels start at 1.
    let mut equivalences: Vec<u32> = vec![0];

    for ((row, col), &foreground) in mask.indexed_iter() {
        if !foreground {
            continue;
        }
        let above = if row > 0 { labels[[row - 1, col]] } else { 0 };
        let before = if col > 0 { labels[[row, col - 1]] } else { 0 };

        labels[[row, col]] = match (above, before) {
            (0, 0) => {
                let fresh = equivalences.len() as u32;
                equivalences.push(fresh);
                fresh
            }
            (a, 0) | (0, a) => a,
            (a, b) => merge(&mut equivalences, a, b),
        };
    }

    // The root of a region is its smallest provisional label, which was
    // handed out at its first pixel in raster order. Renumbering roots in
    // first-seen order therefore numbers regions in raster order too.
    let mut renumbered = vec![0u32; equivalences.len()];
    let mut count: u32 = 0;
    for label in labels.iter_mut().filter(|l| **l != 0) {
        let root = root_of(&mut equivalences, *label) as usize;
        if renumbered[root] == 0 {
            count += 1;
            renumbered[root] = count;
        }
        *label = renumbered[root];
    }

    LabelMap {
        labels,
        count: count as usize,
    }
}

/// Root of `label`, halving the path on the way up.
fn root_of(equivalences: &mut [u32], mut label: u32) -> u32 {
    while equivalences[label as usize] != label {
        let grandparent = equivalences[equivalences[label as usize] as usize];
        equivalences[label as usize] = grandparent;
        label = grandparent;
    }
    label
}

/// Join the sets of `a` and `b` under the smaller root and return the
/// smaller of the two labels.
fn merge(equivalences: &mut [u32], a: u32, b: u32) -> u32 {
    let (ra, rb) = (root_of(equivalences, a), root_of(equivalences, b));
    if ra != rb {
        equivalences[ra.max(rb) as usize] = ra.min(rb);
    }
    a.min(b)
}
