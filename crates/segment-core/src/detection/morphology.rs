use std::collections::HashSet;

use super::components::label_components;
use super::threshold::Mask;

/// Fill every background region that is fully enclosed by foreground.
///
/// Background is split into 4-connected regions; a region is a hole unless
/// it reaches the image border. Holes become foreground, the input mask is
/// left untouched.
pub fn fill_holes(mask: &Mask) -> Mask {
    let (h, w) = mask.dim();
    if h == 0 || w == 0 {
        return mask.clone();
    }

    let background = mask.mapv(|v| !v);
    let regions = label_components(&background);
    let labels = regions.labels();

    let mut open: HashSet<u32> = HashSet::new();
    for col in 0..w {
        open.insert(labels[[0, col]]);
        open.insert(labels[[h - 1, col]]);
    }
    for row in 0..h {
        open.insert(labels[[row, 0]]);
        open.insert(labels[[row, w - 1]]);
    }

    let mut filled = mask.clone();
    filled.zip_mut_with(labels, |px, &label| {
        if label != 0 && !open.contains(&label) {
            *px = true;
        }
    });
    filled
}
