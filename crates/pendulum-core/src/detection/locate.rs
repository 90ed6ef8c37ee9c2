use crate::frame::{Detection, Mask};

use super::components::{connected_components, fill_holes};

/// Locate the bob in a mask.
///
/// Pipeline: fill enclosed holes -> connected component analysis -> drop
/// regions smaller than `min_area` -> select the largest (first found on
/// ties) -> centroid and bounding box.
///
/// Area is the area an outer outline encloses, so a closed edge ring counts
/// like the solid disc it bounds.
///
/// Returns `None` if no region reaches `min_area`.
pub fn locate(mask: &Mask, min_area: usize) -> Option<Detection> {
    let components = connected_components(&fill_holes(mask));

    // Sorted by area, so the first entry is the only candidate.
    let largest = components.first()?;
    if largest.area < min_area.max(1) {
        return None;
    }

    Some(Detection {
        center: largest.centroid(),
        bbox: largest.bounding_box(),
        area: largest.area,
    })
}
