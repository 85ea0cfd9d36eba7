//! Normalized surface distance (surface dice) between boundary pixels
//!
//! The boundary of a region is every set pixel with at least one unset
//! 4-neighbour, pixels on the image border included. NSD is the fraction of
//! boundary pixels, counted on both masks, that lie within `tau` of the other
//! mask's boundary.

use crate::{
    distance::squared_distance_to,
    error::{MetricError, Result},
    mask::OneHotMask,
    numeric::nan_to_zero,
};

/// Boundary pixels of a region
pub fn boundary(region: &[bool], width: usize, height: usize) -> Vec<bool> {
    let at = |x: usize, y: usize| region[y * width + x];
    let mut edges = vec![false; region.len()];

    for y in 0..height {
        for x in 0..width {
            if !at(x, y) {
                continue;
            }
            let interior = x > 0
                && y > 0
                && x + 1 < width
                && y + 1 < height
                && at(x - 1, y)
                && at(x + 1, y)
                && at(x, y - 1)
                && at(x, y + 1);
            edges[y * width + x] = !interior;
        }
    }

    edges
}

/// Raw surface dice of two regions at tolerance `tau`
///
/// Returns NaN when neither region has a boundary; callers that must not emit
/// NaN go through [`normalized_surface_distance`].
pub fn surface_dice(
    reference: &[bool],
    prediction: &[bool],
    width: usize,
    height: usize,
    tau: f64,
) -> f64 {
    let reference_edges = boundary(reference, width, height);
    let prediction_edges = boundary(prediction, width, height);

    let to_reference = squared_distance_to(&reference_edges, width, height);
    let to_prediction = squared_distance_to(&prediction_edges, width, height);
    let tolerance = tau * tau;

    let mut within = 0usize;
    let mut total = 0usize;
    for index in 0..reference_edges.len() {
        if prediction_edges[index] {
            total += 1;
            within += usize::from(to_reference[index] <= tolerance);
        }
        if reference_edges[index] {
            total += 1;
            within += usize::from(to_prediction[index] <= tolerance);
        }
    }

    within as f64 / total as f64
}

/// Surface dice with the empty-channel policy applied
///
/// Both regions empty scores exactly 1 (agreement on absence); exactly one
/// empty scores exactly 0.
pub fn normalized_surface_distance(
    reference: &[bool],
    prediction: &[bool],
    width: usize,
    height: usize,
    tau: f64,
) -> f64 {
    let reference_empty = !reference.iter().any(|&set| set);
    let prediction_empty = !prediction.iter().any(|&set| set);

    match (reference_empty, prediction_empty) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.0,
        (false, false) => nan_to_zero(surface_dice(reference, prediction, width, height, tau)),
    }
}

/// Per-class NSD of two masks, background channel excluded
pub fn mask_nsd(reference: &OneHotMask, prediction: &OneHotMask, tau: f64) -> Result<Vec<f64>> {
    if !tau.is_finite() || tau < 0.0 {
        return Err(MetricError::InvalidTolerance(tau));
    }
    reference.check_compatible(prediction)?;

    let width = reference.width() as usize;
    let height = reference.height() as usize;
    Ok((1..reference.n_channels())
        .map(|class| {
            normalized_surface_distance(
                reference.channel(class),
                prediction.channel(class),
                width,
                height,
                tau,
            )
        })
        .collect())
}
