//! Pure axis-inversion helpers.

use crate::spec::{SpecProfilePoint, SpecProfileSeries, SpecSeriesCollection};

/// Return a series with the X and Z roles swapped when `if_invert` is set.
///
/// Name, point count, and point order are preserved; applying the transform
/// twice restores the original values. `if_invert == false` is the identity.
pub fn derive_inverted_series(series: &SpecProfileSeries, if_invert: bool) -> SpecProfileSeries {
    if !if_invert {
        return series.clone();
    }

    SpecProfileSeries {
        name: series.name.clone(),
        points: series
            .points
            .iter()
            .map(|pt| SpecProfilePoint { x: pt.z, z: pt.x })
            .collect(),
    }
}

/// Apply one inversion flag to every series in a collection.
///
/// Each series' orientation depends only on the flag passed here; callers
/// mixing this with per-series flags compose the two by inverting the chosen
/// series again via [`derive_inverted_series`].
pub fn derive_inverted_collection(
    collection: &SpecSeriesCollection,
    if_invert: bool,
) -> SpecSeriesCollection {
    SpecSeriesCollection::from_series(
        collection
            .iter()
            .map(|series| derive_inverted_series(series, if_invert)),
    )
}
