//! Deterministic overlay identities.
//!
//! Overlay ids have the shape `{kind}-layer-{dataset_id}[-{suffix}]`. The same
//! inputs always produce the same id, which is what lets a rendering engine
//! diff overlay lists across updates.

/// Separator between the overlay kind and the owning dataset id.
pub const LAYER_INFIX: &str = "-layer-";

pub fn make_id(kind: &str, dataset_id: &str, suffix: Option<&str>) -> String {
    match suffix {
        Some(suffix) => format!("{kind}{LAYER_INFIX}{dataset_id}-{suffix}"),
        None => format!("{kind}{LAYER_INFIX}{dataset_id}"),
    }
}

/// Returns true iff `overlay_id` was produced by [`make_id`] for `dataset_id`.
///
/// The dataset id must be followed by end-of-string or `-`, so `ds1` does not
/// claim overlays of `ds10`. Kinds may themselves contain dashes
/// (`point-cloud`, `netcdf-2d`), so every occurrence of the infix is tried.
pub fn owned_by(overlay_id: &str, dataset_id: &str) -> bool {
    if dataset_id.is_empty() {
        return false;
    }
    overlay_id.match_indices(LAYER_INFIX).any(|(at, _)| {
        if at == 0 {
            return false;
        }
        let rest = &overlay_id[at + LAYER_INFIX.len()..];
        match rest.strip_prefix(dataset_id) {
            Some(tail) => tail.is_empty() || tail.starts_with('-'),
            None => false,
        }
    })
}
