//! Merging of caller options with the options derived from the reader config.

use indexmap::IndexMap;

/// Option key carrying the file format.
pub const FORMAT_OPTION: &str = "cloudFiles.format";

/// Option key carrying the schema location.
pub const SCHEMA_LOCATION_OPTION: &str = "cloudFiles.schemaLocation";

/// Flat string options passed to the streaming engine, in insertion order.
pub type ReaderOptions = IndexMap<String, String>;

/// Combine caller options with the mandatory derived options.
///
/// Returns a new map; `options` is left untouched. Caller entries keep their
/// order, then [`FORMAT_OPTION`] and [`SCHEMA_LOCATION_OPTION`] are set to
/// `format` and `schema_location`. Caller values under those two keys are
/// discarded.
pub fn merge_options(options: &ReaderOptions, format: &str, schema_location: &str) -> ReaderOptions {
    let mut merged = options.clone();
    // Remove first so the derived keys always land at the end.
    merged.shift_remove(FORMAT_OPTION);
    merged.shift_remove(SCHEMA_LOCATION_OPTION);
    merged.insert(FORMAT_OPTION.to_string(), format.to_string());
    merged.insert(SCHEMA_LOCATION_OPTION.to_string(), schema_location.to_string());
    merged
}
