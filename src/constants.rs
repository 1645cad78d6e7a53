//! Global constants used throughout the resolver.
//!
//! This module contains the file extension, synthetic block naming scheme and
//! reserved property keys that are shared between the import merge and the
//! extension applier. Defining them centrally keeps the marker format in one
//! place.

/// File extension every canonical source path ends with.
pub const PRS_EXTENSION: &str = ".prs";

/// Prefix of the synthetic blocks injected for aliased imports.
///
/// A marker block is named `__import__{alias}` and each imported block is
/// duplicated as `__import__{alias}.{block}`. Blocks carrying this prefix are
/// stripped before a resolved program leaves the engine.
pub const IMPORT_MARKER_PREFIX: &str = "__import__";

/// Marker property holding the canonical path of the imported file.
pub const MARKER_SOURCE_KEY: &str = "__source";

/// Marker property listing the names of the imported blocks.
pub const MARKER_BLOCKS_KEY: &str = "__blocks";

/// Property used when mixed content (text plus properties) has to be stored as
/// a nested value, e.g. when an extension lands a mixed patch deep inside an
/// object.
pub const MIXED_TEXT_KEY: &str = "content";

/// Separator for `@extend` target paths.
pub const EXTEND_PATH_SEPARATOR: char = '.';

/// Name of the marker block for `alias`.
pub fn import_marker_name(alias: &str) -> String {
    format!("{IMPORT_MARKER_PREFIX}{alias}")
}

/// Name of the namespaced copy of `block` imported under `alias`.
pub fn namespaced_block_name(alias: &str, block: &str) -> String {
    format!("{IMPORT_MARKER_PREFIX}{alias}{EXTEND_PATH_SEPARATOR}{block}")
}

/// Returns true for marker and namespaced import blocks.
pub fn is_import_marker(name: &str) -> bool {
    name.starts_with(IMPORT_MARKER_PREFIX)
}
