//! Profilometer document and column name constants.

/// Element holding one measurement point.
pub const C_ELEMENT_DATA: &str = "Data";
/// Child element holding the X coordinate text.
pub const C_ELEMENT_X: &str = "X";
/// Child element holding the Z coordinate text.
pub const C_ELEMENT_Z: &str = "Z";

/// X column name in the tabular representation.
pub const C_COLUMN_X: &str = "X";
/// Z column name in the tabular representation.
pub const C_COLUMN_Z: &str = "Z";
