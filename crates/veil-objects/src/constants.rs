/// Maximum number of application-defined field elements a note can carry.
pub const MAX_NOTE_FIELDS: usize = 16;

/// Maximum depth of the nested-call tree within a single transaction simulation.
pub const MAX_CALL_DEPTH: usize = 64;
