//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// Success - values written, or nothing to do
pub const SUCCESS: u8 = 0;

/// General error - unspecified failure
pub const ERROR: u8 = 1;

/// IO error - manifest not found, permission denied, etc.
pub const IO_ERROR: u8 = 5;

/// Parse error - manifest is not valid YAML or not a mapping
pub const PARSE_ERROR: u8 = 6;

/// Write error - values file could not be written
pub const WRITE_ERROR: u8 = 7;
