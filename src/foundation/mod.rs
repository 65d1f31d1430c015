/// Best-effort cleanup helpers and the temp-file guard.
pub mod cleanup;
/// Shared value types.
pub mod core;
/// Error taxonomy.
pub mod error;
