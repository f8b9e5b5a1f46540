//! Process exit codes. Part of the CLI contract.

pub const SUCCESS: i32 = 0;
pub const CASE_FAILED: i32 = 1; // At least one corpus case failed
pub const CONFIG_ERROR: i32 = 2; // Bad arguments, filter or unreadable corpus
