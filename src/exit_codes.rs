//! Process exit codes of the `marklint` binary

/// No issues found
pub const SUCCESS: i32 = 0;

/// Linting found at least one issue
pub const VIOLATIONS_FOUND: i32 = 1;

/// Invalid configuration, unreadable file or other tool failure
pub const TOOL_ERROR: i32 = 2;

pub mod exit {
    use super::*;

    pub fn success() -> ! {
        std::process::exit(SUCCESS);
    }

    pub fn violations_found() -> ! {
        std::process::exit(VIOLATIONS_FOUND);
    }

    pub fn tool_error() -> ! {
        std::process::exit(TOOL_ERROR);
    }
}
