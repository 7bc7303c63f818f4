//! CLI command implementations
//!
//! Commands return `anyhow::Result<i32>` where the integer is the process
//! exit code:
//!
//! | code | meaning                                           |
//! |------|---------------------------------------------------|
//! | 0    | success                                           |
//! | 2    | configuration error                               |
//! | 3    | precondition failure (input file or seed data)    |
//! | 4    | connection failure                                |
//! | 5    | fatal import failure (transaction rolled back)    |

pub mod check_seed;
pub mod import;
pub mod init;
pub mod validate;

use crate::domain::ImportError;

/// Exit code for a failed run
pub fn exit_code_for(error: &ImportError) -> i32 {
    match error {
        ImportError::Configuration(_) => 2,
        e if e.is_precondition() => 3,
        ImportError::Connection(_) => 4,
        _ => 5,
    }
}

/// Print an error the way operators expect to read it
///
/// Database errors get the engine's detail and hint on their own lines.
pub fn print_error(error: &ImportError) {
    match error.database_detail() {
        Some(db) => {
            eprintln!("❌ PostgreSQL error: {}", db.message);
            if let Some(detail) = &db.detail {
                eprintln!("   Detail: {detail}");
            }
            if let Some(hint) = &db.hint {
                eprintln!("   Hint: {hint}");
            }
            if let Some(code) = &db.code {
                eprintln!("   SQLSTATE: {code}");
            }
        }
        None => eprintln!("❌ {error}"),
    }
}
