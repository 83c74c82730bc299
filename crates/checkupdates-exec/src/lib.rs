//! checkupdates-exec: Local process execution
//!
//! Spawns external commands, streams their stdout/stderr into buffers as data
//! arrives and enforces a wall-clock timeout.

pub mod error;
pub mod local;
pub mod result;
pub mod traits;

pub use error::ExecError;
pub use local::LocalRunner;
pub use result::CommandResult;
pub use traits::CommandRunner;
