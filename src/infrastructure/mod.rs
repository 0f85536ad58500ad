pub mod error_logging;
pub mod filesystem;
pub mod logging;

pub use error_logging::{ErrorTally, ErrorType};
pub use filesystem::{FileSystemTrait, LocalFileSystem};
pub use logging::RunLog;
