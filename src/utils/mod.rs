pub mod cancellation;
pub mod constants;
pub mod logging;
pub mod progress;

pub use cancellation::CancellationToken;
pub use constants::*;
pub use logging::init_logging;
pub use progress::ProgressReporter;
