// Library surface for headless/integration tests and reuse.
// Terminal rendering lives in the binary (main.rs + ui).
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod format;
pub mod input;
pub mod runtime;
pub mod scramble;
pub mod session;
pub mod solve;
pub mod stats;
pub mod storage;
pub mod store;
pub mod timer;
pub mod tips;

pub use error::{CtResult, CubeTimeError};
pub use session::{Confirm, SessionController, SessionOptions};
pub use solve::{Solve, SolveId};
pub use timer::{Timer, TimerState};
