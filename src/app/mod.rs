//! Application state and core logic

pub mod countdown;
pub mod screen;
pub mod state;

pub use screen::{AppCoordinator, Screen, SetupForm};
pub use state::{GameState, RoundContent, RoundState, Submission};
