//! API request handlers.

pub mod capture;
pub mod health;
pub mod replays;
pub mod settings;
pub mod status;
pub mod streams;

pub use capture::*;
pub use health::*;
pub use replays::*;
pub use settings::*;
pub use status::*;
pub use streams::*;
