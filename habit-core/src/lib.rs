pub mod api;
mod controller;
mod error;
pub mod session;
pub mod stats;
pub mod storage;
pub mod time_utils;
mod types;
mod view_state;

pub use controller::*;
pub use error::*;
pub use types::*;
pub use view_state::*;
