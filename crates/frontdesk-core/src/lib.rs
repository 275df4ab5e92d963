mod clock;
pub mod error;
mod ids;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::*;
pub use ids::*;
pub use types::*;
