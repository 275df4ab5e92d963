pub mod admission;
pub mod identifiers;
mod identity;
pub mod onboard;
mod roster;
mod sequence;

pub use identity::{IdentityResolver, ProfileAttributes, ResolvedIdentity};
pub use roster::{AddBedInput, RosterOperation};
pub use sequence::SequenceAllocator;
