// Commonizer Metadata Library
// Declaration trees of library targets, as consumed by the commonizer

pub mod declarations;
pub mod error;
pub mod ids;
pub mod provider;
pub mod types;

pub use declarations::*;
pub use error::*;
pub use ids::*;
pub use provider::*;
pub use types::*;
