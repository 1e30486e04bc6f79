pub mod fuzzy;
pub mod parameters;
pub mod series;
pub mod solution;
pub mod types;
pub mod weights;

pub use fuzzy::*;
pub use parameters::*;
pub use series::*;
pub use solution::*;
pub use types::*;
pub use weights::*;
