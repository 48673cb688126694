pub mod attribution;
pub mod contribution;
pub mod performance;
pub mod risk;
pub mod valuation;

pub use attribution::*;
pub use contribution::*;
pub use performance::*;
pub use risk::*;
pub use valuation::*;
