pub mod assessment;
pub mod enums;
pub mod recommendation;
pub mod vital_sign;

pub use assessment::*;
pub use recommendation::*;
pub use vital_sign::*;
