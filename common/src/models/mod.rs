mod conversion;
pub use conversion::*;

mod posts;
pub use posts::*;
