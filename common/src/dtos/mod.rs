mod root;
pub use root::*;

mod posts;
pub use posts::*;
