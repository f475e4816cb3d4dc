mod posts;
pub use posts::*;

pub mod tempfiles;
