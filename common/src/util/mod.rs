pub mod consts;
pub mod mime;
pub mod random;
