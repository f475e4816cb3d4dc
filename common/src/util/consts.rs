pub const NAME: &str = "heicconvert";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
