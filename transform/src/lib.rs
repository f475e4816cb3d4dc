pub mod archive;
pub mod convert;
pub mod decode;
pub mod raster;
pub mod transform;
