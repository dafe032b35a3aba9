pub mod geojson;
pub mod tileset;

pub use geojson::*;
pub use tileset::*;
