pub mod camera;
pub mod display_list;
pub mod engine;
pub mod layer;
pub mod manager;
pub mod overlay;
pub mod pick;
pub mod plugin;
pub mod pointcloud;
pub mod raster;
pub mod symbology;
pub mod vector;

pub use camera::*;
pub use display_list::*;
pub use engine::*;
pub use layer::*;
pub use manager::*;
pub use overlay::*;
pub use pick::*;
pub use plugin::*;
