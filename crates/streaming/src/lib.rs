pub mod request;
pub mod source;
pub mod tile;
pub mod urls;

pub use request::*;
pub use source::*;
pub use tile::*;
pub use urls::*;
