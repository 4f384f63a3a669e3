pub mod geom;
pub mod macros;
pub mod proto;
