pub mod map;
pub mod value;
