pub mod entities;
pub mod error;
pub mod headers;
pub mod value_objects;
