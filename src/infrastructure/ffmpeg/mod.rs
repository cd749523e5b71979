pub mod encoder;
pub mod probe;
pub mod tools;
