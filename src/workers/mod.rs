pub mod batch;
pub mod progress;
pub mod scanner;
pub mod transcoder;
