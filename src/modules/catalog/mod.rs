//! Catalog JSON generation for front ends listing the converted library.

pub mod dto;
pub mod service;
