pub mod color_map;
pub mod error;
pub mod geo_map;
