pub mod color;
pub mod disposition;
pub mod file_size;
