pub mod fs;
pub mod index;
