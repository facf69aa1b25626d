pub mod harness;
pub mod resolver;
