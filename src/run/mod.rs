pub mod collab;
pub mod report;
pub mod runner;
