pub mod fill;
pub mod grid;
pub mod prep;
pub mod scoring;
pub mod solver;
pub mod types;
