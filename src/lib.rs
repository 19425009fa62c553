pub mod catalog;
pub mod cli;
pub mod commands;
pub mod consensus;
pub mod genbank;
pub mod homology;
pub mod locator;
pub mod model;
pub mod pipeline;
pub mod promoter;
pub mod upstream;
mod utils;
