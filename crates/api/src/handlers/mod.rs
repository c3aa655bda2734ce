pub mod analysis;
pub mod processor;
pub mod stats;
pub mod video;
