pub mod analysis;
pub mod results;
