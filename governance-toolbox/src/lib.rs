pub mod delegates;
pub mod utils;
pub mod voting;
