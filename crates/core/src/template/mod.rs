pub mod registry;
pub mod resolve;
