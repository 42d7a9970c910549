pub mod relay;
pub mod tables;
