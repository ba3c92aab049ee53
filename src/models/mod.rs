pub mod assignment;
pub mod buddy;
pub mod order;
pub mod patient;
