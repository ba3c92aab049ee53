pub mod assignment;
pub mod earnings;
pub mod feed;
pub mod queue;
pub mod scoring;
