pub mod logger;
pub mod memory;
pub mod scheduler;
