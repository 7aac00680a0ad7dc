pub mod args;
pub mod op;
pub mod ops;

pub use ops::{Admin, Books, Daemon, Health, Init, Version};
