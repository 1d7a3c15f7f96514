pub mod args;
pub mod op;
pub mod ops;

pub use ops::{Counts, Create, Delete, Get, Init, Links, List, Show, TimeSync, Update};
