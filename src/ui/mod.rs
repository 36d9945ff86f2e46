pub mod toolbar;

pub use toolbar::*;
