pub mod building;
pub mod worker;

pub use building::*;
pub use worker::*;
