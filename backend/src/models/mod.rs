pub mod time;
pub mod weather;

pub use time::*;
pub use weather::*;
