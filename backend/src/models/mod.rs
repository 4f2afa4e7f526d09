pub mod item;
pub mod period;
pub mod time;

pub use item::*;
pub use period::*;
pub use time::*;
