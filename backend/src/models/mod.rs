pub mod aggregate;
pub mod event;
pub mod schedule;
pub mod time;

pub use aggregate::*;
pub use event::*;
pub use schedule::*;
pub use time::*;
