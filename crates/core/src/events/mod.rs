pub mod bus;
pub mod completion;

pub use bus::*;
pub use completion::*;
