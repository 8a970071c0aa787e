mod blocking;
mod facade;
mod local;
mod shared;
mod task;

pub use blocking::BlockingStraw;
pub use facade::Straw;
pub use local::LocalStraw;
pub use shared::SharedStraw;
pub use task::{AsyncStraw, StrawTask, straw};
