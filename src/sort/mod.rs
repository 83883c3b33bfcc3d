pub mod compare;
pub mod core;
pub mod distribute;
pub mod key;
pub mod merge;
pub mod queue;


pub use self::compare::*;
pub use self::core::*;
pub use self::distribute::*;
pub use self::key::*;
pub use self::merge::*;
pub use self::queue::*;
