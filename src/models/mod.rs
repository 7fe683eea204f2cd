pub mod checklist;
pub mod decision;
pub mod letter;
pub mod patient;
pub mod rule;

pub use checklist::*;
pub use decision::*;
pub use letter::*;
pub use patient::*;
pub use rule::*;
