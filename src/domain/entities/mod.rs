//! Stored entities. Flags that Delius keeps as 0/1 columns are booleans here.

pub mod contact;
pub mod event;
pub mod notification;
pub mod offender;
pub mod reference;
pub mod staff;

pub use contact::*;
pub use event::*;
pub use notification::*;
pub use offender::*;
pub use reference::*;
pub use staff::*;
