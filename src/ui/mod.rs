pub mod config_surface;
pub mod selector;

pub use config_surface::{ConfigSurface, EditTarget};
pub use selector::{DropdownState, SelectorSurface};
