pub mod modal;
pub mod portal;

pub use modal::{EventOutcome, KeyPress, Modal};
pub use portal::{Appearance, PortalController, PortalState};
