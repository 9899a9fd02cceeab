// Class names, attribute names and key names shared by the modal pieces.
// These are the single source of truth; stylesheets and tests key off them.

// Portal / stage classes
pub const CSS_PORTAL: &str = "ReactModalPortal";
pub const CSS_OVERLAY: &str = "ReactModal__Overlay";
pub const CSS_CONTENT: &str = "ReactModal__Content";
pub const CSS_BODY_OPEN: &str = "ReactModal__Body--open";
pub const STAGE_AFTER_OPEN: &str = "--after-open";
pub const STAGE_BEFORE_CLOSE: &str = "--before-close";

// Attributes
pub const ATTR_ARIA_HIDDEN: &str = "aria-hidden";
pub const ATTR_ARIA_LABEL: &str = "aria-label";
pub const ATTR_AUTOFOCUS: &str = "autofocus";
pub const ATTR_CLASS: &str = "class";
pub const ATTR_DISABLED: &str = "disabled";
pub const ATTR_HIDDEN: &str = "hidden";
pub const ATTR_HREF: &str = "href";
pub const ATTR_ROLE: &str = "role";
pub const ATTR_TABINDEX: &str = "tabindex";

pub const DEFAULT_ROLE: &str = "dialog";
pub const TABINDEX_PROGRAMMATIC: &str = "-1";

// Behaviour defaults
pub const DEFAULT_ARIA_HIDE_APP: bool = true;
pub const DEFAULT_CLOSE_TIMEOUT_MS: u32 = 0;
pub const DEFAULT_SHOULD_CLOSE_ON_OVERLAY_CLICK: bool = true;

// Values of `KeyboardEvent.key` the modal reacts to
pub const KEY_TAB: &str = "Tab";
pub const KEY_ESCAPE: &str = "Escape";
// Legacy spelling still reported by some engines
pub const KEY_ESCAPE_LEGACY: &str = "Esc";
