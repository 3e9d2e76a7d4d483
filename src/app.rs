//! Application module: the view model used by the TUI and runtime.
//!
//! `App` lives in `app::model` and holds the catalog, the cart and the
//! navigation state between views.

mod model;

pub use model::*;
