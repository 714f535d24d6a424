//! Layouts and page composition.
//!
//! Provides Tera-based layout wrappers and the composer that places rendered
//! blocks inside them.

mod composer;
mod layout;

pub use composer::{ComposedView, PageComposer};
pub use layout::{ChromeSettings, Layout, LayoutEngine, NavLink, PageFrame};
