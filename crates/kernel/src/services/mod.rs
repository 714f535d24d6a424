//! Kernel services.

pub mod slug;
