//! Feature modules: the site behaviors that live alongside the router
//! and reinitialize after every page swap.

pub mod changelog;
pub mod header;
pub mod particles;
pub mod stats;
pub mod typewriter;
