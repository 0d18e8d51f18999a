//! Toolfetch - versioned installers for prebuilt build-tree externals
//!
//! Keeps the IREE host compiler snapshot and the Renode simulator in sync
//! with their release feeds: resolve the target release, compare it with
//! the recorded version marker, and download/extract only when stale.

pub mod archive;
pub mod errors;
pub mod fetch;
pub mod github;
pub mod installer;
pub mod iree;
pub mod listing;
pub mod logging;
pub mod marker;
pub mod mlmodel;
pub mod paths;
pub mod renode;
pub mod resolver;
