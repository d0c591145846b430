//! Runtime module — process lifecycle: boot, then stitch one log file.

pub mod boot;
pub mod run;
