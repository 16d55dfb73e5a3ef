pub mod dedup;
pub mod recorder;
pub mod timeline;
