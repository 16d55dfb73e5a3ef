pub mod annotation;
pub mod diff;
pub mod error;
pub mod id;
pub mod provider;
pub mod snapshot;
pub mod store;
pub mod timeline;
