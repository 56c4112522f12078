pub mod query;
pub mod references;
