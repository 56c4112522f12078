pub use edutrack_models::parents::*;
