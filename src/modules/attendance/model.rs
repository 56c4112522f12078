pub use edutrack_models::attendance::*;
