pub use edutrack_models::teachers::*;
