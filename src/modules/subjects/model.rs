pub use edutrack_models::subjects::*;
