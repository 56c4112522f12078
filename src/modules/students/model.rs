pub use edutrack_models::students::*;
