pub use edutrack_models::grades::*;
