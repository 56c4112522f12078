pub use edutrack_models::payments::*;
