pub use edutrack_models::notifications::*;
