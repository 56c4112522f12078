pub use edutrack_models::levels::*;
