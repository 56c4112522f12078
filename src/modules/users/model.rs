pub use edutrack_models::users::*;
