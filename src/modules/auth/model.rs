pub use edutrack_models::auth::*;
