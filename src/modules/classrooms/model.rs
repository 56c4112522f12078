pub use edutrack_models::classrooms::*;
