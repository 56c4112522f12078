pub mod attendance;
pub mod auth;
pub mod classrooms;
pub mod grades;
pub mod health;
pub mod levels;
pub mod notifications;
pub mod parents;
pub mod payments;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod users;
