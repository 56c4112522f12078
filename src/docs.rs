//! OpenAPI document served by Swagger UI and Scalar.

use serde::{Deserialize, Serialize};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use edutrack_core::PaginationMeta;

use crate::modules::auth::model::{LoginRequest, LoginResponse};
use crate::modules::health::HealthResponse;
use crate::modules::users::model::{
    CreateUserDto, PaginatedUsersResponse, UpdateUserDto, User, UserDetail, UserRole,
};
use crate::modules::parents::model::{
    CreateParentDto, PaginatedParentsResponse, Parent, ParentDetail, UpdateParentDto,
};
use crate::modules::teachers::model::{
    CreateTeacherDto, PaginatedTeachersResponse, Teacher, TeacherDetail, UpdateTeacherDto,
};
use crate::modules::levels::model::{
    CreateLevelDto, Level, LevelDetail, PaginatedLevelsResponse, UpdateLevelDto,
};
use crate::modules::classrooms::model::{
    Classroom, ClassroomDetail, CreateClassroomDto, PaginatedClassroomsResponse, UpdateClassroomDto,
};
use crate::modules::students::model::{
    CreateStudentDto, EnrollmentStatus, Gender, PaginatedStudentsResponse, Student, StudentDetail,
    UpdateStudentDto,
};
use crate::modules::subjects::model::{
    CreateSubjectDto, PaginatedSubjectsResponse, Subject, UpdateSubjectDto,
};
use crate::modules::grades::model::{
    CreateGradeDto, Grade, GradeDetail, PaginatedGradesResponse, Term, UpdateGradeDto,
};
use crate::modules::payments::model::{
    CreatePaymentDto, PaginatedPaymentsResponse, Payment, PaymentDetail, PaymentMethod,
    PaymentStatus, PaymentType, UpdatePaymentDto,
};
use crate::modules::attendance::model::{
    Attendance, AttendanceStatus, CreateAttendanceDto, PaginatedAttendanceResponse,
    UpdateAttendanceDto,
};
use crate::modules::notifications::model::{
    CreateNotificationDto, Notification, NotificationType, PaginatedNotificationsResponse,
    UpdateNotificationDto,
};

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::health_check,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::get_current_user,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user_by_id,
        crate::modules::users::controller::get_user_details,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::parents::controller::create_parent,
        crate::modules::parents::controller::get_parents,
        crate::modules::parents::controller::get_parent_by_id,
        crate::modules::parents::controller::get_parent_details,
        crate::modules::parents::controller::update_parent,
        crate::modules::parents::controller::delete_parent,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::get_teacher_by_id,
        crate::modules::teachers::controller::get_teacher_details,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::teachers::controller::delete_teacher,
        crate::modules::levels::controller::create_level,
        crate::modules::levels::controller::get_levels,
        crate::modules::levels::controller::get_level_by_id,
        crate::modules::levels::controller::get_level_details,
        crate::modules::levels::controller::update_level,
        crate::modules::levels::controller::delete_level,
        crate::modules::classrooms::controller::create_classroom,
        crate::modules::classrooms::controller::get_classrooms,
        crate::modules::classrooms::controller::get_classroom_by_id,
        crate::modules::classrooms::controller::get_classroom_details,
        crate::modules::classrooms::controller::update_classroom,
        crate::modules::classrooms::controller::delete_classroom,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student_by_id,
        crate::modules::students::controller::get_student_details,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::subjects::controller::create_subject,
        crate::modules::subjects::controller::get_subjects,
        crate::modules::subjects::controller::get_subject_by_id,
        crate::modules::subjects::controller::update_subject,
        crate::modules::subjects::controller::delete_subject,
        crate::modules::grades::controller::create_grade,
        crate::modules::grades::controller::get_grades,
        crate::modules::grades::controller::get_grade_by_id,
        crate::modules::grades::controller::get_grade_details,
        crate::modules::grades::controller::update_grade,
        crate::modules::grades::controller::delete_grade,
        crate::modules::payments::controller::create_payment,
        crate::modules::payments::controller::get_payments,
        crate::modules::payments::controller::get_payment_by_id,
        crate::modules::payments::controller::get_payment_details,
        crate::modules::payments::controller::update_payment,
        crate::modules::payments::controller::delete_payment,
        crate::modules::attendance::controller::create_attendance,
        crate::modules::attendance::controller::get_attendance,
        crate::modules::attendance::controller::get_attendance_by_id,
        crate::modules::attendance::controller::update_attendance,
        crate::modules::attendance::controller::delete_attendance,
        crate::modules::notifications::controller::create_notification,
        crate::modules::notifications::controller::get_notifications,
        crate::modules::notifications::controller::get_notification_by_id,
        crate::modules::notifications::controller::update_notification,
        crate::modules::notifications::controller::delete_notification,
        crate::modules::notifications::controller::mark_notification_read,
    ),
    components(
        schemas(
            ErrorResponse,
            PaginationMeta,
            HealthResponse,
            LoginRequest,
            LoginResponse,
            User,
            CreateUserDto,
            UpdateUserDto,
            PaginatedUsersResponse,
            UserRole,
            UserDetail,
            Parent,
            CreateParentDto,
            UpdateParentDto,
            PaginatedParentsResponse,
            ParentDetail,
            Teacher,
            CreateTeacherDto,
            UpdateTeacherDto,
            PaginatedTeachersResponse,
            TeacherDetail,
            Level,
            CreateLevelDto,
            UpdateLevelDto,
            PaginatedLevelsResponse,
            LevelDetail,
            Classroom,
            CreateClassroomDto,
            UpdateClassroomDto,
            PaginatedClassroomsResponse,
            ClassroomDetail,
            Student,
            CreateStudentDto,
            UpdateStudentDto,
            PaginatedStudentsResponse,
            Gender,
            EnrollmentStatus,
            StudentDetail,
            Subject,
            CreateSubjectDto,
            UpdateSubjectDto,
            PaginatedSubjectsResponse,
            Grade,
            CreateGradeDto,
            UpdateGradeDto,
            PaginatedGradesResponse,
            Term,
            GradeDetail,
            Payment,
            CreatePaymentDto,
            UpdatePaymentDto,
            PaginatedPaymentsResponse,
            PaymentType,
            PaymentMethod,
            PaymentStatus,
            PaymentDetail,
            Attendance,
            CreateAttendanceDto,
            UpdateAttendanceDto,
            PaginatedAttendanceResponse,
            AttendanceStatus,
            Notification,
            CreateNotificationDto,
            UpdateNotificationDto,
            PaginatedNotificationsResponse,
            NotificationType,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service status"),
        (name = "Authentication", description = "Login and current user"),
        (name = "Users", description = "Login accounts"),
        (name = "Parents", description = "Parent records"),
        (name = "Teachers", description = "Teacher records"),
        (name = "Levels", description = "Academic levels"),
        (name = "Classrooms", description = "Classrooms within a level"),
        (name = "Students", description = "Student enrollment"),
        (name = "Subjects", description = "Taught subjects"),
        (name = "Grades", description = "Scores per student, subject and term"),
        (name = "Payments", description = "Tuition payments"),
        (name = "Attendance", description = "Daily attendance"),
        (name = "Notifications", description = "Messages to users")
    ),
    info(
        title = "Edutrack API",
        version = "0.1.0",
        description = "School administration REST API built with Rust, Axum and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/auth/login",
            "/auth/me",
            "/users/{id}/details",
            "/classrooms/{id}",
            "/students",
            "/payments",
            "/attendance/{id}",
            "/notifications/{id}/read",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing path {}", path);
        }
    }

    #[test]
    fn test_openapi_has_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(components.schemas.contains_key("ErrorResponse"));
    }
}
