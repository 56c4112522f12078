//! Fake data for local development.
//!
//! Generates levels with their classrooms, teachers leading those classrooms,
//! parents with one or more children, and a subject catalogue. Everything is
//! inserted in one transaction with multi-row `INSERT`s.

use std::time::Instant;

use anyhow::{Context, bail};
use chrono::{Duration, NaiveDate, Utc};
use fake::Fake;
use fake::faker::address::en::{CityName, StreetName};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use rand::Rng;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use edutrack_models::classrooms::MAX_CAPACITY;
use edutrack_models::students::Gender;

const SUBJECTS: &[(&str, &str)] = &[
    ("Mathematics", "MATH"),
    ("French", "FR"),
    ("English", "EN"),
    ("Science", "SCI"),
    ("History", "HIST"),
    ("Geography", "GEO"),
    ("Physical Education", "PE"),
    ("Art", "ART"),
];

const SPECIALTIES: &[&str] = &["Mathematics", "Languages", "Sciences", "Humanities", "Arts"];

/// Sizes of the generated school.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub levels: usize,
    pub classrooms_per_level: usize,
    pub students_per_classroom: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            levels: 6,
            classrooms_per_level: 2,
            students_per_classroom: 20,
        }
    }
}

/// Row counts written by [`seed_database`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub levels: usize,
    pub classrooms: usize,
    pub teachers: usize,
    pub parents: usize,
    pub students: usize,
    pub subjects: usize,
}

struct PersonSeed {
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
}

struct StudentSeed {
    first_name: String,
    birth_date: NaiveDate,
    gender: Gender,
    /// Index into the generated parents
    parent: usize,
}

fn fake_person(index: usize) -> PersonSeed {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();
    let email: String = SafeEmail().fake();
    PersonSeed {
        email: format!("{}.{}", index, email),
        phone: PhoneNumber().fake(),
        first_name,
        last_name,
    }
}

/// Students of one classroom, spread over parents owning one to three
/// children each. The parents vector grows as needed.
fn generate_classroom_students(
    count: usize,
    level_index: usize,
    parents: &mut Vec<PersonSeed>,
) -> Vec<StudentSeed> {
    let mut rng = rand::thread_rng();
    let today = Utc::now().date_naive();
    let base_age_years = 6 + level_index as i64;

    let mut students = Vec::with_capacity(count);
    while students.len() < count {
        parents.push(fake_person(parents.len()));
        let parent = parents.len() - 1;
        let siblings = rng.gen_range(1..=3).min(count - students.len());

        for _ in 0..siblings {
            let days_old = base_age_years * 365 + rng.gen_range(0..365);
            let gender = if rng.gen_bool(0.5) {
                Gender::Male
            } else {
                Gender::Female
            };
            students.push(StudentSeed {
                first_name: FirstName().fake(),
                birth_date: today - Duration::days(days_old),
                gender,
                parent,
            });
        }
    }
    students
}

async fn insert_ids(
    conn: &mut PgConnection,
    mut builder: QueryBuilder<'_, Postgres>,
) -> anyhow::Result<Vec<i64>> {
    builder.push(" RETURNING id");
    let ids = builder
        .build_query_scalar::<i64>()
        .fetch_all(&mut *conn)
        .await?;
    Ok(ids)
}

/// Seeds an empty school. Refuses when levels already exist; run
/// [`clear_seeded_data`] first.
pub async fn seed_database(db: &PgPool, config: &SeedConfig) -> anyhow::Result<SeedSummary> {
    let start = Instant::now();

    if config.students_per_classroom > MAX_CAPACITY as usize {
        bail!(
            "students per classroom cannot exceed the maximum capacity of {}",
            MAX_CAPACITY
        );
    }

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM levels")
        .fetch_one(db)
        .await?;
    if existing > 0 {
        bail!("database already has {} levels; run clear-seed first", existing);
    }

    let classroom_count = config.levels * config.classrooms_per_level;
    let teachers: Vec<PersonSeed> = (0..classroom_count).map(fake_person).collect();
    let mut parents = Vec::new();
    let classroom_students: Vec<Vec<StudentSeed>> = (0..classroom_count)
        .map(|i| {
            generate_classroom_students(
                config.students_per_classroom,
                i / config.classrooms_per_level.max(1),
                &mut parents,
            )
        })
        .collect();
    println!("Generated fake data in {:?}", start.elapsed());

    let mut tx = db.begin().await?;

    let mut builder = QueryBuilder::new("INSERT INTO levels (name, description) ");
    builder.push_values(0..config.levels, |mut row, i| {
        row.push_bind(format!("Grade {}", i + 1))
            .push_bind(format!("Year {} of primary and secondary school", i + 1));
    });
    let level_ids = if config.levels > 0 {
        insert_ids(&mut tx, builder).await?
    } else {
        Vec::new()
    };

    let mut teacher_ids = Vec::new();
    if !teachers.is_empty() {
        let mut builder = QueryBuilder::new(
            "INSERT INTO teachers (first_name, last_name, email, phone, specialty, hire_date) ",
        );
        let today = Utc::now().date_naive();
        builder.push_values(teachers.iter().enumerate(), |mut row, (i, teacher)| {
            row.push_bind(&teacher.first_name)
                .push_bind(&teacher.last_name)
                .push_bind(&teacher.email)
                .push_bind(&teacher.phone)
                .push_bind(SPECIALTIES[i % SPECIALTIES.len()])
                .push_bind(today - Duration::days(365 * (1 + i as i64 % 10)));
        });
        teacher_ids = insert_ids(&mut tx, builder).await?;
    }

    let mut classroom_ids = Vec::new();
    if classroom_count > 0 {
        let capacity = (config.students_per_classroom as i32 + 5).min(MAX_CAPACITY);
        let mut builder = QueryBuilder::new(
            "INSERT INTO classrooms (name, capacity, schedule, level_id, teacher_id) ",
        );
        builder.push_values(0..classroom_count, |mut row, i| {
            let level = i / config.classrooms_per_level;
            let section = (b'A' + (i % config.classrooms_per_level) as u8 % 26) as char;
            row.push_bind(format!("{}{}", level + 1, section))
                .push_bind(capacity)
                .push_bind("Mon-Fri 08:00-15:00")
                .push_bind(level_ids[level])
                .push_bind(teacher_ids[i]);
        });
        classroom_ids = insert_ids(&mut tx, builder).await?;
    }

    let mut parent_ids = Vec::new();
    if !parents.is_empty() {
        let mut builder = QueryBuilder::new(
            "INSERT INTO parents (first_name, last_name, email, phone, address) ",
        );
        builder.push_values(parents.iter(), |mut row, parent| {
            let street: String = StreetName().fake();
            let city: String = CityName().fake();
            row.push_bind(&parent.first_name)
                .push_bind(&parent.last_name)
                .push_bind(&parent.email)
                .push_bind(&parent.phone)
                .push_bind(format!("{}, {}", street, city));
        });
        parent_ids = insert_ids(&mut tx, builder).await?;
    }

    let mut student_total = 0;
    for (class_index, students) in classroom_students.iter().enumerate() {
        if students.is_empty() {
            continue;
        }
        let mut builder = QueryBuilder::new(
            "INSERT INTO students (first_name, last_name, birth_date, gender, parent_id, class_id) ",
        );
        builder.push_values(students.iter(), |mut row, student| {
            row.push_bind(&student.first_name)
                .push_bind(&parents[student.parent].last_name)
                .push_bind(student.birth_date)
                .push_bind(student.gender)
                .push_bind(parent_ids[student.parent])
                .push_bind(classroom_ids[class_index]);
        });
        student_total += insert_ids(&mut tx, builder).await?.len();
    }

    let mut builder = QueryBuilder::new("INSERT INTO subjects (name, code) ");
    builder.push_values(SUBJECTS.iter(), |mut row, (name, code)| {
        row.push_bind(*name).push_bind(*code);
    });
    let subject_ids = insert_ids(&mut tx, builder)
        .await
        .context("subjects already exist; run clear-seed first")?;

    tx.commit().await?;
    println!("Inserted seed data in {:?}", start.elapsed());

    Ok(SeedSummary {
        levels: level_ids.len(),
        classrooms: classroom_ids.len(),
        teachers: teacher_ids.len(),
        parents: parent_ids.len(),
        students: student_total,
        subjects: subject_ids.len(),
    })
}

/// Deletes every school record. User accounts are kept.
pub async fn clear_seeded_data(db: &PgPool) -> anyhow::Result<()> {
    let mut tx = db.begin().await?;
    for table in [
        "notifications",
        "attendance",
        "payments",
        "grades",
        "students",
        "classrooms",
        "levels",
        "subjects",
        "parents",
        "teachers",
    ] {
        let result = sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut *tx)
            .await?;
        println!("  cleared {} rows from {}", result.rows_affected(), table);
    }
    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_classroom_students_fills_classroom() {
        let mut parents = Vec::new();
        let students = generate_classroom_students(20, 2, &mut parents);

        assert_eq!(students.len(), 20);
        assert!(!parents.is_empty());
        assert!(parents.len() <= 20);
        assert!(students.iter().all(|s| s.parent < parents.len()));
    }

    #[test]
    fn test_generated_students_are_school_age() {
        let mut parents = Vec::new();
        let today = Utc::now().date_naive();
        for student in generate_classroom_students(10, 0, &mut parents) {
            let age_days = (today - student.birth_date).num_days();
            assert!((6 * 365..7 * 365).contains(&age_days));
        }
    }

    #[test]
    fn test_fake_person_emails_are_unique_per_index() {
        let a = fake_person(1);
        let b = fake_person(2);
        assert_ne!(a.email, b.email);
    }
}
