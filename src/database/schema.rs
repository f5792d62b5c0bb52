// Referential consistency across the curriculum hierarchy is the caller's
// concern: lesson plans keep denormalized subject/strand/sub-strand/indicator
// references, and a dangling reference must stay readable. No FOREIGN KEY
// clauses on purpose.

pub const ROSTER_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS teachers (
    id INTEGER PRIMARY KEY,
    teacher_name TEXT NOT NULL,
    class_name TEXT NOT NULL,
    subjects TEXT NOT NULL DEFAULT '[]',
    access_code TEXT NOT NULL UNIQUE
);

CREATE INDEX IF NOT EXISTS idx_teachers_class_name ON teachers (class_name);

CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    class_name TEXT NOT NULL,
    email TEXT,
    enrollment_date TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_students_class_name ON students (class_name);
"#;

pub const CURRICULUM_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS subjects (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS strands (
    id INTEGER PRIMARY KEY,
    subject_id INTEGER NOT NULL,
    name TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_strands_subject ON strands (subject_id);
CREATE INDEX IF NOT EXISTS idx_strands_name ON strands (name);

CREATE TABLE IF NOT EXISTS sub_strands (
    id INTEGER PRIMARY KEY,
    strand_id INTEGER NOT NULL,
    name TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sub_strands_strand ON sub_strands (strand_id);
CREATE INDEX IF NOT EXISTS idx_sub_strands_name ON sub_strands (name);

CREATE TABLE IF NOT EXISTS indicators (
    id INTEGER PRIMARY KEY,
    sub_strand_id INTEGER NOT NULL,
    code TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT '',
    exemplars TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_indicators_sub_strand ON indicators (sub_strand_id);

CREATE TABLE IF NOT EXISTS lesson_plans (
    id INTEGER PRIMARY KEY,
    week TEXT NOT NULL,
    subject_id INTEGER NOT NULL,
    strand_id INTEGER NOT NULL,
    sub_strand_id INTEGER NOT NULL,
    indicator_id INTEGER NOT NULL,
    notes TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_lesson_plans_week ON lesson_plans (week);
CREATE INDEX IF NOT EXISTS idx_lesson_plans_subject ON lesson_plans (subject_id);
CREATE INDEX IF NOT EXISTS idx_lesson_plans_strand ON lesson_plans (strand_id);
CREATE INDEX IF NOT EXISTS idx_lesson_plans_sub_strand ON lesson_plans (sub_strand_id);
CREATE INDEX IF NOT EXISTS idx_lesson_plans_indicator ON lesson_plans (indicator_id);
"#;
