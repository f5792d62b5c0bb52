#[cfg(test)]
pub mod fixtures {
    use std::collections::HashMap;
    use std::sync::Once;

    use chrono::NaiveDate;

    use crate::curriculum::CurriculumStore;
    use crate::error::StoreError;
    use crate::models::{
        NewIndicator, NewLessonPlan, NewStrand, NewStudent, NewSubStrand, NewSubject, NewTeacher,
    };
    use crate::repository::Repository;
    use crate::roster::RosterStore;

    static INIT: Once = Once::new();

    fn init_logging() {
        INIT.call_once(|| {
            let _ = env_logger::builder().is_test(true).try_init();
        });
    }

    pub fn new_teacher(teacher_name: &str, class_name: &str, access_code: &str) -> NewTeacher {
        NewTeacher {
            teacher_name: teacher_name.to_string(),
            class_name: class_name.to_string(),
            subjects: Vec::new(),
            access_code: access_code.to_string(),
        }
    }

    pub fn new_student(first_name: &str, last_name: &str, class_name: &str) -> NewStudent {
        NewStudent {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            class_name: class_name.to_string(),
            email: None,
            enrollment_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
        }
    }

    #[derive(Default)]
    pub struct RosterFixtureBuilder {
        teachers: Vec<NewTeacher>,
        students: Vec<NewStudent>,
    }

    impl RosterFixtureBuilder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn teacher(mut self, teacher_name: &str, class_name: &str, access_code: &str) -> Self {
            self.teachers
                .push(new_teacher(teacher_name, class_name, access_code));
            self
        }

        pub fn student(mut self, first_name: &str, last_name: &str, class_name: &str) -> Self {
            self.students
                .push(new_student(first_name, last_name, class_name));
            self
        }

        pub async fn build(self) -> Result<RosterFixture, StoreError> {
            init_logging();

            let store = RosterStore::open_in_memory().await?;

            let mut teacher_ids = HashMap::new();
            for teacher in &self.teachers {
                let id = store.teachers().add(teacher).await?;
                teacher_ids.insert(teacher.teacher_name.clone(), id);
            }

            let mut student_ids = HashMap::new();
            for student in &self.students {
                let id = store.students().add(student).await?;
                student_ids.insert(
                    format!("{} {}", student.first_name, student.last_name),
                    id,
                );
            }

            Ok(RosterFixture {
                store,
                teacher_ids,
                student_ids,
            })
        }
    }

    pub struct RosterFixture {
        pub store: RosterStore,
        pub teacher_ids: HashMap<String, i64>,
        pub student_ids: HashMap<String, i64>,
    }

    impl RosterFixture {
        pub fn teacher_id(&self, teacher_name: &str) -> Option<i64> {
            self.teacher_ids.get(teacher_name).copied()
        }

        pub fn student_id(&self, full_name: &str) -> Option<i64> {
            self.student_ids.get(full_name).copied()
        }
    }

    /// One full hierarchy branch, bottomed out at a single indicator.
    #[derive(Debug, Clone, Copy)]
    pub struct Branch {
        pub subject_id: i64,
        pub strand_id: i64,
        pub sub_strand_id: i64,
        pub indicator_id: i64,
    }

    pub struct CurriculumFixture {
        pub store: CurriculumStore,
    }

    impl CurriculumFixture {
        pub async fn new() -> Result<Self, StoreError> {
            init_logging();
            let store = CurriculumStore::open_in_memory().await?;
            Ok(Self { store })
        }

        pub async fn add_branch(
            &self,
            subject: &str,
            strand: &str,
            sub_strand: &str,
            indicator_code: &str,
        ) -> Result<Branch, StoreError> {
            let subject_id = self
                .store
                .subjects()
                .add(&NewSubject {
                    name: subject.to_string(),
                })
                .await?;

            let strand_id = self
                .store
                .strands()
                .add(&NewStrand {
                    subject_id,
                    name: strand.to_string(),
                })
                .await?;

            let sub_strand_id = self
                .store
                .sub_strands()
                .add(&NewSubStrand {
                    strand_id,
                    name: sub_strand.to_string(),
                })
                .await?;

            let indicator_id = self
                .store
                .indicators()
                .add(&NewIndicator {
                    sub_strand_id,
                    code: indicator_code.to_string(),
                    description: format!("Learners can demonstrate {indicator_code}"),
                    exemplars: String::new(),
                })
                .await?;

            Ok(Branch {
                subject_id,
                strand_id,
                sub_strand_id,
                indicator_id,
            })
        }

        pub async fn add_plan(
            &self,
            week: &str,
            branch: &Branch,
            notes: &str,
        ) -> Result<i64, StoreError> {
            self.store
                .lesson_plans()
                .add(&NewLessonPlan {
                    week: week.to_string(),
                    subject_id: branch.subject_id,
                    strand_id: branch.strand_id,
                    sub_strand_id: branch.sub_strand_id,
                    indicator_id: branch.indicator_id,
                    notes: notes.to_string(),
                })
                .await
        }
    }
}
