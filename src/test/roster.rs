#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::error::StoreError;
    use crate::models::{Student, Teacher};
    use crate::repository::Repository;
    use crate::test::utils::fixtures::{RosterFixtureBuilder, new_student, new_teacher};

    #[tokio::test]
    async fn add_then_get_by_id_round_trips() {
        let fixture = RosterFixtureBuilder::new().build().await.unwrap();
        let store = &fixture.store;

        let mut draft = new_teacher("Sir James", "Basic 7", "MEC-TAC-526001");
        draft.subjects = vec!["Mathematics".to_string(), "Social Studies".to_string()];
        let id = store.teachers().add(&draft).await.unwrap();

        let teacher = store.teachers().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(
            teacher,
            Teacher {
                id,
                teacher_name: "Sir James".to_string(),
                class_name: "Basic 7".to_string(),
                subjects: vec!["Mathematics".to_string(), "Social Studies".to_string()],
                access_code: "MEC-TAC-526001".to_string(),
            }
        );

        let mut student_draft = new_student("Ama", "Mensah", "Basic 5");
        student_draft.email = Some("ama.mensah@example.com".to_string());
        let student_id = store.students().add(&student_draft).await.unwrap();

        let student = store
            .students()
            .get_by_id(student_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            student,
            Student {
                id: student_id,
                first_name: "Ama".to_string(),
                last_name: "Mensah".to_string(),
                class_name: "Basic 5".to_string(),
                email: Some("ama.mensah@example.com".to_string()),
                enrollment_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            }
        );
    }

    #[tokio::test]
    async fn get_by_id_returns_none_for_missing_record() {
        let fixture = RosterFixtureBuilder::new().build().await.unwrap();
        let missing = fixture.store.teachers().get_by_id(404).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn update_is_a_full_replace() {
        let fixture = RosterFixtureBuilder::new()
            .student("Kofi", "Owusu", "Basic 5")
            .build()
            .await
            .unwrap();
        let store = &fixture.store;
        let id = fixture.student_id("Kofi Owusu").unwrap();

        let mut student = store.students().get_by_id(id).await.unwrap().unwrap();
        student.email = Some("kofi@example.com".to_string());
        store.students().update(&student).await.unwrap();

        // A later update that omits the email must clear it, not merge.
        student.email = None;
        student.class_name = "Basic 6".to_string();
        store.students().update(&student).await.unwrap();

        let reread = store.students().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(reread.email, None);
        assert_eq!(reread.class_name, "Basic 6");
    }

    #[tokio::test]
    async fn update_without_key_is_a_validation_error() {
        let fixture = RosterFixtureBuilder::new().build().await.unwrap();

        let teacher = Teacher {
            id: 0,
            teacher_name: "Sir Alfred".to_string(),
            class_name: "Basic 8".to_string(),
            subjects: Vec::new(),
            access_code: "MEC-TAC-102301".to_string(),
        };

        let err = fixture.store.teachers().update(&teacher).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn add_rejects_empty_names() {
        let fixture = RosterFixtureBuilder::new().build().await.unwrap();

        let err = fixture
            .store
            .teachers()
            .add(&new_teacher("", "Basic 1", "MEC-TAC-000001"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let mut student = new_student("Akua", "Asante", "Basic 2");
        student.email = Some("not-an-email".to_string());
        let err = fixture.store.students().add(&student).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn remove_is_a_noop_for_missing_keys() {
        let fixture = RosterFixtureBuilder::new()
            .teacher("Sir Mike", "Basic 5", "MEC-TAC-925001")
            .build()
            .await
            .unwrap();
        let store = &fixture.store;
        let id = fixture.teacher_id("Sir Mike").unwrap();

        store.teachers().remove(9999).await.unwrap();
        assert!(store.teachers().get_by_id(id).await.unwrap().is_some());

        store.teachers().remove(id).await.unwrap();
        assert!(store.teachers().get_by_id(id).await.unwrap().is_none());

        // Removing it again still completes cleanly.
        store.teachers().remove(id).await.unwrap();
    }

    #[tokio::test]
    async fn get_by_class_name_matches_exactly() {
        let fixture = RosterFixtureBuilder::new()
            .teacher("Sir Robinson", "Basic 4", "MEC-TAC-415001")
            .student("Esi", "Boateng", "Basic 5")
            .student("Yaw", "Darko", "Basic 5")
            .student("Kweku", "Annan", "basic 5")
            .build()
            .await
            .unwrap();
        let store = &fixture.store;

        let students = store.students().get_by_class_name("Basic 5").await.unwrap();
        assert_eq!(students.len(), 2);
        assert!(students.iter().all(|s| s.class_name == "Basic 5"));

        let teachers = store.teachers().get_by_class_name("Basic 4").await.unwrap();
        assert_eq!(teachers.len(), 1);
        assert_eq!(teachers[0].teacher_name, "Sir Robinson");

        assert!(
            store
                .teachers()
                .get_by_class_name("basic 4")
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn count_in_class_counts_students() {
        let fixture = RosterFixtureBuilder::new()
            .student("Esi", "Boateng", "Basic 5")
            .student("Yaw", "Darko", "Basic 5")
            .student("Akosua", "Frimpong", "Basic 6")
            .build()
            .await
            .unwrap();

        assert_eq!(fixture.store.count_in_class("Basic 5").await.unwrap(), 2);
        assert_eq!(fixture.store.count_in_class("Basic 6").await.unwrap(), 1);
        assert_eq!(
            fixture
                .store
                .count_in_class("Unassigned Class")
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn class_has_any_teacher_checks_the_class_index() {
        let fixture = RosterFixtureBuilder::new()
            .teacher("Madam Georgina", "Basic 6", "MEC-TAC-202501")
            .build()
            .await
            .unwrap();

        assert!(fixture.store.class_has_any_teacher("Basic 6").await.unwrap());
        assert!(
            !fixture
                .store
                .class_has_any_teacher("Unassigned Class")
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn duplicate_access_code_is_a_constraint_violation() {
        let fixture = RosterFixtureBuilder::new()
            .teacher("Sir James", "Basic 7", "MEC-TAC-526001")
            .build()
            .await
            .unwrap();
        let store = &fixture.store;

        let err = store
            .teachers()
            .add(&new_teacher("Sir Alfred", "Basic 8", "MEC-TAC-526001"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));

        // The rejected record must not have been persisted.
        assert_eq!(store.teachers().get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_to_a_taken_access_code_is_a_constraint_violation() {
        let fixture = RosterFixtureBuilder::new()
            .teacher("Sir James", "Basic 7", "MEC-TAC-526001")
            .teacher("Sir Alfred", "Basic 8", "MEC-TAC-102301")
            .build()
            .await
            .unwrap();
        let store = &fixture.store;
        let id = fixture.teacher_id("Sir Alfred").unwrap();

        let mut teacher = store.teachers().get_by_id(id).await.unwrap().unwrap();
        teacher.access_code = "MEC-TAC-526001".to_string();

        let err = store.teachers().update(&teacher).await.unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));

        // The rejected update must not have touched the row.
        let reread = store.teachers().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(reread.access_code, "MEC-TAC-102301");
    }

    #[tokio::test]
    async fn pagination_slices_the_collection() {
        let fixture = RosterFixtureBuilder::new().build().await.unwrap();
        let store = &fixture.store;

        for i in 1..=25 {
            store
                .students()
                .add(&new_student(&format!("Student{i}"), "Test", "Basic 5"))
                .await
                .unwrap();
        }

        let page2 = store.students().paginate(2, 10).await.unwrap();
        assert_eq!(page2.len(), 10);
        assert_eq!(page2.first().unwrap().first_name, "Student11");
        assert_eq!(page2.last().unwrap().first_name, "Student20");

        let page3 = store.students().paginate(3, 10).await.unwrap();
        assert_eq!(page3.len(), 5);
        assert_eq!(page3.last().unwrap().first_name, "Student25");

        assert!(store.students().paginate(4, 10).await.unwrap().is_empty());
        assert!(store.students().paginate(0, 10).await.unwrap().is_empty());

        for i in 1..=12 {
            store
                .teachers()
                .add(&new_teacher(
                    &format!("Teacher{i}"),
                    "Basic 1",
                    &format!("MEC-TAC-{:06}", 700_000 + i),
                ))
                .await
                .unwrap();
        }

        let teacher_page2 = store.teachers().paginate(2, 5).await.unwrap();
        assert_eq!(teacher_page2.len(), 5);
        assert_eq!(teacher_page2.first().unwrap().teacher_name, "Teacher6");
        assert_eq!(teacher_page2.last().unwrap().teacher_name, "Teacher10");
        assert_eq!(store.teachers().paginate(3, 5).await.unwrap().len(), 2);
        assert!(store.teachers().paginate(4, 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_all_for_class_sweeps_teachers_and_students() {
        let fixture = RosterFixtureBuilder::new()
            .teacher("Sir Mike", "Basic 5", "MEC-TAC-925001")
            .student("Esi", "Boateng", "Basic 5")
            .student("Yaw", "Darko", "Basic 5")
            .student("Akosua", "Frimpong", "Basic 6")
            .build()
            .await
            .unwrap();
        let store = &fixture.store;

        store.delete_all_for_class("Basic 5").await.unwrap();

        assert!(
            store
                .teachers()
                .get_by_class_name("Basic 5")
                .await
                .unwrap()
                .is_empty()
        );
        assert_eq!(store.count_in_class("Basic 5").await.unwrap(), 0);

        // Other classes are untouched.
        assert_eq!(store.count_in_class("Basic 6").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn closed_store_reports_not_connected() {
        let fixture = RosterFixtureBuilder::new()
            .teacher("Sir James", "Basic 7", "MEC-TAC-526001")
            .build()
            .await
            .unwrap();

        fixture.store.close().await;

        let err = fixture.store.teachers().get_all().await.unwrap_err();
        assert!(matches!(err, StoreError::NotConnected));

        let err = fixture.store.count_in_class("Basic 7").await.unwrap_err();
        assert!(matches!(err, StoreError::NotConnected));
    }
}
