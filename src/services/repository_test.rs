#[cfg(test)]
mod repository_tests {
    use std::path::Path;
    use tempfile::tempdir;

    use crate::models::answer::{AnswerSet, AnswerValue};
    use crate::services::repository::ResponseRepository;

    fn sample_answers() -> AnswerSet {
        let mut answers = AnswerSet::default();
        answers.insert("name", AnswerValue::Text("Ada".to_string()));
        answers.insert(
            "interests",
            AnswerValue::Checkbox {
                selected: vec!["AI".to_string()],
                other_enabled: true,
                other_text: Some("Cloud".to_string()),
            },
        );
        answers.insert(
            "source",
            AnswerValue::Radio {
                chosen: "Other".to_string(),
                other_text: Some("Conference".to_string()),
            },
        );
        answers
    }

    #[test]
    fn creates_the_store_file_with_headers() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("responses.csv");
        let csv_path_str = csv_path.to_str().unwrap();

        let _repo = ResponseRepository::new(csv_path_str);

        assert!(Path::new(csv_path_str).exists());
        let contents = std::fs::read_to_string(csv_path_str).unwrap();
        assert!(contents.starts_with("response_id,form_id,submitted_at,answers"));

        dir.close().unwrap();
    }

    #[test]
    fn appended_responses_round_trip_with_structure_intact() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("responses.csv");
        let repo = ResponseRepository::new(csv_path.to_str().unwrap());

        let stored = repo.append("event-2026", &sample_answers()).unwrap();
        assert_eq!(stored.form_id, "event-2026");
        assert_eq!(stored.response_id.len(), 16);

        let listed = repo.list_by_form("event-2026").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].response_id, stored.response_id);
        assert_eq!(listed[0].answers, sample_answers());

        dir.close().unwrap();
    }

    #[test]
    fn every_append_creates_a_new_record_even_for_identical_answers() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("responses.csv");
        let repo = ResponseRepository::new(csv_path.to_str().unwrap());

        let first = repo.append("event-2026", &sample_answers()).unwrap();
        let second = repo.append("event-2026", &sample_answers()).unwrap();

        assert_ne!(first.response_id, second.response_id);
        assert_eq!(repo.list_by_form("event-2026").unwrap().len(), 2);

        dir.close().unwrap();
    }

    #[test]
    fn listing_filters_by_form_and_orders_by_submission_time() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("responses.csv");
        let repo = ResponseRepository::new(csv_path.to_str().unwrap());

        let a = repo.append("event-a", &sample_answers()).unwrap();
        let _other = repo.append("event-b", &sample_answers()).unwrap();
        let b = repo.append("event-a", &sample_answers()).unwrap();

        let listed = repo.list_by_form("event-a").unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].response_id, a.response_id);
        assert_eq!(listed[1].response_id, b.response_id);
        assert!(listed[0].submitted_at <= listed[1].submitted_at);

        dir.close().unwrap();
    }

    #[test]
    fn listing_an_unknown_form_returns_no_records() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("responses.csv");
        let repo = ResponseRepository::new(csv_path.to_str().unwrap());

        assert!(repo.list_by_form("nope").unwrap().is_empty());

        dir.close().unwrap();
    }
}
