#[cfg(test)]
mod export_tests {
    use chrono::{TimeZone, Utc};

    use crate::models::answer::{AnswerSet, AnswerValue};
    use crate::models::form::{FieldDefinition, FieldType, FormDefinition};
    use crate::models::response::ResponseRecord;
    use crate::services::export::{export, to_csv, to_xlsx};

    fn field(key: &str, label: &str, field_type: FieldType) -> FieldDefinition {
        FieldDefinition {
            key: key.to_string(),
            label: label.to_string(),
            field_type,
            required: false,
            options: vec![],
        }
    }

    fn registration_form() -> FormDefinition {
        FormDefinition {
            id: "event-2026".to_string(),
            title: "Spring open day".to_string(),
            fields: vec![
                field("name", "name-label", FieldType::ShortText),
                field("email", "email-label", FieldType::Email),
                field("interests", "Interests", FieldType::Checkbox),
                field("source", "How did you hear about us", FieldType::Radio),
            ],
            email_field_key: None,
        }
    }

    fn record(answers: AnswerSet) -> ResponseRecord {
        ResponseRecord {
            response_id: "r1".to_string(),
            form_id: "event-2026".to_string(),
            // 2026-03-01T01:30:00Z is 09:30 in the display offset
            submitted_at: Utc.with_ymd_and_hms(2026, 3, 1, 1, 30, 0).unwrap(),
            answers,
        }
    }

    fn full_answers() -> AnswerSet {
        let mut answers = AnswerSet::default();
        answers.insert("name", AnswerValue::Text("A".to_string()));
        answers.insert("email", AnswerValue::Text("a@x.com".to_string()));
        answers.insert(
            "interests",
            AnswerValue::Checkbox {
                selected: vec!["AI".to_string(), "Data".to_string()],
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
    fn header_tracks_field_order_after_the_three_fixed_columns() {
        let grid = export(&registration_form(), &[]);

        assert_eq!(grid.len(), 1);
        assert_eq!(
            grid[0],
            vec![
                "Submitted Date",
                "Submitted Time",
                "Email (detected)",
                "name-label",
                "email-label",
                "Interests",
                "How did you hear about us",
            ]
        );
    }

    #[test]
    fn serializes_each_answer_shape_into_its_cell() {
        let grid = export(&registration_form(), &[record(full_answers())]);

        assert_eq!(
            grid[1],
            vec![
                "2026/03/01",
                "09:30:00",
                "a@x.com",
                "A",
                "a@x.com",
                "AI; Data; Other: Cloud",
                "Other: Conference",
            ]
        );
    }

    #[test]
    fn checkbox_other_is_omitted_when_toggle_is_off_or_text_is_blank() {
        let mut toggled_off = AnswerSet::default();
        toggled_off.insert(
            "interests",
            AnswerValue::Checkbox {
                selected: vec!["AI".to_string()],
                other_enabled: false,
                other_text: Some("ignored".to_string()),
            },
        );
        let mut blank_text = AnswerSet::default();
        blank_text.insert(
            "interests",
            AnswerValue::Checkbox {
                selected: vec!["AI".to_string()],
                other_enabled: true,
                other_text: Some("   ".to_string()),
            },
        );

        let grid = export(
            &registration_form(),
            &[record(toggled_off), record(blank_text)],
        );
        assert_eq!(grid[1][5], "AI");
        assert_eq!(grid[2][5], "AI");
    }

    #[test]
    fn checkbox_satisfied_by_other_alone_renders_only_the_other_text() {
        let mut answers = AnswerSet::default();
        answers.insert(
            "interests",
            AnswerValue::Checkbox {
                selected: vec![],
                other_enabled: true,
                other_text: Some("Cloud".to_string()),
            },
        );

        let grid = export(&registration_form(), &[record(answers)]);
        assert_eq!(grid[1][5], "Other: Cloud");
    }

    #[test]
    fn radio_other_with_blank_text_renders_bare_other() {
        let mut answers = AnswerSet::default();
        answers.insert(
            "source",
            AnswerValue::Radio {
                chosen: "Other".to_string(),
                other_text: None,
            },
        );

        let grid = export(&registration_form(), &[record(answers)]);
        assert_eq!(grid[1][6], "Other");
    }

    #[test]
    fn missing_answers_yield_empty_cells() {
        let grid = export(&registration_form(), &[record(AnswerSet::default())]);

        assert_eq!(grid[1][3], "");
        assert_eq!(grid[1][4], "");
        assert_eq!(grid[1][5], "");
        assert_eq!(grid[1][6], "");
    }

    #[test]
    fn answers_for_removed_fields_are_silently_omitted() {
        // The record was submitted against a schema that still had the
        // "interests" and "source" fields; the live form has dropped them.
        let mut live_form = registration_form();
        live_form.fields.retain(|f| f.key == "name" || f.key == "email");

        let grid = export(&live_form, &[record(full_answers())]);

        assert_eq!(
            grid[0],
            vec![
                "Submitted Date",
                "Submitted Time",
                "Email (detected)",
                "name-label",
                "email-label",
            ]
        );
        assert_eq!(grid[1][3], "A");
        assert_eq!(grid[1][4], "a@x.com");
        assert_eq!(grid[1].len(), 5);
    }

    #[test]
    fn export_is_idempotent() {
        let form = registration_form();
        let records = vec![record(full_answers()), record(AnswerSet::default())];

        let first = export(&form, &records);
        let second = export(&form, &records);
        assert_eq!(first, second);

        let first_csv = to_csv(&first).unwrap();
        let second_csv = to_csv(&second).unwrap();
        assert_eq!(first_csv, second_csv);
    }

    #[test]
    fn detected_email_column_uses_the_live_form_pointer() {
        let mut form = registration_form();
        let grid_before = export(&form, &[record(full_answers())]);
        assert_eq!(grid_before[1][2], "a@x.com");

        // Repointing the form changes what historical exports show
        form.email_field_key = Some("name".to_string());
        let grid_after = export(&form, &[record(full_answers())]);
        assert_eq!(grid_after[1][2], "A");
    }

    #[test]
    fn csv_output_is_bom_prefixed_with_crlf_rows_and_quoted_separators() {
        let mut answers = AnswerSet::default();
        answers.insert("name", AnswerValue::Text("Comma, \"quoted\"".to_string()));

        let form = FormDefinition {
            id: "f".to_string(),
            title: "F".to_string(),
            fields: vec![field("name", "Name", FieldType::ShortText)],
            email_field_key: None,
        };
        let bytes = to_csv(&export(&form, &[record(answers)])).unwrap();

        assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert!(text.starts_with("Submitted Date,Submitted Time,Email (detected),Name\r\n"));
        assert!(text.contains("\"Comma, \"\"quoted\"\"\""));
        assert!(text.ends_with("\r\n"));
    }

    #[test]
    fn xlsx_output_is_a_zip_container() {
        let bytes = to_xlsx(&export(&registration_form(), &[record(full_answers())])).unwrap();

        // XLSX is a zip archive; PK is the local file header magic
        assert_eq!(&bytes[..2], b"PK");
    }
}
