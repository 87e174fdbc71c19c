use chrono::{DateTime, FixedOffset, Utc};
use csv::{Terminator, WriterBuilder};
use rust_xlsxwriter::Workbook;

use crate::error::ExportError;
use crate::models::answer::{non_blank, AnswerValue};
use crate::models::form::{FormDefinition, OTHER_SENTINEL};
use crate::models::response::ResponseRecord;
use crate::services::email::detect_email;

// Fixed leading columns; everything after them mirrors the form's fields.
const COLUMN_SUBMITTED_DATE: &str = "Submitted Date";
const COLUMN_SUBMITTED_TIME: &str = "Submitted Time";
const COLUMN_DETECTED_EMAIL: &str = "Email (detected)";

// Display offset for the Submitted Date/Time columns. Responses are stored
// in UTC; the spreadsheet shows them in the deployment's local time.
const DISPLAY_OFFSET_HOURS: i32 = 8;

// UTF-8 byte order mark so spreadsheet applications detect the encoding
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Build the export grid for one form: row 0 is the header, one row per
/// stored response after that.
///
/// The columns always track the form schema as it exists *now*: current
/// field order, current labels. Historical responses are re-projected onto
/// that schema — a response with no answer for a current field gets an
/// empty cell, and answers for fields that no longer exist contribute no
/// column at all.
pub fn export(form: &FormDefinition, records: &[ResponseRecord]) -> Vec<Vec<String>> {
    let mut grid = Vec::with_capacity(records.len() + 1);
    grid.push(header_row(form));
    for record in records {
        grid.push(data_row(form, record));
    }
    grid
}

fn header_row(form: &FormDefinition) -> Vec<String> {
    let mut header = vec![
        COLUMN_SUBMITTED_DATE.to_string(),
        COLUMN_SUBMITTED_TIME.to_string(),
        COLUMN_DETECTED_EMAIL.to_string(),
    ];
    header.extend(form.fields.iter().map(|f| f.label.clone()));
    header
}

fn data_row(form: &FormDefinition, record: &ResponseRecord) -> Vec<String> {
    let (date, time) = format_submitted_at(record.submitted_at);

    // The detected email is recomputed against the live form, never read
    // from the record, so repointing email_field_key changes what
    // historical exports show.
    let mut row = vec![date, time, detect_email(form, &record.answers)];

    for field in &form.fields {
        row.push(answer_cell(record, &field.key));
    }
    row
}

// Serialize one stored answer into its spreadsheet cell
fn answer_cell(record: &ResponseRecord, key: &str) -> String {
    match record.answers.get(key) {
        None => String::new(),
        Some(AnswerValue::Text(value)) => value.clone(),
        Some(AnswerValue::Radio { chosen, other_text }) => {
            if chosen == OTHER_SENTINEL {
                match non_blank(other_text.as_deref()) {
                    Some(text) => format!("{}: {}", OTHER_SENTINEL, text),
                    None => OTHER_SENTINEL.to_string(),
                }
            } else {
                chosen.clone()
            }
        }
        Some(AnswerValue::Checkbox {
            selected,
            other_enabled,
            other_text,
        }) => {
            let mut parts = selected.clone();
            if *other_enabled {
                if let Some(text) = non_blank(other_text.as_deref()) {
                    parts.push(format!("{}: {}", OTHER_SENTINEL, text));
                }
            }
            parts.join("; ")
        }
    }
}

fn format_submitted_at(submitted_at: DateTime<Utc>) -> (String, String) {
    let offset = FixedOffset::east_opt(DISPLAY_OFFSET_HOURS * 3600)
        .expect("static display offset is within range");
    let local = submitted_at.with_timezone(&offset);
    (
        local.format("%Y/%m/%d").to_string(),
        local.format("%H:%M:%S").to_string(),
    )
}

/// Render the grid as CSV: comma separated, CRLF line endings, standard
/// quoting, BOM-prefixed.
pub fn to_csv(grid: &[Vec<String>]) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::from(UTF8_BOM);
    {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .terminator(Terminator::CRLF)
            .from_writer(&mut buffer);

        for row in grid {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }
    Ok(buffer)
}

/// Render the grid as a single-sheet XLSX workbook in memory.
pub fn to_xlsx(grid: &[Vec<String>]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Responses")?;

    for (row_idx, row) in grid.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            worksheet.write_string(row_idx as u32, col_idx as u16, cell)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}
