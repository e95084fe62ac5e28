//! Offline scoring of many forms from a CSV/TSV file.
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use csv::StringRecord;
use rayon::prelude::*;

use thyrisk_classifiers::assembler::FormInput;
use thyrisk_classifiers::pipeline::{Assessment, RecurrencePipeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub rows: usize,
    pub recurrences: usize,
}

/// Tab for `.tsv`, comma otherwise.
pub fn delimiter_for(path: &Path) -> u8 {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("tsv") => b'\t',
        _ => b',',
    }
}

/// Score every record of `reader` and write it back out with `prediction`,
/// `label` and `message` columns appended.
pub fn score_records<R: Read, W: Write>(
    pipeline: &RecurrencePipeline,
    reader: R,
    writer: W,
    delimiter: u8,
) -> Result<BatchSummary> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers = reader.headers().context("Failed to read header row")?.clone();
    let records: Vec<StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .context("Failed to read input records")?;

    let assessments: Vec<Assessment> = records
        .par_iter()
        .enumerate()
        .map(|(i, record)| {
            let form: FormInput = headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.trim(), v))
                .collect();
            pipeline
                .assess(&form)
                .with_context(|| format!("Failed to score record {}", i + 1))
        })
        .collect::<Result<_>>()?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    let mut out_headers = headers.clone();
    out_headers.push_field("prediction");
    out_headers.push_field("label");
    out_headers.push_field("message");
    writer.write_record(&out_headers)?;

    let mut summary = BatchSummary::default();
    for (record, assessment) in records.iter().zip(&assessments) {
        let mut out = record.clone();
        out.push_field(assessment.prediction.as_str());
        out.push_field(&assessment.label.to_string());
        out.push_field(assessment.message());
        writer.write_record(&out)?;

        summary.rows += 1;
        if assessment.prediction.is_recurrence() {
            summary.recurrences += 1;
        }
    }
    writer.flush()?;

    Ok(summary)
}

/// Score `input`, writing to `output` or stdout.
pub fn score_file(
    pipeline: &RecurrencePipeline,
    input: &Path,
    output: Option<&Path>,
) -> Result<BatchSummary> {
    let delimiter = delimiter_for(input);
    let reader = std::fs::File::open(input)
        .with_context(|| format!("Failed to open input: {}", input.display()))?;

    let summary = match output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output: {}", path.display()))?;
            score_records(pipeline, reader, file, delimiter)?
        }
        None => score_records(pipeline, reader, std::io::stdout().lock(), delimiter)?,
    };

    log::info!(
        "Scored {} record(s) from {}: {} predicted recurrence",
        summary.rows,
        input.display(),
        summary.recurrences
    );
    Ok(summary)
}
