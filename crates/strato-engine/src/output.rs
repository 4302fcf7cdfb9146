use crate::logger::{Logger, OutputSink};
use serde_json::{Map, Value};
use strato_types::OutputMode;

/// Knobs for csv rendering, fed from the `csvHeader`/`csvQuoted`
/// settings.
#[derive(Debug, Clone, Copy)]
pub struct CsvOptions {
    pub header: bool,
    pub quoted: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            header: true,
            quoted: false,
        }
    }
}

/// Project a result value onto an ordered field subset.
///
/// Objects keep only the listed properties, in list order; arrays are
/// projected element-wise; anything else passes through. Projecting an
/// already-projected value is a no-op.
pub fn project(value: &Value, properties: &[String]) -> Value {
    match value {
        Value::Object(record) => Value::Object(project_record(record, properties)),
        Value::Array(records) => Value::Array(
            records
                .iter()
                .map(|record| project(record, properties))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn project_record(record: &Map<String, Value>, properties: &[String]) -> Map<String, Value> {
    let mut projected = Map::new();
    for property in properties {
        if let Some(value) = record.get(property) {
            projected.insert(property.clone(), value.clone());
        }
    }
    projected
}

/// Render a result value for the given output mode. `None` means
/// nothing should be printed (the `none` mode, or an empty result in a
/// tabular mode).
pub fn render(
    value: &Value,
    mode: OutputMode,
    default_properties: Option<&[String]>,
    csv: &CsvOptions,
) -> Option<String> {
    match mode {
        OutputMode::None => None,
        OutputMode::Json => {
            Some(serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()))
        }
        OutputMode::Text | OutputMode::Csv | OutputMode::Md => {
            let projected = match default_properties {
                Some(properties) if !properties.is_empty() => project(value, properties),
                _ => value.clone(),
            };
            match mode {
                OutputMode::Text => render_text(&projected),
                OutputMode::Csv => render_csv(&projected, csv),
                OutputMode::Md => render_md(&projected),
                _ => unreachable!(),
            }
        }
    }
}

/// A scalar cell as printed in tabular output.
fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn columns(records: &[Value]) -> Vec<String> {
    records
        .first()
        .and_then(Value::as_object)
        .map(|record| record.keys().cloned().collect())
        .unwrap_or_default()
}

fn render_text(value: &Value) -> Option<String> {
    match value {
        Value::Array(records) if records.is_empty() => None,
        Value::Array(records) => {
            let columns = columns(records);
            if columns.is_empty() {
                return Some(
                    records
                        .iter()
                        .map(cell)
                        .collect::<Vec<_>>()
                        .join("\n"),
                );
            }

            let header: Vec<String> = columns.iter().map(|c| c.to_uppercase()).collect();
            let rows: Vec<Vec<String>> = records
                .iter()
                .map(|record| {
                    columns
                        .iter()
                        .map(|column| {
                            record
                                .get(column)
                                .map(cell)
                                .unwrap_or_default()
                        })
                        .collect()
                })
                .collect();

            let mut widths: Vec<usize> = header.iter().map(String::len).collect();
            for row in &rows {
                for (width, value) in widths.iter_mut().zip(row) {
                    *width = (*width).max(value.len());
                }
            }

            let format_row = |row: &[String]| {
                row.iter()
                    .enumerate()
                    .map(|(i, value)| {
                        if i == row.len() - 1 {
                            value.clone()
                        } else {
                            format!("{:<width$}", value, width = widths[i])
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("  ")
            };

            let mut lines = vec![format_row(&header)];
            lines.extend(rows.iter().map(|row| format_row(row)));
            Some(lines.join("\n"))
        }
        Value::Object(record) => {
            if record.is_empty() {
                return None;
            }
            let width = record.keys().map(String::len).max().unwrap_or_default();
            Some(
                record
                    .iter()
                    .map(|(key, value)| {
                        format!("{:<width$}: {}", key, cell(value), width = width)
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
            )
        }
        scalar => Some(cell(scalar)),
    }
}

fn render_csv(value: &Value, options: &CsvOptions) -> Option<String> {
    let records: Vec<Value> = match value {
        Value::Array(records) => records.clone(),
        Value::Object(_) => vec![value.clone()],
        scalar => return Some(cell(scalar)),
    };
    if records.is_empty() {
        return None;
    }

    let columns = columns(&records);
    if columns.is_empty() {
        return Some(records.iter().map(cell).collect::<Vec<_>>().join("\n"));
    }

    let quote_style = if options.quoted {
        csv::QuoteStyle::Always
    } else {
        csv::QuoteStyle::Necessary
    };
    let mut writer = csv::WriterBuilder::new()
        .quote_style(quote_style)
        .from_writer(Vec::new());

    if options.header {
        writer.write_record(&columns).ok()?;
    }
    for record in &records {
        let row: Vec<String> = columns
            .iter()
            .map(|column| record.get(column).map(cell).unwrap_or_default())
            .collect();
        writer.write_record(&row).ok()?;
    }

    let bytes = writer.into_inner().ok()?;
    let text = String::from_utf8(bytes).ok()?;
    Some(text.trim_end_matches('\n').to_string())
}

fn render_md(value: &Value) -> Option<String> {
    let records: Vec<Value> = match value {
        Value::Array(records) => records.clone(),
        Value::Object(_) => vec![value.clone()],
        scalar => return Some(cell(scalar)),
    };
    if records.is_empty() {
        return None;
    }

    let columns = columns(&records);
    if columns.is_empty() {
        return Some(records.iter().map(cell).collect::<Vec<_>>().join("\n"));
    }

    let mut lines = Vec::with_capacity(records.len() + 2);
    lines.push(format!("| {} |", columns.join(" | ")));
    lines.push(format!(
        "| {} |",
        columns.iter().map(|_| "---").collect::<Vec<_>>().join(" | ")
    ));
    for record in &records {
        let row: Vec<String> = columns
            .iter()
            .map(|column| record.get(column).map(cell).unwrap_or_default())
            .collect();
        lines.push(format!("| {} |", row.join(" | ")));
    }
    Some(lines.join("\n"))
}

/// The logger handed to a top-level command body: applies projection
/// and rendering on the way to the output sink.
pub struct ProjectedLogger<'a> {
    sink: &'a dyn OutputSink,
    mode: OutputMode,
    default_properties: Option<Vec<String>>,
    csv: CsvOptions,
}

impl<'a> ProjectedLogger<'a> {
    pub fn new(
        sink: &'a dyn OutputSink,
        mode: OutputMode,
        default_properties: Option<Vec<String>>,
        csv: CsvOptions,
    ) -> Self {
        ProjectedLogger {
            sink,
            mode,
            default_properties,
            csv,
        }
    }
}

impl Logger for ProjectedLogger<'_> {
    fn log(&self, value: &Value) {
        if let Some(rendered) = render(
            value,
            self.mode,
            self.default_properties.as_deref(),
            &self.csv,
        ) {
            self.sink.out(&rendered);
        }
    }

    fn log_raw(&self, value: &Value) {
        if self.mode == OutputMode::None {
            return;
        }
        self.sink.out(&cell(value));
    }

    fn log_to_stderr(&self, message: &str) {
        self.sink.err(message);
    }
}
