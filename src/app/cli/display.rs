//! Scan report and consumer list rendering

use crate::app::styles::StyleRole;
use crate::consumer::{ConsumerDescriptor, ConsumerKind};
use crate::scanner::ScanReport;
use prettytable::{format, Cell, Row, Table};

fn styled_cell(text: &str, role: StyleRole, use_color: bool) -> Cell {
    let cell = Cell::new(text);
    match role.to_prettytable_spec().filter(|_| use_color) {
        Some(spec) => cell.style_spec(spec),
        None => cell,
    }
}

fn key_value_row(key: &str, value: impl ToString, use_color: bool) -> Row {
    Row::new(vec![
        styled_cell(key, StyleRole::Key, use_color),
        Cell::new(&value.to_string()),
    ])
}

/// Statistics and problems as tables
pub fn render_report_table(report: &ScanReport, use_color: bool) -> String {
    let stats = &report.statistics;

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);
    table.add_row(key_value_row("Repository", &stats.repository_id, use_color));
    table.add_row(key_value_row("State", report.state, use_color));
    table.add_row(key_value_row("Gathered", stats.when_gathered.to_rfc3339(), use_color));
    table.add_row(key_value_row("Duration (ms)", stats.duration_millis, use_color));
    table.add_row(key_value_row("Visited files", stats.visited_file_count, use_color));
    table.add_row(key_value_row("Total files", stats.total_file_count, use_color));
    table.add_row(key_value_row("New files", stats.new_file_count, use_color));
    table.add_row(key_value_row("Invalid files", stats.invalid_file_count, use_color));
    let mut output = table.to_string();

    if !stats.consumer_counts.is_empty() {
        let mut consumers = Table::new();
        consumers.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        consumers.set_titles(Row::new(vec![
            styled_cell("Consumer", StyleRole::Header, use_color),
            styled_cell("Files", StyleRole::Header, use_color),
        ]));
        for (id, count) in &stats.consumer_counts {
            consumers.add_row(Row::new(vec![Cell::new(id), Cell::new(&count.to_string())]));
        }
        output.push('\n');
        output.push_str(&consumers.to_string());
    }

    output.push('\n');
    if report.problems.is_empty() {
        output.push_str(&StyleRole::Valid.paint("No problems", use_color));
        output.push('\n');
    } else {
        let mut problems = Table::new();
        problems.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        problems.set_titles(Row::new(
            ["Consumer", "Phase", "Path", "Message"]
                .iter()
                .map(|t| styled_cell(t, StyleRole::Header, use_color))
                .collect(),
        ));
        for problem in &report.problems {
            problems.add_row(Row::new(vec![
                styled_cell(&problem.consumer_id, StyleRole::Invalid, use_color),
                Cell::new(&problem.kind.to_string()),
                Cell::new(problem.path.as_deref().unwrap_or("-")),
                Cell::new(&problem.message),
            ]));
        }
        output.push_str(&problems.to_string());
    }
    output
}

/// The whole report as pretty-printed JSON
pub fn render_report_json(report: &ScanReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Registered consumers, known first
pub fn render_consumer_table(descriptors: &[ConsumerDescriptor], use_color: bool) -> String {
    if descriptors.is_empty() {
        return "No consumers registered.\n".to_string();
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(
        ["Consumer", "Kind", "Enabled", "Description"]
            .iter()
            .map(|t| styled_cell(t, StyleRole::Header, use_color))
            .collect(),
    ));
    for descriptor in descriptors {
        let kind = match descriptor.kind {
            ConsumerKind::Known => "known",
            ConsumerKind::Invalid => "invalid",
        };
        let enabled = match (descriptor.enabled, descriptor.is_permanent) {
            (_, true) => "permanent",
            (true, false) => "yes",
            (false, false) => "no",
        };
        let enabled_role = if descriptor.enabled {
            StyleRole::Valid
        } else {
            StyleRole::Dim
        };
        table.add_row(Row::new(vec![
            styled_cell(&descriptor.id, StyleRole::Key, use_color),
            Cell::new(kind),
            styled_cell(enabled, enabled_role, use_color),
            Cell::new(&descriptor.description),
        ]));
    }
    table.to_string()
}
