use std::path::PathBuf;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use sensor_cli::analysis::{AnalysisResult, SensorReport};
use sensor_cli::store::ResourceRecord;
use sensor_model::{MeasureValue, Metric, ResourceHandle};

const MEASURE_COLUMNS: [Metric; 6] = [
    Metric::Tests,
    Metric::SkippedTests,
    Metric::TestFailures,
    Metric::TestErrors,
    Metric::TestExecutionTime,
    Metric::TestSuccessDensity,
];

pub fn print_summary(result: &AnalysisResult) {
    println!("Project: {}", result.project.handle);
    println!("Base directory: {}", result.project.base_dir.display());
    println!("{}", sensor_table(&result.sensors));

    let rows: Vec<(&ResourceHandle, &ResourceRecord)> = result.store.resources().collect();
    if rows.is_empty() {
        println!("No measures or issues saved.");
    } else {
        println!("{}", resource_table(&rows));
    }

    for sensor in &result.sensors {
        if sensor.failures.is_empty() {
            continue;
        }
        eprintln!("{} errors:", sensor.name);
        for failure in &sensor.failures {
            eprintln!("- {failure}");
        }
    }
}

pub fn print_reports(reports: &[(String, PathBuf)]) {
    if reports.is_empty() {
        println!("No report files found.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Sensor"), header_cell("Report")]);
    apply_table_style(&mut table);
    for (sensor, path) in reports {
        table.add_row(vec![Cell::new(sensor), Cell::new(path.display())]);
    }
    println!("{table}");
}

fn sensor_table(sensors: &[SensorReport]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sensor"),
        header_cell("Ran"),
        header_cell("Reports"),
        header_cell("Parsed"),
        header_cell("Failed"),
    ]);
    apply_table_style(&mut table);
    for column in 2..5 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    for sensor in sensors {
        table.add_row(vec![
            Cell::new(&sensor.name),
            if sensor.executed {
                Cell::new("yes").fg(Color::Green)
            } else {
                dim_cell("no")
            },
            Cell::new(sensor.report_files),
            Cell::new(sensor.parsed_files),
            count_cell(sensor.failures.len(), Color::Red),
        ]);
    }
    table
}

fn resource_table(rows: &[(&ResourceHandle, &ResourceRecord)]) -> Table {
    let mut table = Table::new();
    let mut header = vec![header_cell("Resource")];
    header.extend(MEASURE_COLUMNS.iter().map(|metric| header_cell(short_label(*metric))));
    header.push(header_cell("Issues"));
    table.set_header(header);
    apply_resource_table_style(&mut table);
    for column in 1..=MEASURE_COLUMNS.len() + 1 {
        align_column(&mut table, column, CellAlignment::Right);
    }

    let mut total_issues = 0usize;
    for (resource, record) in rows {
        total_issues += record.issues.len();
        let mut cells = vec![Cell::new(resource.key())];
        cells.extend(
            MEASURE_COLUMNS
                .iter()
                .map(|metric| measure_cell(*metric, record.measures.get(metric))),
        );
        cells.push(count_cell(record.issues.len(), Color::Yellow));
        table.add_row(cells);
    }

    let mut total = vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
    ];
    total.extend(MEASURE_COLUMNS.iter().map(|_| dim_cell("-")));
    total.push(count_cell(total_issues, Color::Yellow).add_attribute(Attribute::Bold));
    table.add_row(total);
    table
}

fn short_label(metric: Metric) -> &'static str {
    match metric {
        Metric::Tests => "Tests",
        Metric::SkippedTests => "Skipped",
        Metric::TestFailures => "Failures",
        Metric::TestErrors => "Errors",
        Metric::TestExecutionTime => "Time (ms)",
        Metric::TestSuccessDensity => "Success %",
        Metric::TestData => "Details",
    }
}

fn measure_cell(metric: Metric, value: Option<&MeasureValue>) -> Cell {
    let Some(number) = value.and_then(MeasureValue::as_number) else {
        return dim_cell("-");
    };
    match metric {
        Metric::TestFailures | Metric::TestErrors if number > 0.0 => Cell::new(number)
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Metric::TestSuccessDensity => Cell::new(format!("{number:.1}")),
        _ => Cell::new(number),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn apply_resource_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
