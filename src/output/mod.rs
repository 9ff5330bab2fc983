use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    car::{Car, Color},
    engine::Statistics,
    error::OutputError,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

/// Result of one engine query, ready to be rendered.
#[derive(Clone, Debug)]
pub enum Report<'a> {
    Cars(Vec<&'a Car>),
    ColorCounts(BTreeMap<Color, usize>),
    ModelWinners(BTreeMap<String, &'a Car>),
    ComponentGroups(BTreeMap<String, Vec<&'a Car>>),
    Statistics(Statistics),
}

pub fn print(
    report: &Report<'_>,
    format: OutputFormat,
) -> Result<(), OutputError> {
    println!("{}", render(report, format)?);
    Ok(())
}

pub fn render(
    report: &Report<'_>,
    format: OutputFormat,
) -> Result<String, OutputError> {
    match format {
        OutputFormat::Table => Ok(render_table(report)),
        OutputFormat::Json => render_json(report),
        OutputFormat::Yaml => render_yaml(report),
    }
}

pub fn render_json(report: &Report<'_>) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(&view(report))?)
}

pub fn render_yaml(report: &Report<'_>) -> Result<String, OutputError> {
    Ok(serde_yaml::to_string(&view(report))?)
}

pub fn render_table(report: &Report<'_>) -> String {
    let (columns, rows) = table_rows(report);
    if rows.is_empty() {
        return "items: 0".to_string();
    }

    let widths = compute_widths(&columns, &rows);
    let header: Vec<String> = columns.iter().map(ToString::to_string).collect();
    let mut lines = Vec::with_capacity(rows.len() + 3);
    lines.push(format_row(&header, &widths));
    lines.push(format_separator(&widths));
    for row in &rows {
        lines.push(format_row(row, &widths));
    }

    lines.push(format!("items: {}", rows.len()));
    lines.join("\n")
}

#[derive(Serialize)]
struct ColorCount {
    color: Color,
    count: usize,
}

#[derive(Serialize)]
struct ComponentGroup<'a> {
    component: &'a str,
    cars: &'a [&'a Car],
}

/// Serialized shape of a report, shared by the json and yaml renderers.
#[derive(Serialize)]
#[serde(untagged)]
enum ReportView<'r, 'a> {
    Cars(&'r [&'a Car]),
    ColorCounts(Vec<ColorCount>),
    ModelWinners(&'r BTreeMap<String, &'a Car>),
    ComponentGroups(Vec<ComponentGroup<'r>>),
    Statistics(&'r Statistics),
}

fn view<'r, 'a>(report: &'r Report<'a>) -> ReportView<'r, 'a> {
    match report {
        Report::Cars(cars) => ReportView::Cars(cars),
        Report::ColorCounts(counts) => ReportView::ColorCounts(
            ranked_colors(counts)
                .into_iter()
                .map(|(color, count)| ColorCount { color, count })
                .collect(),
        ),
        Report::ModelWinners(winners) => ReportView::ModelWinners(winners),
        Report::ComponentGroups(groups) => ReportView::ComponentGroups(
            ranked_groups(groups)
                .into_iter()
                .map(|(component, cars)| ComponentGroup { component, cars })
                .collect(),
        ),
        Report::Statistics(stats) => ReportView::Statistics(stats),
    }
}

/// Highest count first; equal counts keep color order.
fn ranked_colors(counts: &BTreeMap<Color, usize>) -> Vec<(Color, usize)> {
    let mut ranked: Vec<(Color, usize)> = counts
        .iter()
        .map(|(color, count)| (*color, *count))
        .collect();
    ranked.sort_by(|left, right| right.1.cmp(&left.1));
    ranked
}

/// Largest group first; equal sizes keep label order.
fn ranked_groups<'m, 'a>(
    groups: &'m BTreeMap<String, Vec<&'a Car>>,
) -> Vec<(&'m str, &'m [&'a Car])> {
    let mut ranked: Vec<(&str, &[&Car])> = groups
        .iter()
        .map(|(component, cars)| (component.as_str(), cars.as_slice()))
        .collect();
    ranked.sort_by(|left, right| right.1.len().cmp(&left.1.len()));
    ranked
}

const CAR_COLUMNS: [&str; 5] = ["model", "price", "color", "mileage", "components"];

fn table_rows(report: &Report<'_>) -> (Vec<&'static str>, Vec<Vec<String>>) {
    match report {
        Report::Cars(cars) => (
            CAR_COLUMNS.to_vec(),
            cars.iter().map(|car| car_cells(car)).collect(),
        ),
        Report::ColorCounts(counts) => (
            vec!["color", "count"],
            ranked_colors(counts)
                .into_iter()
                .map(|(color, count)| vec![color.to_string(), count.to_string()])
                .collect(),
        ),
        Report::ModelWinners(winners) => (
            CAR_COLUMNS.to_vec(),
            winners.values().map(|car| car_cells(car)).collect(),
        ),
        Report::ComponentGroups(groups) => {
            let mut columns = vec!["component"];
            columns.extend(CAR_COLUMNS);
            let rows: Vec<Vec<String>> = ranked_groups(groups)
                .into_iter()
                .flat_map(|(component, cars)| {
                    cars.iter().map(move |car| {
                        let mut row = vec![component.to_string()];
                        row.extend(car_cells(car));
                        row
                    })
                })
                .collect();
            (columns, rows)
        }
        Report::Statistics(stats) => (
            vec!["statistic", "value"],
            vec![
                vec!["avg price".to_string(), stats.avg_price.to_string()],
                vec!["min price".to_string(), stats.min_price.to_string()],
                vec!["max price".to_string(), stats.max_price.to_string()],
                vec!["avg mileage".to_string(), format!("{:.2}", stats.avg_mileage)],
                vec!["min mileage".to_string(), stats.min_mileage.to_string()],
                vec!["max mileage".to_string(), stats.max_mileage.to_string()],
            ],
        ),
    }
}

fn car_cells(car: &Car) -> Vec<String> {
    vec![
        car.model().to_string(),
        car.price().to_string(),
        car.color().to_string(),
        car.mileage().to_string(),
        car.components().join(", "),
    ]
}

fn compute_widths(
    columns: &[&str],
    rows: &[Vec<String>],
) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .fold(column.len(), usize::max)
        })
        .collect()
}

fn format_row(
    cells: &[String],
    widths: &[usize],
) -> String {
    let mut out = String::new();
    out.push('|');
    for (cell, width) in cells.iter().zip(widths) {
        out.push(' ');
        out.push_str(cell);
        let padding = width.saturating_sub(cell.chars().count());
        out.extend(std::iter::repeat_n(' ', padding));
        out.push_str(" |");
    }
    out
}

fn format_separator(widths: &[usize]) -> String {
    let mut out = String::new();
    out.push('|');
    for width in widths {
        out.push(' ');
        out.extend(std::iter::repeat_n('-', *width));
        out.push_str(" |");
    }
    out
}
