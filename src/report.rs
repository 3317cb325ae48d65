//! Per-tab reports. Each KPI and chart declares the columns it reads; the
//! orchestrator checks them against the loaded table and skips whatever
//! cannot be produced, so one missing column never takes down a whole tab.

use std::collections::BTreeSet;

use crate::data::aggregate::{self, AggregateError, TOP_N};
use crate::data::model::{CellValue, Table};
use crate::data::schema::{columns, DatasetKind};

// ---------------------------------------------------------------------------
// Report types consumed by the UI
// ---------------------------------------------------------------------------

/// How bars are coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coloring {
    Single,
    /// One palette colour per label.
    ByLabel,
    /// Colour ramp over the bar heights.
    ByValue,
}

/// A labelled series point.
pub type Point = (String, f64);

/// One group of a grouped bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    /// One value per category; `None` means no bar.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Bars {
        x_label: String,
        y_label: String,
        points: Vec<Point>,
        horizontal: bool,
        coloring: Coloring,
    },
    GroupedBars {
        x_label: String,
        y_label: String,
        categories: Vec<String>,
        series: Vec<Series>,
    },
    Line {
        x_label: String,
        y_label: String,
        points: Vec<Point>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartOutput {
    pub title: &'static str,
    pub caption: Option<&'static str>,
    pub chart: Result<Chart, AggregateError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Kpi {
    pub label: &'static str,
    pub value: String,
}

/// Everything one tab shows, computed from the loaded table.
#[derive(Debug, Clone, PartialEq)]
pub struct TabReport {
    pub kind: DatasetKind,
    pub preview: Table,
    pub kpis: Vec<Kpi>,
    pub charts: Vec<ChartOutput>,
    /// Titles of KPIs and charts left out for missing columns.
    pub skipped: Vec<&'static str>,
}

// ---------------------------------------------------------------------------
// Requirement/producer pairs
// ---------------------------------------------------------------------------

pub struct KpiSpec {
    pub label: &'static str,
    pub required: &'static [&'static str],
    pub produce: fn(&Table) -> Option<String>,
}

pub struct ChartSpec {
    pub title: &'static str,
    pub caption: Option<&'static str>,
    pub required: &'static [&'static str],
    pub produce: fn(&Table) -> Option<Result<Chart, AggregateError>>,
}

static DETAIL_KPIS: [KpiSpec; 4] = [
    KpiSpec {
        label: "Total Alquileres",
        required: &[],
        produce: |t| Some(aggregate::count_rows(t).to_string()),
    },
    KpiSpec {
        label: "Categorías Únicas",
        required: &[columns::CATEGORY],
        produce: |t| aggregate::count_distinct(t, columns::CATEGORY).map(|n| n.to_string()),
    },
    KpiSpec {
        label: "Día con más alquileres",
        required: &[columns::WEEKDAY],
        produce: |t| {
            let (day, n) = aggregate::weekday_frequency(t, columns::WEEKDAY)?.busiest?;
            Some(format!("{day} ({n})"))
        },
    },
    KpiSpec {
        label: "Día con menos alquileres",
        required: &[columns::WEEKDAY],
        produce: |t| {
            let (day, n) = aggregate::weekday_frequency(t, columns::WEEKDAY)?.quietest?;
            Some(format!("{day} ({n})"))
        },
    },
];

static DETAIL_CHARTS: [ChartSpec; 4] = [
    ChartSpec {
        title: "Frecuencia de Alquileres por Hora del Día",
        caption: Some("Insight: Las horas pico de alquileres se concentran entre 14:00 y 21:00 horas."),
        required: &[columns::HOUR],
        produce: hourly_chart,
    },
    ChartSpec {
        title: "Distribución de Alquileres por Género Estimado",
        caption: Some("Insight: Predomina el género masculino en las estimaciones."),
        required: &[columns::GENDER],
        produce: gender_chart,
    },
    ChartSpec {
        title: "Categorías por Género Estimado",
        caption: Some("Insight: Acción, Animación y Sports dominan el top de categorías."),
        required: &[columns::CATEGORY, columns::GENDER],
        produce: category_gender_chart,
    },
    ChartSpec {
        title: "Alquileres por Día de la Semana",
        caption: Some(
            "Insight: Los fines de semana muestran mayor actividad, pero se observa un pico de alquileres el día Martes.",
        ),
        required: &[columns::WEEKDAY],
        produce: weekday_chart,
    },
];

static MONTHLY_CHARTS: [ChartSpec; 1] = [ChartSpec {
    title: "Total de Alquileres por Mes",
    caption: None,
    required: &[columns::MONTH, columns::TOTAL_RENTALS],
    produce: monthly_chart,
}];

static CUSTOMER_CHARTS: [ChartSpec; 1] = [ChartSpec {
    title: "Top 10 Clientes por Gasto Total",
    caption: None,
    required: &[columns::CUSTOMER, columns::TOTAL_SPEND],
    produce: |t| ranking_chart(t, columns::CUSTOMER, columns::TOTAL_SPEND),
}];

static MOVIE_CHARTS: [ChartSpec; 1] = [ChartSpec {
    title: "Top 10 Películas por Ingresos",
    caption: None,
    required: &[columns::MOVIE, columns::REVENUE],
    produce: |t| ranking_chart(t, columns::MOVIE, columns::REVENUE),
}];

static STORE_CHARTS: [ChartSpec; 1] = [ChartSpec {
    title: "Ingresos por Categoría y Tienda",
    caption: None,
    required: &[columns::CATEGORY, columns::STORE, columns::REVENUE],
    produce: store_pivot_chart,
}];

pub fn kpi_specs(kind: DatasetKind) -> &'static [KpiSpec] {
    match kind {
        DatasetKind::RentalDetail => &DETAIL_KPIS,
        _ => &[],
    }
}

pub fn chart_specs(kind: DatasetKind) -> &'static [ChartSpec] {
    match kind {
        DatasetKind::RentalDetail => &DETAIL_CHARTS,
        DatasetKind::MonthlyCategory => &MONTHLY_CHARTS,
        DatasetKind::FrequentCustomers => &CUSTOMER_CHARTS,
        DatasetKind::TopMovies => &MOVIE_CHARTS,
        DatasetKind::StoreRevenue => &STORE_CHARTS,
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Evaluate every KPI and chart of `kind` against `table`, in order.
pub fn build_report(kind: DatasetKind, table: &Table, preview_rows: usize) -> TabReport {
    let mut report = TabReport {
        kind,
        preview: table.head(preview_rows),
        kpis: Vec::new(),
        charts: Vec::new(),
        skipped: Vec::new(),
    };

    for spec in kpi_specs(kind) {
        let value = table
            .has_columns(spec.required)
            .then(|| (spec.produce)(table))
            .flatten();
        match value {
            Some(value) => report.kpis.push(Kpi {
                label: spec.label,
                value,
            }),
            None => {
                log::debug!("{}: skipping KPI '{}'", kind.title(), spec.label);
                report.skipped.push(spec.label);
            }
        }
    }

    for spec in chart_specs(kind) {
        if !table.has_columns(spec.required) {
            log::debug!(
                "{}: skipping chart '{}', needs columns {:?}",
                kind.title(),
                spec.title,
                spec.required
            );
            report.skipped.push(spec.title);
            continue;
        }
        match (spec.produce)(table) {
            Some(chart) => {
                if let Err(e) = &chart {
                    log::error!("{}: chart '{}' failed: {e}", kind.title(), spec.title);
                }
                report.charts.push(ChartOutput {
                    title: spec.title,
                    caption: spec.caption,
                    chart,
                });
            }
            None => report.skipped.push(spec.title),
        }
    }

    report
}

// ---------------------------------------------------------------------------
// Producers
// ---------------------------------------------------------------------------

fn counts_to_points(counts: Vec<(CellValue, usize)>) -> Vec<Point> {
    counts
        .into_iter()
        .map(|(label, n)| (label.to_string(), n as f64))
        .collect()
}

fn hourly_chart(t: &Table) -> Option<Result<Chart, AggregateError>> {
    let counts = aggregate::counts_by_key(t, columns::HOUR)?;
    Some(Ok(Chart::Bars {
        x_label: "Hora".into(),
        y_label: "Cantidad de Alquileres".into(),
        points: counts_to_points(counts),
        horizontal: false,
        coloring: Coloring::ByValue,
    }))
}

fn gender_chart(t: &Table) -> Option<Result<Chart, AggregateError>> {
    let counts = aggregate::value_counts(t, columns::GENDER)?;
    Some(Ok(Chart::Bars {
        x_label: "Género".into(),
        y_label: "Cantidad".into(),
        points: counts_to_points(counts),
        horizontal: false,
        coloring: Coloring::ByLabel,
    }))
}

fn category_gender_chart(t: &Table) -> Option<Result<Chart, AggregateError>> {
    let pairs = aggregate::cross_tab(t, columns::CATEGORY, columns::GENDER)?;
    let categories: BTreeSet<&CellValue> = pairs.iter().map(|(c, _, _)| c).collect();
    let genders: BTreeSet<&CellValue> = pairs.iter().map(|(_, g, _)| g).collect();
    let categories: Vec<&CellValue> = categories.into_iter().collect();

    let series = genders
        .into_iter()
        .map(|gender| Series {
            name: gender.to_string(),
            values: categories
                .iter()
                .map(|cat| {
                    pairs
                        .iter()
                        .find(|(c, g, _)| c == *cat && g == gender)
                        .map(|(_, _, n)| *n as f64)
                })
                .collect(),
        })
        .collect();

    Some(Ok(Chart::GroupedBars {
        x_label: "Categoría".into(),
        y_label: "Cantidad de Alquileres".into(),
        categories: categories.iter().map(|c| c.to_string()).collect(),
        series,
    }))
}

fn weekday_chart(t: &Table) -> Option<Result<Chart, AggregateError>> {
    let ordered = aggregate::weekday_ordered(t, columns::WEEKDAY)?;
    Some(Ok(Chart::Bars {
        x_label: "Cantidad".into(),
        y_label: "Día".into(),
        points: ordered
            .into_iter()
            .map(|(day, n)| (day.to_string(), n as f64))
            .collect(),
        horizontal: true,
        coloring: Coloring::ByValue,
    }))
}

fn monthly_chart(t: &Table) -> Option<Result<Chart, AggregateError>> {
    let totals = aggregate::grouped_sum(t, columns::MONTH, columns::TOTAL_RENTALS)?;
    Some(totals.map(|totals| Chart::Line {
        x_label: "Mes".into(),
        y_label: "Total de Alquileres".into(),
        points: totals
            .into_iter()
            .map(|(month, total)| (month.to_string(), total))
            .collect(),
    }))
}

fn ranking_chart(t: &Table, key: &str, metric: &str) -> Option<Result<Chart, AggregateError>> {
    let top = aggregate::top_n(t, key, metric, TOP_N)?;
    Some(Ok(Chart::Bars {
        x_label: key.into(),
        y_label: metric.into(),
        points: top
            .into_iter()
            .map(|(label, value)| (label.to_string(), value))
            .collect(),
        horizontal: false,
        coloring: Coloring::Single,
    }))
}

fn store_pivot_chart(t: &Table) -> Option<Result<Chart, AggregateError>> {
    let pivot = aggregate::pivot(t, columns::CATEGORY, columns::STORE, columns::REVENUE)?;
    Some(pivot.map(|p| Chart::GroupedBars {
        x_label: columns::CATEGORY.into(),
        y_label: columns::REVENUE.into(),
        categories: p.row_keys.iter().map(|k| k.to_string()).collect(),
        series: p
            .column_keys
            .iter()
            .enumerate()
            .map(|(c, store)| Series {
                name: format!("{} {store}", columns::STORE),
                values: p.column_values(c).collect(),
            })
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::from(s)
    }

    fn detail(columns: &[&str]) -> Table {
        let full = ["categoria", "weekday", "hour", "genero_estimado"];
        let rows = vec![
            vec![text("Action"), text("Monday"), CellValue::Integer(10), text("M")],
            vec![text("Comedy"), text("Monday"), CellValue::Integer(14), text("F")],
            vec![text("Action"), text("Tuesday"), CellValue::Integer(14), text("M")],
        ];
        let keep: Vec<usize> = full
            .iter()
            .enumerate()
            .filter(|(_, c)| columns.contains(*c))
            .map(|(i, _)| i)
            .collect();
        Table::new(
            keep.iter().map(|&i| full[i].to_string()).collect(),
            rows.into_iter()
                .map(|r| keep.iter().map(|&i| r[i].clone()).collect())
                .collect(),
        )
    }

    fn titles(report: &TabReport) -> Vec<&'static str> {
        report.charts.iter().map(|c| c.title).collect()
    }

    #[test]
    fn test_full_detail_report() {
        let t = detail(&["categoria", "weekday", "hour", "genero_estimado"]);
        let report = build_report(DatasetKind::RentalDetail, &t, 5);

        assert_eq!(report.preview.len(), 3);
        assert!(report.skipped.is_empty());
        let kpis: Vec<(&str, &str)> = report
            .kpis
            .iter()
            .map(|k| (k.label, k.value.as_str()))
            .collect();
        assert_eq!(
            kpis,
            vec![
                ("Total Alquileres", "3"),
                ("Categorías Únicas", "2"),
                ("Día con más alquileres", "Monday (2)"),
                ("Día con menos alquileres", "Tuesday (1)"),
            ]
        );
        assert_eq!(report.charts.len(), 4);
        assert!(report.charts.iter().all(|c| c.chart.is_ok()));
    }

    #[test]
    fn test_missing_category_omits_only_category_outputs() {
        let t = detail(&["weekday", "hour", "genero_estimado"]);
        let report = build_report(DatasetKind::RentalDetail, &t, 5);

        assert_eq!(report.skipped, vec!["Categorías Únicas", "Categorías por Género Estimado"]);
        assert_eq!(report.kpis.len(), 3);
        assert_eq!(
            titles(&report),
            vec![
                "Frecuencia de Alquileres por Hora del Día",
                "Distribución de Alquileres por Género Estimado",
                "Alquileres por Día de la Semana",
            ]
        );
    }

    #[test]
    fn test_hour_and_weekday_charts() {
        let t = detail(&["weekday", "hour"]);
        let report = build_report(DatasetKind::RentalDetail, &t, 5);

        let Chart::Bars { points, .. } = report.charts[0].chart.as_ref().unwrap() else {
            panic!("expected bars");
        };
        assert_eq!(points, &vec![("10".to_string(), 1.0), ("14".to_string(), 2.0)]);

        let Chart::Bars {
            points, horizontal, ..
        } = report.charts[1].chart.as_ref().unwrap()
        else {
            panic!("expected bars");
        };
        assert!(*horizontal);
        assert_eq!(points.len(), 7);
        assert_eq!(points[0], ("Monday".to_string(), 2.0));
        assert_eq!(points[2], ("Wednesday".to_string(), 0.0));
    }

    #[test]
    fn test_category_gender_grouped_bars() {
        let t = detail(&["categoria", "genero_estimado"]);
        let report = build_report(DatasetKind::RentalDetail, &t, 5);
        let chart = report
            .charts
            .iter()
            .find(|c| c.title == "Categorías por Género Estimado")
            .unwrap();
        let Chart::GroupedBars {
            categories, series, ..
        } = chart.chart.as_ref().unwrap()
        else {
            panic!("expected grouped bars");
        };
        assert_eq!(categories, &vec!["Action".to_string(), "Comedy".to_string()]);
        assert_eq!(
            series,
            &vec![
                Series {
                    name: "F".into(),
                    values: vec![None, Some(1.0)]
                },
                Series {
                    name: "M".into(),
                    values: vec![Some(2.0), None]
                },
            ]
        );
    }

    #[test]
    fn test_monthly_line() {
        let t = Table::new(
            vec!["mes".into(), "total_alquileres".into(), "categoria".into()],
            vec![
                vec![CellValue::Integer(1), CellValue::Integer(5), text("Action")],
                vec![CellValue::Integer(1), CellValue::Integer(3), text("Drama")],
                vec![CellValue::Integer(2), CellValue::Integer(7), text("Action")],
            ],
        );
        let report = build_report(DatasetKind::MonthlyCategory, &t, 2);
        assert_eq!(report.preview.len(), 2);
        assert!(report.kpis.is_empty());
        assert_eq!(
            report.charts[0].chart,
            Ok(Chart::Line {
                x_label: "Mes".into(),
                y_label: "Total de Alquileres".into(),
                points: vec![("1".into(), 8.0), ("2".into(), 7.0)],
            })
        );
    }

    #[test]
    fn test_ranking_is_capped() {
        let rows = (0..25)
            .map(|i| vec![text(&format!("cliente {i}")), CellValue::Float(i as f64)])
            .collect();
        let t = Table::new(vec!["cliente".into(), "total_gasto".into()], rows);
        let report = build_report(DatasetKind::FrequentCustomers, &t, 5);
        let Chart::Bars { points, .. } = report.charts[0].chart.as_ref().unwrap() else {
            panic!("expected bars");
        };
        assert_eq!(points.len(), TOP_N);
        assert_eq!(points[0], ("cliente 24".to_string(), 24.0));
    }

    #[test]
    fn test_store_pivot_and_duplicate_error() {
        let mut rows = vec![
            vec![text("Action"), CellValue::Integer(1), CellValue::Float(100.0)],
            vec![text("Action"), CellValue::Integer(2), CellValue::Float(80.0)],
            vec![text("Games"), CellValue::Integer(2), CellValue::Float(40.0)],
        ];
        let columns = vec!["categoria".to_string(), "tienda".into(), "ingresos".into()];
        let t = Table::new(columns.clone(), rows.clone());
        let report = build_report(DatasetKind::StoreRevenue, &t, 5);
        let Chart::GroupedBars { series, .. } = report.charts[0].chart.as_ref().unwrap() else {
            panic!("expected grouped bars");
        };
        assert_eq!(series[0].name, "tienda 1");
        assert_eq!(series[0].values, vec![Some(100.0), None]);
        assert_eq!(series[1].values, vec![Some(80.0), Some(40.0)]);

        rows.push(vec![text("Games"), CellValue::Integer(2), CellValue::Float(1.0)]);
        let report = build_report(DatasetKind::StoreRevenue, &Table::new(columns, rows), 5);
        assert!(matches!(
            report.charts[0].chart,
            Err(AggregateError::DuplicatePivotEntry { .. })
        ));
    }

    #[test]
    fn test_missing_metric_skips_ranking() {
        let t = Table::new(vec!["pelicula".into()], vec![vec![text("ACADEMY DINOSAUR")]]);
        let report = build_report(DatasetKind::TopMovies, &t, 5);
        assert!(report.charts.is_empty());
        assert_eq!(report.skipped, vec!["Top 10 Películas por Ingresos"]);
        assert_eq!(report.preview.len(), 1);
    }

    #[test]
    fn test_report_is_deterministic() {
        let t = detail(&["categoria", "weekday", "hour", "genero_estimado"]);
        assert_eq!(
            build_report(DatasetKind::RentalDetail, &t, 5),
            build_report(DatasetKind::RentalDetail, &t, 5)
        );
    }
}
