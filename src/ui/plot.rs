use std::hash::Hash;
use std::ops::RangeInclusive;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

use crate::color::{ramp_for, ColorMap};
use crate::report::{Chart, Coloring, Point, Series};

const PLOT_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Chart rendering
// ---------------------------------------------------------------------------

/// Render one chart. Categories sit at integer positions along the category
/// axis and are labelled through the axis formatter.
pub fn chart(ui: &mut Ui, id: impl Hash, chart: &Chart) {
    match chart {
        Chart::Bars {
            x_label,
            y_label,
            points,
            horizontal,
            coloring,
        } => bars(ui, id, x_label, y_label, points, *horizontal, *coloring),
        Chart::GroupedBars {
            x_label,
            y_label,
            categories,
            series,
        } => grouped_bars(ui, id, x_label, y_label, categories, series),
        Chart::Line {
            x_label,
            y_label,
            points,
        } => line(ui, id, x_label, y_label, points),
    }
}

/// Axis formatter printing `labels[i]` at position `i` and nothing elsewhere.
fn category_formatter(
    labels: Vec<String>,
) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String + 'static {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let pos = mark.value.round();
        if (mark.value - pos).abs() > 1e-6 || pos < 0.0 {
            return String::new();
        }
        labels.get(pos as usize).cloned().unwrap_or_default()
    }
}

macro_rules! base_plot {
    ($id:expr, $x_label:expr, $y_label:expr) => {
        Plot::new($id)
            .height(PLOT_HEIGHT)
            .x_axis_label($x_label.to_string())
            .y_axis_label($y_label.to_string())
            .allow_scroll(false)
            .allow_drag(false)
            .allow_boxed_zoom(true)
    };
}

fn bars(
    ui: &mut Ui,
    id: impl Hash,
    x_label: &str,
    y_label: &str,
    points: &[Point],
    horizontal: bool,
    coloring: Coloring,
) {
    let values: Vec<f64> = points.iter().map(|(_, v)| *v).collect();
    let colors: Vec<Color32> = match coloring {
        Coloring::Single => vec![Color32::LIGHT_BLUE; points.len()],
        Coloring::ByLabel => {
            let cm = ColorMap::new(points.iter().map(|(label, _)| label.as_str()));
            points.iter().map(|(label, _)| cm.color_for(label)).collect()
        }
        Coloring::ByValue => ramp_for(&values),
    };

    // Horizontal charts list the first category at the top.
    let n = points.len();
    let position = |i: usize| if horizontal { (n - 1 - i) as f64 } else { i as f64 };
    let mut axis_labels = vec![String::new(); n];
    for (i, (label, _)) in points.iter().enumerate() {
        axis_labels[position(i) as usize] = label.clone();
    }

    let bars: Vec<Bar> = points
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, ((label, value), color))| {
            Bar::new(position(i), *value)
                .name(label)
                .fill(color)
                .width(0.7)
        })
        .collect();

    let mut chart = BarChart::new(bars);
    let mut plot = base_plot!(id, x_label, y_label);
    if horizontal {
        chart = chart.horizontal();
        plot = plot.y_axis_formatter(category_formatter(axis_labels));
    } else {
        plot = plot.x_axis_formatter(category_formatter(axis_labels));
    }

    plot.show(ui, |plot_ui| {
        plot_ui.bar_chart(chart);
    });
}

fn grouped_bars(
    ui: &mut Ui,
    id: impl Hash,
    x_label: &str,
    y_label: &str,
    categories: &[String],
    series: &[Series],
) {
    let cm = ColorMap::new(series.iter().map(|s| s.name.as_str()));
    let groups = series.len().max(1) as f64;
    let width = 0.8 / groups;

    let charts: Vec<BarChart> = series
        .iter()
        .enumerate()
        .map(|(s, serie)| {
            let offset = (s as f64 - (groups - 1.0) / 2.0) * width;
            let color = cm.color_for(&serie.name);
            let bars = serie
                .values
                .iter()
                .enumerate()
                .filter_map(|(c, value)| {
                    let value = (*value)?;
                    Some(
                        Bar::new(c as f64 + offset, value)
                            .name(format!("{} · {}", categories[c], serie.name))
                            .width(width)
                            .fill(color),
                    )
                })
                .collect();
            BarChart::new(bars).name(&serie.name).color(color)
        })
        .collect();

    base_plot!(id, x_label, y_label)
        .legend(Legend::default())
        .x_axis_formatter(category_formatter(categories.to_vec()))
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

fn line(ui: &mut Ui, id: impl Hash, x_label: &str, y_label: &str, points: &[Point]) {
    let xy: Vec<[f64; 2]> = points
        .iter()
        .enumerate()
        .map(|(i, (_, v))| [i as f64, *v])
        .collect();
    let labels: Vec<String> = points.iter().map(|(label, _)| label.clone()).collect();

    let line = Line::new(xy.iter().copied().collect::<PlotPoints>())
        .color(Color32::LIGHT_BLUE)
        .width(2.0);
    let markers = Points::new(xy.into_iter().collect::<PlotPoints>())
        .color(Color32::LIGHT_BLUE)
        .radius(4.0);

    base_plot!(id, x_label, y_label)
        .x_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            plot_ui.line(line);
            plot_ui.points(markers);
        });
}
