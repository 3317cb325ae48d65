use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Table;
use crate::data::schema::DatasetKind;
use crate::report::{Kpi, TabReport};
use crate::state::AppState;
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Top bar – title and tab strip
// ---------------------------------------------------------------------------

/// Render the title and the five tab selectors.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Dashboard - Análisis de la Base Sakila");
    ui.label("Explora los reportes organizados por pestañas. Selecciona el análisis que deseas visualizar.");
    ui.add_space(4.0);

    ui.horizontal(|ui: &mut Ui| {
        for kind in DatasetKind::ALL {
            if ui
                .selectable_label(state.active_tab == kind, kind.title())
                .clicked()
            {
                state.select_tab(kind);
            }
        }
    });

    if let Some(msg) = &state.status_message {
        ui.label(RichText::new(msg).color(Color32::RED));
    }
}

// ---------------------------------------------------------------------------
// Central panel – one tab
// ---------------------------------------------------------------------------

/// Render the active tab: preview, KPI cards, charts.
pub fn tab_view(ui: &mut Ui, state: &AppState) {
    let Some(report) = &state.report else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No data loaded.");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong(report.kind.title());
            preview_table(ui, report.kind, &report.preview);

            if !report.kpis.is_empty() {
                ui.separator();
                ui.strong("KPIs Generales");
                kpi_cards(ui, &report.kpis);
            }

            ui.separator();
            charts(ui, report);
        });
}

/// Raw-data preview: the first rows of the extract.
fn preview_table(ui: &mut Ui, kind: DatasetKind, table: &Table) {
    if table.is_empty() {
        ui.label("El archivo no contiene filas.");
        return;
    }
    ui.push_id(("preview", kind), |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(false)
            .columns(Column::auto().at_least(80.0), table.columns().len())
            .header(20.0, |mut header| {
                for name in table.columns() {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|mut body| {
                for row in table.rows() {
                    body.row(18.0, |mut cells| {
                        for cell in row {
                            cells.col(|ui: &mut Ui| {
                                ui.label(cell.to_string());
                            });
                        }
                    });
                }
            });
    });
}

fn kpi_cards(ui: &mut Ui, kpis: &[Kpi]) {
    ui.columns(kpis.len(), |columns| {
        for (col, kpi) in columns.iter_mut().zip(kpis) {
            egui::Frame::group(col.style()).show(col, |ui: &mut Ui| {
                ui.vertical_centered(|ui: &mut Ui| {
                    ui.label(kpi.label);
                    ui.heading(&kpi.value);
                });
            });
        }
    });
}

/// Charts two per row, each with its caption.
fn charts(ui: &mut Ui, report: &TabReport) {
    for (row, pair) in report.charts.chunks(2).enumerate() {
        ui.columns(2, |columns| {
            for (i, (col, output)) in columns.iter_mut().zip(pair).enumerate() {
                col.strong(output.title);
                match &output.chart {
                    Ok(chart) => plot::chart(col, ("chart", report.kind, row * 2 + i), chart),
                    Err(e) => {
                        col.label(RichText::new(format!("Error: {e}")).color(Color32::RED));
                    }
                }
                if let Some(caption) = output.caption {
                    col.small(caption);
                }
            }
        });
        ui.add_space(8.0);
    }
}
