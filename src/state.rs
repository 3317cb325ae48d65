use crate::data::loader::DataLoader;
use crate::data::schema::DatasetKind;
use crate::report::{build_report, TabReport};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Owner of the cached extracts.
    pub loader: DataLoader,

    /// Tab currently shown.
    pub active_tab: DatasetKind,

    /// Report for `active_tab`, rebuilt every time a tab is opened.
    pub report: Option<TabReport>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Start on the first tab.
    pub fn new(loader: DataLoader) -> Self {
        let mut state = Self {
            loader,
            active_tab: DatasetKind::RentalDetail,
            report: None,
            status_message: None,
        };
        state.refresh();
        state
    }

    /// Switch tabs and recompute the new tab's report.
    pub fn select_tab(&mut self, kind: DatasetKind) {
        if self.active_tab != kind || self.report.is_none() {
            self.active_tab = kind;
            self.refresh();
        }
    }

    /// Recompute the active report from the cached snapshot.
    pub fn refresh(&mut self) {
        let preview_rows = self.loader.config().preview_rows;
        match self.loader.load() {
            Ok(datasets) => {
                let table = datasets.get(self.active_tab);
                self.report = Some(build_report(self.active_tab, table, preview_rows));
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load extracts: {e:#}");
                self.report = None;
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;

    #[test]
    fn test_tab_switch_rebuilds_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig {
            data_dir: dir.path().to_path_buf(),
            ..DashboardConfig::default()
        };
        for kind in DatasetKind::ALL {
            std::fs::write(config.path_for(kind), "cliente,total_gasto\nMARY SMITH,118.68\n")
                .unwrap();
        }

        let mut state = AppState::new(DataLoader::new(config));
        assert_eq!(state.report.as_ref().map(|r| r.kind), Some(DatasetKind::RentalDetail));
        assert_eq!(state.report.as_ref().map(|r| r.kpis.len()), Some(1));

        state.select_tab(DatasetKind::FrequentCustomers);
        let report = state.report.as_ref().unwrap();
        assert_eq!(report.kind, DatasetKind::FrequentCustomers);
        assert_eq!(report.charts.len(), 1);
    }

    #[test]
    fn test_load_failure_sets_status() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig {
            data_dir: dir.path().to_path_buf(),
            ..DashboardConfig::default()
        };
        let state = AppState::new(DataLoader::new(config));
        assert!(state.report.is_none());
        assert!(state.status_message.unwrap().starts_with("Error:"));
    }
}
