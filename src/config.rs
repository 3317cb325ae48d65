use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::schema::DatasetKind;

/// Optional config file looked up in the working directory.
pub const CONFIG_FILE: &str = "dashboard.json";

// ---------------------------------------------------------------------------
// DashboardConfig
// ---------------------------------------------------------------------------

/// Runtime settings. Every field has a default, so a missing `dashboard.json`
/// (or a partial one) behaves like the fixed file layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Directory the five CSV extracts are read from.
    pub data_dir: PathBuf,
    pub files: DatasetFiles,
    /// Rows shown in each raw-data preview.
    pub preview_rows: usize,
    pub window_size: [f32; 2],
}

/// File name per extract, relative to `data_dir`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatasetFiles {
    pub rental_detail: String,
    pub monthly_category: String,
    pub frequent_customers: String,
    pub top_movies: String,
    pub store_revenue: String,
}

impl Default for DatasetFiles {
    fn default() -> Self {
        Self {
            rental_detail: DatasetKind::RentalDetail.default_file_name().into(),
            monthly_category: DatasetKind::MonthlyCategory.default_file_name().into(),
            frequent_customers: DatasetKind::FrequentCustomers.default_file_name().into(),
            top_movies: DatasetKind::TopMovies.default_file_name().into(),
            store_revenue: DatasetKind::StoreRevenue.default_file_name().into(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            files: DatasetFiles::default(),
            preview_rows: 5,
            window_size: [1280.0, 900.0],
        }
    }
}

impl DashboardConfig {
    /// Read `path` if it exists, otherwise fall back to defaults.
    /// A file that exists but does not parse is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No {} found, using default configuration", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Full path of one extract.
    pub fn path_for(&self, kind: DatasetKind) -> PathBuf {
        let name = match kind {
            DatasetKind::RentalDetail => &self.files.rental_detail,
            DatasetKind::MonthlyCategory => &self.files.monthly_category,
            DatasetKind::FrequentCustomers => &self.files.frequent_customers,
            DatasetKind::TopMovies => &self.files.top_movies,
            DatasetKind::StoreRevenue => &self.files.store_revenue,
        };
        self.data_dir.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::load_or_default(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(
            config.path_for(DatasetKind::TopMovies),
            PathBuf::from(".").join("peliculas_mas_rentables_limpio.csv")
        );
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            r#"{ "data_dir": "extracts", "files": { "top_movies": "movies.csv" } }"#,
        )
        .unwrap();

        let config = DashboardConfig::load_or_default(&path).unwrap();
        assert_eq!(config.preview_rows, 5);
        assert_eq!(
            config.path_for(DatasetKind::TopMovies),
            PathBuf::from("extracts").join("movies.csv")
        );
        assert_eq!(
            config.path_for(DatasetKind::StoreRevenue),
            PathBuf::from("extracts").join("ingresos_por_tienda_categoria_limpio.csv")
        );
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ preview_rows: ").unwrap();
        let err = DashboardConfig::load_or_default(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config"));
    }
}
