use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};

use super::model::{CellValue, Table};
use super::schema::DatasetKind;
use crate::config::DashboardConfig;

// ---------------------------------------------------------------------------
// Datasets – the loaded snapshot
// ---------------------------------------------------------------------------

/// The five extracts, loaded once and never mutated.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub rental_detail: Table,
    pub monthly_category: Table,
    pub frequent_customers: Table,
    pub top_movies: Table,
    pub store_revenue: Table,
}

impl Datasets {
    pub fn get(&self, kind: DatasetKind) -> &Table {
        match kind {
            DatasetKind::RentalDetail => &self.rental_detail,
            DatasetKind::MonthlyCategory => &self.monthly_category,
            DatasetKind::FrequentCustomers => &self.frequent_customers,
            DatasetKind::TopMovies => &self.top_movies,
            DatasetKind::StoreRevenue => &self.store_revenue,
        }
    }
}

// ---------------------------------------------------------------------------
// DataLoader – explicit owner of the cached snapshot
// ---------------------------------------------------------------------------

/// Reads the five extracts on first use and hands out the same snapshot
/// afterwards. Construct once at start-up and pass by reference.
#[derive(Debug)]
pub struct DataLoader {
    config: DashboardConfig,
    cache: OnceLock<Datasets>,
}

impl DataLoader {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            cache: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Return the cached snapshot, reading the files on the first call.
    /// Any missing or malformed file fails the whole load.
    pub fn load(&self) -> Result<&Datasets> {
        if let Some(cached) = self.cache.get() {
            return Ok(cached);
        }

        let read = |kind: DatasetKind| -> Result<Table> {
            let path = self.config.path_for(kind);
            let table = load_csv(&path)
                .with_context(|| format!("loading {} from {}", kind.title(), path.display()))?;
            log::info!(
                "Loaded {} rows from {} with columns {:?}",
                table.len(),
                path.display(),
                table.columns()
            );
            Ok(table)
        };

        let datasets = Datasets {
            rental_detail: read(DatasetKind::RentalDetail)?,
            monthly_category: read(DatasetKind::MonthlyCategory)?,
            frequent_customers: read(DatasetKind::FrequentCustomers)?,
            top_movies: read(DatasetKind::TopMovies)?,
            store_revenue: read(DatasetKind::StoreRevenue)?,
        };
        Ok(self.cache.get_or_init(|| datasets))
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per line.
/// Field types are inferred per cell (see [`CellValue::parse`]).
pub fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(CellValue::parse).collect());
    }

    Ok(Table::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatasetFiles;
    use std::path::PathBuf;

    fn write_all(dir: &Path) {
        let files = DatasetFiles::default();
        std::fs::write(
            dir.join(&files.rental_detail),
            "categoria,weekday,hour,genero_estimado\nAction,Monday,10,M\nComedy,Tuesday,14,F\n",
        )
        .unwrap();
        std::fs::write(
            dir.join(&files.monthly_category),
            "mes,total_alquileres,categoria\n1,5,Action\n",
        )
        .unwrap();
        std::fs::write(
            dir.join(&files.frequent_customers),
            "cliente,total_gasto\nELEANOR HUNT,211.55\n",
        )
        .unwrap();
        std::fs::write(
            dir.join(&files.top_movies),
            "pelicula,ingresos\nTELEGRAPH VOYAGE,231.73\n",
        )
        .unwrap();
        std::fs::write(
            dir.join(&files.store_revenue),
            "categoria,tienda,ingresos\nAction,1,2000.5\n",
        )
        .unwrap();
    }

    fn config_for(dir: &Path) -> DashboardConfig {
        DashboardConfig {
            data_dir: PathBuf::from(dir),
            ..DashboardConfig::default()
        }
    }

    #[test]
    fn test_load_csv_infers_cells() {
        let dir = tempfile::tempdir().unwrap();
        write_all(dir.path());
        let table = load_csv(&dir.path().join("detalle_alquileres_limpio.csv")).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.columns(), ["categoria", "weekday", "hour", "genero_estimado"]);
        assert_eq!(table.rows()[1][2], CellValue::Integer(14));
        assert_eq!(table.rows()[0][1], CellValue::from("Monday"));
    }

    #[test]
    fn test_load_reads_all_five() {
        let dir = tempfile::tempdir().unwrap();
        write_all(dir.path());
        let loader = DataLoader::new(config_for(dir.path()));
        let ds = loader.load().unwrap();
        for kind in DatasetKind::ALL {
            assert_eq!(ds.get(kind).len(), if kind == DatasetKind::RentalDetail { 2 } else { 1 });
        }
    }

    #[test]
    fn test_second_load_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        write_all(dir.path());
        let loader = DataLoader::new(config_for(dir.path()));
        let first = loader.load().unwrap() as *const Datasets;

        // Files are gone, but the snapshot is already held.
        for kind in DatasetKind::ALL {
            std::fs::remove_file(loader.config().path_for(kind)).unwrap();
        }
        let second = loader.load().unwrap() as *const Datasets;
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_all(dir.path());
        std::fs::remove_file(dir.path().join("peliculas_mas_rentables_limpio.csv")).unwrap();

        let loader = DataLoader::new(config_for(dir.path()));
        let err = loader.load().unwrap_err();
        assert!(format!("{err:#}").contains("Películas Más Rentables"));
    }

    #[test]
    fn test_malformed_row_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "cliente,total_gasto\nA,1.0,extra\n").unwrap();
        let err = load_csv(&path).unwrap_err();
        assert!(format!("{err:#}").contains("CSV row 0"));
    }
}
