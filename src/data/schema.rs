//! The five extracts the dashboard reads, their files, tab titles and the
//! column names the aggregations look for.

/// One of the five CSV extracts. Also identifies the dashboard tab showing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DatasetKind {
    RentalDetail,
    MonthlyCategory,
    FrequentCustomers,
    TopMovies,
    StoreRevenue,
}

impl DatasetKind {
    /// Tab order.
    pub const ALL: [DatasetKind; 5] = [
        DatasetKind::RentalDetail,
        DatasetKind::MonthlyCategory,
        DatasetKind::FrequentCustomers,
        DatasetKind::TopMovies,
        DatasetKind::StoreRevenue,
    ];

    pub fn default_file_name(self) -> &'static str {
        match self {
            DatasetKind::RentalDetail => "detalle_alquileres_limpio.csv",
            DatasetKind::MonthlyCategory => "alquileres_por_mes_categoria_limpio.csv",
            DatasetKind::FrequentCustomers => "clientes_mas_frecuentes_limpio.csv",
            DatasetKind::TopMovies => "peliculas_mas_rentables_limpio.csv",
            DatasetKind::StoreRevenue => "ingresos_por_tienda_categoria_limpio.csv",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            DatasetKind::RentalDetail => "Detalle Alquileres",
            DatasetKind::MonthlyCategory => "Alquileres por Mes y Categoría",
            DatasetKind::FrequentCustomers => "Clientes Más Frecuentes",
            DatasetKind::TopMovies => "Películas Más Rentables",
            DatasetKind::StoreRevenue => "Ingresos por Tienda y Categoría",
        }
    }
}

/// Column names as they appear in the CSV headers.
pub mod columns {
    pub const CATEGORY: &str = "categoria";
    pub const WEEKDAY: &str = "weekday";
    pub const HOUR: &str = "hour";
    pub const GENDER: &str = "genero_estimado";
    pub const MONTH: &str = "mes";
    pub const TOTAL_RENTALS: &str = "total_alquileres";
    pub const CUSTOMER: &str = "cliente";
    pub const TOTAL_SPEND: &str = "total_gasto";
    pub const MOVIE: &str = "pelicula";
    pub const REVENUE: &str = "ingresos";
    pub const STORE: &str = "tienda";
}
