use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

// ---------------------------------------------------------------------------
// CellValue – a single field of a CSV extract
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a CSV column can carry.
/// Aggregations key `BTreeMap`s on cells, so `CellValue` must be `Ord`.
#[derive(Debug, Clone)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Empty field, or a float that is not a number.
    Null,
}

// -- Manual Eq/Ord/Hash so we can group on CellValue --
//
// Integers and floats are one numeric domain: `Integer(14)` and `Float(14.0)`
// are the same key, and `-0.0` equals `0.0`. Eq, Ord and Hash all agree.

/// 2^63, the first float above every `i64`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// The float as an `i64` when it is a whole number that fits.
fn integral(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&f)).then_some(f as i64)
}

fn cmp_int_float(a: i64, b: f64) -> Ordering {
    match integral(b) {
        Some(b) => a.cmp(&b),
        None if b >= I64_BOUND => Ordering::Less,
        None if b < -I64_BOUND => Ordering::Greater,
        // `b` has a fractional part (or is NaN), so `a as f64` cannot tie with it.
        None => (a as f64).total_cmp(&b),
    }
}

fn cmp_floats(a: f64, b: f64) -> Ordering {
    if a == 0.0 && b == 0.0 {
        return Ordering::Equal;
    }
    a.total_cmp(&b)
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use CellValue::*;
        fn rank(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                // Integers and floats share a rank so mixed numeric columns
                // ("14" next to "14.5") still sort by value.
                Integer(_) | Float(_) => 2,
                Text(_) => 3,
            }
        }
        let ra = rank(self);
        let rb = rank(other);
        if ra != rb {
            return ra.cmp(&rb);
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => cmp_floats(*a, *b),
            (Integer(a), Float(b)) => cmp_int_float(*a, *b),
            (Float(a), Integer(b)) => cmp_int_float(*b, *a).reverse(),
            (Text(a), Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            CellValue::Null => 0u8.hash(state),
            CellValue::Bool(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            CellValue::Integer(i) => {
                2u8.hash(state);
                i.hash(state);
            }
            CellValue::Float(f) => match integral(*f) {
                Some(i) => {
                    2u8.hash(state);
                    i.hash(state);
                }
                None => {
                    3u8.hash(state);
                    f.to_bits().hash(state);
                }
            },
            CellValue::Text(s) => {
                4u8.hash(state);
                s.hash(state);
            }
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.2}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Infer the cell type of a raw CSV field: integer, float, bool, text.
    /// "NaN" is a missing value, as in the extracts' pandas origin.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            if f.is_nan() {
                return CellValue::Null;
            }
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::Text(s.to_string())
    }

    /// Numeric view used for metric columns.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Table – one loaded extract
// ---------------------------------------------------------------------------

/// An immutable in-memory table: ordered column names plus row-major cells.
/// Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Build a table, padding short rows with `Null` and truncating long ones.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row
            })
            .collect();
        Table { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// True when every name in `required` is a column of this table.
    pub fn has_columns(&self, required: &[&str]) -> bool {
        required.iter().all(|c| self.has_column(c))
    }

    /// Iterate one column's cells, or `None` if the column is absent.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &CellValue> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Sorted set of distinct non-null values of a column.
    pub fn unique_values(&self, name: &str) -> Option<BTreeSet<CellValue>> {
        Some(self.column(name)?.filter(|v| !v.is_null()).cloned().collect())
    }

    /// The first `n` rows as a new table, for raw-data previews.
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec!["categoria".into(), "hour".into()],
            vec![
                vec!["Action".into(), CellValue::Integer(10)],
                vec!["Comedy".into(), CellValue::Integer(14)],
                vec!["Action".into()],
            ],
        )
    }

    #[test]
    fn test_parse_infers_types() {
        assert_eq!(CellValue::parse("14"), CellValue::Integer(14));
        assert_eq!(CellValue::parse(" 2.99 "), CellValue::Float(2.99));
        assert_eq!(CellValue::parse("true"), CellValue::Bool(true));
        assert_eq!(CellValue::parse("Monday"), CellValue::Text("Monday".into()));
        assert_eq!(CellValue::parse(""), CellValue::Null);
    }

    #[test]
    fn test_mixed_numeric_ordering() {
        let mut vals = vec![
            CellValue::Float(10.5),
            CellValue::Integer(3),
            CellValue::Integer(11),
            CellValue::Null,
        ];
        vals.sort();
        assert_eq!(
            vals,
            vec![
                CellValue::Null,
                CellValue::Integer(3),
                CellValue::Float(10.5),
                CellValue::Integer(11),
            ]
        );
    }

    fn hash_of(v: &CellValue) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        let mut h = DefaultHasher::new();
        v.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_nan_field_is_null() {
        assert_eq!(CellValue::parse("NaN"), CellValue::Null);
        assert_eq!(CellValue::parse("nan"), CellValue::Null);
        assert!(CellValue::parse(" NaN ").is_null());
        assert_eq!(CellValue::parse("inf"), CellValue::Float(f64::INFINITY));
    }

    #[test]
    fn test_integral_float_equals_integer() {
        let i = CellValue::Integer(14);
        let f = CellValue::Float(14.0);
        assert_eq!(i, f);
        assert_eq!(i.cmp(&f), Ordering::Equal);
        assert_eq!(hash_of(&i), hash_of(&f));
        assert_ne!(CellValue::Integer(14), CellValue::Float(14.5));
        assert!(CellValue::Integer(14) < CellValue::Float(14.5));
        assert!(CellValue::Float(13.5) < CellValue::Integer(14));
    }

    #[test]
    fn test_signed_zero_and_nan_are_consistent() {
        let pos = CellValue::Float(0.0);
        let neg = CellValue::Float(-0.0);
        assert_eq!(pos, neg);
        assert_eq!(neg, CellValue::Integer(0));
        assert_eq!(hash_of(&pos), hash_of(&neg));

        let nan = CellValue::Float(f64::NAN);
        assert_eq!(nan, nan.clone());
        assert_eq!(hash_of(&nan), hash_of(&nan.clone()));
        assert!(CellValue::Integer(i64::MAX) < CellValue::Float(f64::INFINITY));
        assert!(CellValue::Float(f64::NEG_INFINITY) < CellValue::Integer(i64::MIN));
        assert!(CellValue::Integer(i64::MAX) < CellValue::Float(9_223_372_036_854_775_808.0));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let t = sample();
        assert_eq!(t.rows()[2], vec![CellValue::from("Action"), CellValue::Null]);
    }

    #[test]
    fn test_column_lookup() {
        let t = sample();
        assert!(t.has_columns(&["categoria", "hour"]));
        assert!(!t.has_columns(&["categoria", "weekday"]));
        assert!(t.column("weekday").is_none());
        assert_eq!(t.column("hour").map(|c| c.count()), Some(3));
    }

    #[test]
    fn test_unique_values_skip_null() {
        let t = sample();
        let hours = t.unique_values("hour").unwrap();
        assert_eq!(hours.len(), 2);
        assert_eq!(t.unique_values("categoria").unwrap().len(), 2);
    }

    #[test]
    fn test_head() {
        let t = sample();
        assert_eq!(t.head(2).len(), 2);
        assert_eq!(t.head(10).len(), 3);
        assert_eq!(t.head(0).columns(), t.columns());
    }
}
