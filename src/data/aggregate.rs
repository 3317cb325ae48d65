//! Pure aggregations turning a [`Table`] into chart-ready series.
//!
//! Every function returns `None` when one of the columns it reads is absent,
//! so callers can skip the chart instead of failing the whole tab.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use thiserror::Error;

use super::model::{CellValue, Table};

/// Rows kept by [`top_n`] callers on the ranking tabs.
pub const TOP_N: usize = 10;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AggregateError {
    #[error("duplicate entry for ({row}, {column}) in pivot")]
    DuplicatePivotEntry { row: String, column: String },
    #[error("non-numeric value '{value}' in column '{column}'")]
    NonNumeric { column: String, value: String },
}

// ---------------------------------------------------------------------------
// Counting
// ---------------------------------------------------------------------------

/// Total number of rows.
pub fn count_rows(table: &Table) -> usize {
    table.len()
}

/// Number of distinct non-null values in `column`.
pub fn count_distinct(table: &Table, column: &str) -> Option<usize> {
    Some(table.unique_values(column)?.len())
}

/// Occurrences of each value, most frequent first. Values with equal counts
/// keep the order in which they first appear. Empty fields are counted under
/// `Null` so the counts always add up to the row count.
pub fn value_counts(table: &Table, column: &str) -> Option<Vec<(CellValue, usize)>> {
    let mut first_seen: Vec<CellValue> = Vec::new();
    let mut counts: HashMap<&CellValue, usize> = HashMap::new();
    for value in table.column(column)? {
        let n = counts.entry(value).or_insert(0);
        if *n == 0 {
            first_seen.push(value.clone());
        }
        *n += 1;
    }
    let mut out: Vec<(CellValue, usize)> = first_seen
        .into_iter()
        .map(|v| {
            let n = counts[&v];
            (v, n)
        })
        .collect();
    // Stable sort keeps first-appearance order among ties.
    out.sort_by(|a, b| b.1.cmp(&a.1));
    Some(out)
}

/// Occurrences of each value, ordered by the value itself.
pub fn counts_by_key(table: &Table, column: &str) -> Option<Vec<(CellValue, usize)>> {
    let mut counts: BTreeMap<&CellValue, usize> = BTreeMap::new();
    for value in table.column(column)? {
        *counts.entry(value).or_insert(0) += 1;
    }
    Some(counts.into_iter().map(|(v, n)| (v.clone(), n)).collect())
}

/// Occurrences of each (`first`, `second`) pair, ordered by `first` then
/// `second`. Feeds grouped bar charts.
pub fn cross_tab(
    table: &Table,
    first: &str,
    second: &str,
) -> Option<Vec<(CellValue, CellValue, usize)>> {
    let a = table.column_index(first)?;
    let b = table.column_index(second)?;
    let mut counts: BTreeMap<(&CellValue, &CellValue), usize> = BTreeMap::new();
    for row in table.rows() {
        *counts.entry((&row[a], &row[b])).or_insert(0) += 1;
    }
    Some(
        counts
            .into_iter()
            .map(|((x, y), n)| (x.clone(), y.clone(), n))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Weekdays
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Canonical display order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Exact English day name, as written in the extract.
    pub fn from_label(label: &CellValue) -> Option<Self> {
        match label {
            CellValue::Text(s) => Self::ALL.into_iter().find(|d| d.name() == s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Weekday counts plus the busiest and quietest label.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekdayFrequency {
    /// Per label, ordered by label.
    pub counts: Vec<(CellValue, usize)>,
    pub busiest: Option<(CellValue, usize)>,
    pub quietest: Option<(CellValue, usize)>,
}

/// Group by weekday label. On equal counts the label that sorts first is
/// reported as busiest/quietest. Empty fields are counted but never reported
/// as busiest or quietest.
pub fn weekday_frequency(table: &Table, column: &str) -> Option<WeekdayFrequency> {
    let counts = counts_by_key(table, column)?;
    let labelled = || counts.iter().filter(|(label, _)| !label.is_null());
    // `max_by` keeps the last maximum, so break ties on the reversed label.
    let busiest = labelled()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .cloned();
    let quietest = labelled().min_by(|a, b| a.1.cmp(&b.1)).cloned();
    Some(WeekdayFrequency {
        counts,
        busiest,
        quietest,
    })
}

/// Weekday counts reindexed onto Monday..Sunday. Days missing from the data
/// are reported with a count of 0; labels that are not day names are ignored.
pub fn weekday_ordered(table: &Table, column: &str) -> Option<Vec<(Weekday, usize)>> {
    let mut counts: HashMap<Weekday, usize> = HashMap::new();
    for value in table.column(column)? {
        if let Some(day) = Weekday::from_label(value) {
            *counts.entry(day).or_insert(0) += 1;
        }
    }
    Some(
        Weekday::ALL
            .into_iter()
            .map(|d| (d, counts.get(&d).copied().unwrap_or(0)))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Sums and rankings
// ---------------------------------------------------------------------------

fn numeric(column: &str, value: &CellValue) -> Result<f64, AggregateError> {
    value.as_f64().ok_or_else(|| AggregateError::NonNumeric {
        column: column.to_string(),
        value: value.to_string(),
    })
}

/// Sum `value` per distinct `key`, ordered by key. Null metrics count as 0;
/// any other non-numeric metric is an error.
pub fn grouped_sum(
    table: &Table,
    key: &str,
    value: &str,
) -> Option<Result<Vec<(CellValue, f64)>, AggregateError>> {
    let k = table.column_index(key)?;
    let v = table.column_index(value)?;
    let mut sums: BTreeMap<&CellValue, f64> = BTreeMap::new();
    for row in table.rows() {
        let amount = match &row[v] {
            CellValue::Null => 0.0,
            other => match numeric(value, other) {
                Ok(x) => x,
                Err(e) => return Some(Err(e)),
            },
        };
        *sums.entry(&row[k]).or_insert(0.0) += amount;
    }
    Some(Ok(sums.into_iter().map(|(k, s)| (k.clone(), s)).collect()))
}

/// The `n` rows with the highest `metric`, descending. Ties keep their
/// original row order. Rows whose metric is not a finite number are left out.
pub fn top_n(table: &Table, key: &str, metric: &str, n: usize) -> Option<Vec<(CellValue, f64)>> {
    let k = table.column_index(key)?;
    let m = table.column_index(metric)?;
    let mut ranked: Vec<(CellValue, f64)> = table
        .rows()
        .iter()
        .filter_map(|row| {
            let amount = row[m].as_f64().filter(|x| x.is_finite())?;
            Some((row[k].clone(), amount))
        })
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(n);
    Some(ranked)
}

// ---------------------------------------------------------------------------
// Pivot
// ---------------------------------------------------------------------------

/// Long-to-wide reshape: one row per `index` value, one column per `columns`
/// value. Missing combinations stay `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    pub row_keys: Vec<CellValue>,
    pub column_keys: Vec<CellValue>,
    /// `cells[r][c]` for `row_keys[r]` × `column_keys[c]`.
    pub cells: Vec<Vec<Option<f64>>>,
}

impl PivotTable {
    #[cfg(test)]
    pub fn get(&self, row: &CellValue, column: &CellValue) -> Option<f64> {
        let r = self.row_keys.iter().position(|k| k == row)?;
        let c = self.column_keys.iter().position(|k| k == column)?;
        self.cells[r][c]
    }

    /// Values of one column key across all rows, in row-key order.
    pub fn column_values(&self, c: usize) -> impl Iterator<Item = Option<f64>> + '_ {
        self.cells.iter().map(move |row| row[c])
    }
}

/// Pivot `table` on (`index`, `columns`) → `values`. Keys are sorted. A repeated
/// (index, columns) pair is an error; a non-numeric value is an error, and an
/// empty value leaves its cell `None`.
pub fn pivot(
    table: &Table,
    index: &str,
    columns: &str,
    values: &str,
) -> Option<Result<PivotTable, AggregateError>> {
    let i = table.column_index(index)?;
    let c = table.column_index(columns)?;
    let v = table.column_index(values)?;
    Some(build_pivot(table, i, c, v, values))
}

fn build_pivot(
    table: &Table,
    i: usize,
    c: usize,
    v: usize,
    value_name: &str,
) -> Result<PivotTable, AggregateError> {
    let mut entries: BTreeMap<(&CellValue, &CellValue), Option<f64>> = BTreeMap::new();
    let mut row_keys: BTreeMap<&CellValue, usize> = BTreeMap::new();
    let mut column_keys: BTreeMap<&CellValue, usize> = BTreeMap::new();

    for row in table.rows() {
        let value = match &row[v] {
            CellValue::Null => None,
            other => Some(numeric(value_name, other)?),
        };
        if entries.insert((&row[i], &row[c]), value).is_some() {
            return Err(AggregateError::DuplicatePivotEntry {
                row: row[i].to_string(),
                column: row[c].to_string(),
            });
        }
        row_keys.insert(&row[i], 0);
        column_keys.insert(&row[c], 0);
    }

    for (pos, slot) in row_keys.values_mut().enumerate() {
        *slot = pos;
    }
    for (pos, slot) in column_keys.values_mut().enumerate() {
        *slot = pos;
    }

    let mut cells = vec![vec![None; column_keys.len()]; row_keys.len()];
    for ((r, col), value) in &entries {
        cells[row_keys[r]][column_keys[col]] = *value;
    }

    Ok(PivotTable {
        row_keys: row_keys.into_keys().cloned().collect(),
        column_keys: column_keys.into_keys().cloned().collect(),
        cells,
    })
}
