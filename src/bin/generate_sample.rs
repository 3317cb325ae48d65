//! Writes five synthetic extracts with the same columns as the real ones,
//! so the dashboard can be tried without the original database.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

const CATEGORIES: [&str; 16] = [
    "Action", "Animation", "Children", "Classics", "Comedy", "Documentary", "Drama", "Family",
    "Foreign", "Games", "Horror", "Music", "New", "Sci-Fi", "Sports", "Travel",
];
const WEEKDAYS: [&str; 7] = [
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];
const GENDERS: [&str; 3] = ["Masculino", "Femenino", "Indeterminado"];
const FIRST_NAMES: [&str; 12] = [
    "MARY", "PATRICIA", "LINDA", "BARBARA", "ELIZABETH", "JENNIFER", "JOHN", "ROBERT",
    "MICHAEL", "WILLIAM", "DAVID", "RICHARD",
];
const LAST_NAMES: [&str; 10] = [
    "SMITH", "JOHNSON", "WILLIAMS", "JONES", "BROWN", "DAVIS", "MILLER", "WILSON", "MOORE",
    "TAYLOR",
];
const TITLE_WORDS: [&str; 14] = [
    "ACADEMY", "DINOSAUR", "TELEGRAPH", "VOYAGE", "WIFE", "TURN", "ZORRO", "ARK", "GOODFELLAS",
    "SALUTE", "SATURDAY", "LAMBS", "TITANS", "JERK",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Index drawn with probability proportional to `weights`.
    fn weighted(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().sum();
        let mut target = self.next_f64() * total;
        for (i, w) in weights.iter().enumerate() {
            if target < *w {
                return i;
            }
            target -= w;
        }
        weights.len() - 1
    }
}

struct Rental {
    customer: String,
    movie: String,
    category: &'static str,
    store: u8,
    month: u32,
    weekday: &'static str,
    hour: usize,
    gender: &'static str,
    amount: f64,
}

fn write_csv<const N: usize>(
    dir: &Path,
    name: &str,
    header: [&str; N],
    rows: impl IntoIterator<Item = [String; N]>,
) -> Result<usize> {
    let path = dir.join(name);
    let mut writer =
        csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(header)?;
    let mut count = 0;
    for row in rows {
        writer.write_record(&row)?;
        count += 1;
    }
    writer.flush()?;
    println!("Wrote {count} rows to {}", path.display());
    Ok(count)
}

/// Highest totals first, as `[name, amount]` rows.
fn ranked(totals: BTreeMap<&str, f64>, limit: usize) -> Vec<[String; 2]> {
    let mut v: Vec<(&str, f64)> = totals.into_iter().collect();
    v.sort_by(|a, b| b.1.total_cmp(&a.1));
    v.truncate(limit);
    v.into_iter()
        .map(|(k, s)| [k.to_string(), format!("{s:.2}")])
        .collect()
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let dir = Path::new(".");

    let customers: Vec<String> = (0..120)
        .map(|_| format!("{} {}", rng.pick(&FIRST_NAMES), rng.pick(&LAST_NAMES)))
        .collect();
    let movies: Vec<(String, &'static str)> = (0..200)
        .map(|_| {
            (
                format!("{} {}", rng.pick(&TITLE_WORDS), rng.pick(&TITLE_WORDS)),
                rng.pick(&CATEGORIES),
            )
        })
        .collect();

    // Afternoon and evening peaks, slightly busier weekends and Tuesdays.
    let hour_weights: Vec<f64> = (0..24)
        .map(|h| if (14..=21).contains(&h) { 3.0 } else { 1.0 })
        .collect();
    let weekday_weights = [1.0, 1.4, 1.0, 1.0, 1.1, 1.3, 1.3];
    let gender_weights = [0.55, 0.40, 0.05];

    let rentals: Vec<Rental> = (0..2000)
        .map(|_| {
            let customer = customers[(rng.next_u64() % customers.len() as u64) as usize].clone();
            let (movie, category) = movies[(rng.next_u64() % movies.len() as u64) as usize].clone();
            Rental {
                customer,
                movie,
                category,
                store: 1 + (rng.next_u64() % 2) as u8,
                month: 5 + (rng.next_u64() % 4) as u32,
                weekday: WEEKDAYS[rng.weighted(&weekday_weights)],
                hour: rng.weighted(&hour_weights),
                gender: GENDERS[rng.weighted(&gender_weights)],
                amount: [0.99, 2.99, 4.99][(rng.next_u64() % 3) as usize],
            }
        })
        .collect();

    write_csv(
        dir,
        "detalle_alquileres_limpio.csv",
        ["rental_id", "cliente", "pelicula", "categoria", "weekday", "hour", "genero_estimado"],
        rentals.iter().enumerate().map(|(i, r)| {
            [
                (i + 1).to_string(),
                r.customer.clone(),
                r.movie.clone(),
                r.category.to_string(),
                r.weekday.to_string(),
                r.hour.to_string(),
                r.gender.to_string(),
            ]
        }),
    )?;

    let mut monthly: BTreeMap<(u32, &str), u32> = BTreeMap::new();
    let mut spend: BTreeMap<&str, f64> = BTreeMap::new();
    let mut gross: BTreeMap<&str, f64> = BTreeMap::new();
    let mut store_revenue: BTreeMap<(&str, u8), f64> = BTreeMap::new();
    for r in &rentals {
        *monthly.entry((r.month, r.category)).or_default() += 1;
        *spend.entry(r.customer.as_str()).or_default() += r.amount;
        *gross.entry(r.movie.as_str()).or_default() += r.amount;
        *store_revenue.entry((r.category, r.store)).or_default() += r.amount;
    }

    write_csv(
        dir,
        "alquileres_por_mes_categoria_limpio.csv",
        ["mes", "total_alquileres", "categoria"],
        monthly
            .iter()
            .map(|((month, cat), n)| [month.to_string(), n.to_string(), cat.to_string()]),
    )?;

    write_csv(
        dir,
        "clientes_mas_frecuentes_limpio.csv",
        ["cliente", "total_gasto"],
        ranked(spend, 20),
    )?;
    write_csv(
        dir,
        "peliculas_mas_rentables_limpio.csv",
        ["pelicula", "ingresos"],
        ranked(gross, 20),
    )?;
    write_csv(
        dir,
        "ingresos_por_tienda_categoria_limpio.csv",
        ["categoria", "tienda", "ingresos"],
        store_revenue
            .iter()
            .map(|((cat, store), s)| [cat.to_string(), store.to_string(), format!("{s:.2}")]),
    )?;

    Ok(())
}
