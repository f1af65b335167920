//! Writes a synthetic `world_bank_development_indicators.csv` with every
//! column the dashboard's questions read, using raw (un-normalized) headers.

use anyhow::{Context, Result};

const OUTPUT_PATH: &str = "world_bank_development_indicators.csv";
const FIRST_YEAR: i32 = 1985;
const LAST_YEAR: i32 = 2022;

/// Deterministic PRNG (splitmix64).
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Multiplicative noise around 1.0.
    fn jitter(&mut self, spread: f64) -> f64 {
        1.0 + (self.unit() - 0.5) * 2.0 * spread
    }
}

/// Starting point and yearly drift for one country.
struct Profile {
    name: &'static str,
    gdp: f64,
    gdp_growth: f64,
    population: f64,
    rural_share: f64,
    development: f64,
}

const PROFILES: &[Profile] = &[
    Profile { name: "United States", gdp: 4.3e12, gdp_growth: 0.045, population: 238e6, rural_share: 0.25, development: 0.95 },
    Profile { name: "China", gdp: 3.1e11, gdp_growth: 0.11, population: 1.05e9, rural_share: 0.77, development: 0.45 },
    Profile { name: "India", gdp: 2.3e11, gdp_growth: 0.075, population: 7.8e8, rural_share: 0.76, development: 0.35 },
    Profile { name: "Germany", gdp: 6.4e11, gdp_growth: 0.035, population: 7.8e7, rural_share: 0.27, development: 0.92 },
    Profile { name: "Brazil", gdp: 2.2e11, gdp_growth: 0.05, population: 1.36e8, rural_share: 0.29, development: 0.6 },
    Profile { name: "Nigeria", gdp: 7.3e10, gdp_growth: 0.06, population: 8.3e7, rural_share: 0.66, development: 0.25 },
    Profile { name: "Chile", gdp: 1.7e10, gdp_growth: 0.07, population: 1.2e7, rural_share: 0.17, development: 0.7 },
    Profile { name: "Bangladesh", gdp: 2.2e10, gdp_growth: 0.065, population: 9.4e7, rural_share: 0.82, development: 0.3 },
];

const HEADERS: &[&str] = &[
    "country",
    "date",
    "agricultural_land%",
    "forest_land%",
    "access_to_electricity%",
    "renewvable_energy_consumption%",
    "CO2_emisions",
    "inflation_annual%",
    "research_and_development_expenditure%",
    "control_of_corruption_estimate",
    "human_capital_index",
    "individuals_using_internet%",
    "military_expenditure%",
    "GDP_current_US",
    "political_stability_estimate",
    "government_expenditure_on_education%",
    "government_health_expenditure%",
    "birth_rate",
    "death_rate",
    "life_expectancy_at_birth",
    "population",
    "rural_population",
    "intentional_homicides",
];

fn fmt(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.4}")).unwrap_or_default()
}

fn row(p: &Profile, year: i32, rng: &mut SampleRng) -> Vec<String> {
    let t = (year - FIRST_YEAR) as f64;
    let span = (LAST_YEAR - FIRST_YEAR) as f64;
    let progress = (p.development + (1.0 - p.development) * t / span * 0.6).min(1.0);

    let gdp = p.gdp * (1.0 + p.gdp_growth).powf(t) * rng.jitter(0.03);
    let population = p.population * (1.0 + 0.012 * (1.0 - p.development)).powf(t);
    let rural = population * (p.rural_share * (1.0 - 0.01 * t)).max(0.05);

    // Sparse indicators, as in the real export.
    let since = |first: i32| (year >= first).then_some(());
    let internet = since(1995).map(|_| 95.0 * progress.powi(2) * ((year - 1994) as f64 / 28.0).min(1.0));
    let hci = (year % 2 == 0 && year >= 2010).then(|| 0.35 + 0.45 * progress);
    let homicides = (rng.unit() > 0.2).then(|| 25.0 * (1.0 - progress) * rng.jitter(0.2) + 0.5);

    let values = [
        Some(35.0 + 20.0 * p.rural_share * rng.jitter(0.02)),
        Some(20.0 + 20.0 * p.development - 0.1 * t),
        Some((100.0 * progress + 10.0).min(100.0)),
        Some(5.0 + 40.0 * p.rural_share * rng.jitter(0.05)),
        since(1990).map(|_| gdp / 1.0e6 * (1.2 - p.development) * 0.6),
        Some(2.0 + 10.0 * (1.0 - progress) * rng.jitter(0.5)),
        since(1996).map(|_| 0.3 + 2.8 * progress.powi(2)),
        since(1996).map(|_| -1.5 + 3.2 * progress * rng.jitter(0.05)),
        hci,
        internet,
        Some(1.0 + 3.0 * rng.unit()),
        Some(gdp),
        since(1996).map(|_| -2.0 + 3.0 * progress * rng.jitter(0.1)),
        Some(2.5 + 3.0 * progress),
        since(2000).map(|_| 2.0 + 7.0 * progress),
        Some(40.0 - 30.0 * progress),
        Some(16.0 - 8.0 * progress),
        Some(50.0 + 32.0 * progress),
        Some(population),
        Some(rural),
        homicides,
    ];

    let mut out = vec![p.name.to_string(), format!("{year}-01-01")];
    out.extend(values.into_iter().map(fmt));
    out
}

fn main() -> Result<()> {
    let mut rng = SampleRng(42);
    let mut writer = csv::Writer::from_path(OUTPUT_PATH)
        .with_context(|| format!("creating {OUTPUT_PATH}"))?;
    writer.write_record(HEADERS)?;

    let mut rows = 0usize;
    for profile in PROFILES {
        for year in FIRST_YEAR..=LAST_YEAR {
            writer.write_record(row(profile, year, &mut rng))?;
            rows += 1;
        }
    }
    // One undated row; the dashboard drops it on load.
    writer.write_record(
        std::iter::once("Chile".to_string())
            .chain(std::iter::once("unknown".to_string()))
            .chain(std::iter::repeat(String::new()).take(HEADERS.len() - 2)),
    )?;
    writer.flush()?;

    println!(
        "Wrote {rows} rows for {} countries to {OUTPUT_PATH}",
        PROFILES.len()
    );
    Ok(())
}
