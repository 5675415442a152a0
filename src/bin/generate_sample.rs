use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};

const ROWS: usize = 10_000;
const OUTPUT_PATH: &str = "dirty_cafe_sales.csv";
/// Chance that any one cell is replaced by a missing-value marker.
const DIRT_RATE: f64 = 0.06;

const MENU: [(&str, f64); 8] = [
    ("Coffee", 2.0),
    ("Tea", 1.5),
    ("Sandwich", 4.0),
    ("Salad", 5.0),
    ("Cake", 3.0),
    ("Cookie", 1.0),
    ("Smoothie", 4.0),
    ("Juice", 3.0),
];
const PAYMENT_METHODS: [&str; 3] = ["Credit Card", "Cash", "Digital Wallet"];
const LOCATIONS: [&str; 2] = ["In-store", "Takeaway"];
const MARKERS: [&str; 3] = ["ERROR", "UNKNOWN", ""];

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[self.below(choices.len())]
    }

    /// Either `value` or, with probability `DIRT_RATE`, a random marker.
    fn dirty(&mut self, value: String) -> String {
        if self.next_f64() < DIRT_RATE {
            self.pick(&MARKERS).to_string()
        } else {
            value
        }
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let first_day = NaiveDate::from_ymd_opt(2023, 1, 1).context("invalid start date")?;

    let mut writer = csv::Writer::from_path(OUTPUT_PATH)
        .with_context(|| format!("creating {OUTPUT_PATH}"))?;
    writer.write_record([
        "Transaction ID",
        "Item",
        "Quantity",
        "Price Per Unit",
        "Total Spent",
        "Payment Method",
        "Location",
        "Transaction Date",
    ])?;

    for row in 0..ROWS {
        let (item, price) = MENU[rng.below(MENU.len())];
        let quantity = rng.below(5) + 1;
        let day = first_day + Duration::days(rng.below(365) as i64);
        let payment = rng.pick(&PAYMENT_METHODS);
        let location = rng.pick(&LOCATIONS);

        let record = [
            format!("TXN_{}", 1_000_000 + row),
            rng.dirty(item.to_string()),
            rng.dirty(quantity.to_string()),
            rng.dirty(price.to_string()),
            rng.dirty((quantity as f64 * price).to_string()),
            rng.dirty(payment.to_string()),
            rng.dirty(location.to_string()),
            rng.dirty(day.format("%Y-%m-%d").to_string()),
        ];
        writer.write_record(&record)?;
    }
    writer.flush()?;

    println!("Wrote {ROWS} transactions to {OUTPUT_PATH}");
    Ok(())
}
