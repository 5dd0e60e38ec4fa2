use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};

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
        (self.next_f64() * n as f64) as usize % n.max(1)
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }
}

/// (company, location, active from, active to, rockets, reliability, typical price in $M)
type Operator = (&'static str, &'static str, i32, i32, &'static [&'static str], f64, Option<f64>);

const OPERATORS: [Operator; 5] = [
    (
        "RVSN USSR",
        "Site 43/4, Plesetsk Cosmodrome, Russia",
        1957,
        1991,
        &["Cosmos-3M (11K65M)", "Voskhod", "Molniya-M /Block ML"],
        0.92,
        None,
    ),
    ("NASA", "LC-39A, Kennedy Space Center, Florida, USA", 1958, 2011, &["Saturn V", "Space Shuttle Atlantis"], 0.95, Some(1160.0)),
    ("CASC", "LC-2, Xichang Satellite Launch Center, China", 1970, 2020, &["Long March 3B/E", "Long March 2D"], 0.94, Some(29.75)),
    ("Arianespace", "ELA-3, Guiana Space Centre, French Guiana, France", 1979, 2020, &["Ariane 5 ECA"], 0.96, Some(200.0)),
    ("SpaceX", "SLC-40, Cape Canaveral AFS, Florida, USA", 2006, 2020, &["Falcon 9 Block 5", "Falcon 1"], 0.97, Some(50.0)),
];

const ROWS: usize = 400;

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let output_path = "sample_missions.csv";
    let mut writer = csv::Writer::from_path(output_path).context("creating output file")?;
    writer.write_record([
        "Company",
        "Location",
        "Date",
        "Time",
        "Rocket",
        "Mission",
        "RocketStatus",
        "Price",
        "MissionStatus",
    ])?;

    // The first launch on record.
    writer.write_record([
        "RVSN USSR",
        "Site 1/5, Baikonur Cosmodrome, Kazakhstan",
        "1957-10-04",
        "19:28:00",
        "Sputnik 8K71PS",
        "Sputnik-1",
        "Retired",
        "",
        "Success",
    ])?;

    for i in 0..ROWS {
        let (company, location, from, to, rockets, reliability, price) = *rng.pick(&OPERATORS);
        let start = NaiveDate::from_ymd_opt(from, 1, 1).context("operator start year")?;
        let span_days = i64::from(to - from + 1) * 365;
        let date = start + Duration::days((rng.next_f64() * span_days as f64) as i64);

        let roll = rng.next_f64();
        let status = if roll < reliability {
            "Success"
        } else if roll < reliability + (1.0 - reliability) * 0.7 {
            "Failure"
        } else if roll < reliability + (1.0 - reliability) * 0.95 {
            "Partial Failure"
        } else {
            "Prelaunch Failure"
        };

        // Large prices carry a thousands separator, as in the published data.
        let price = match price {
            Some(p) if rng.next_f64() < 0.6 => {
                let whole = p as u64;
                if whole >= 1000 {
                    format!("{},{:03}.0", whole / 1000, whole % 1000)
                } else {
                    format!("{p:.2}")
                }
            }
            _ => String::new(),
        };
        let rocket_status = if to >= 2020 { "Active" } else { "Retired" };
        let date = date.format("%Y-%m-%d").to_string();
        let mission = format!("{company} Flight {}", i + 1);
        let rocket = *rng.pick(rockets);

        writer.write_record([
            company,
            location,
            date.as_str(),
            "",
            rocket,
            mission.as_str(),
            rocket_status,
            price.as_str(),
            status,
        ])?;
    }
    writer.flush().context("flushing output")?;

    println!("Wrote {} missions to {output_path}", ROWS + 1);
    Ok(())
}
