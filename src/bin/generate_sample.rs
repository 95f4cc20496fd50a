//! Writes a deterministic Titanic-like passenger list to
//! `sample_data.csv` and `sample_data.parquet` for trying the dashboard.

use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

#[derive(Clone)]
struct Passenger {
    id: i64,
    survived: i64,
    pclass: i64,
    sex: String,
    age: Option<f64>,
    fare: f64,
    embarked: Option<String>,
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let n_passengers = 400;

    let mut passengers: Vec<Passenger> = (1..=n_passengers)
        .map(|id| {
            let pclass = 1 + (rng.next_u64() % 3) as i64;
            let sex = rng.pick(&["male", "female"]).to_string();
            let base_fare = match pclass {
                1 => 85.0,
                2 => 22.0,
                _ => 9.0,
            };
            let fare = (rng.gauss(base_fare, base_fare * 0.3).max(0.0) * 100.0).round() / 100.0;
            let age = (!rng.chance(0.2)).then(|| rng.gauss(30.0, 13.0).clamp(0.5, 80.0).round());
            let p_survive = (if sex == "female" { 0.74 } else { 0.19 }) + 0.05 * (3 - pclass) as f64;
            let embarked = (!rng.chance(0.01)).then(|| rng.pick(&["S", "C", "Q"]).to_string());

            Passenger {
                id,
                survived: rng.chance(p_survive) as i64,
                pclass,
                sex,
                age,
                fare,
                embarked,
            }
        })
        .collect();

    // A couple of exact duplicates so the overview has something to report.
    for src in [10usize, 20] {
        let copy = passengers[src].clone();
        passengers.push(copy);
    }

    // Write CSV
    let csv_path = "sample_data.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    writer
        .write_record(["PassengerId", "Survived", "Pclass", "Sex", "Age", "Fare", "Embarked"])
        .expect("Failed to write CSV header");
    for p in &passengers {
        writer
            .write_record([
                p.id.to_string(),
                p.survived.to_string(),
                p.pclass.to_string(),
                p.sex.clone(),
                p.age.map(|a| a.to_string()).unwrap_or_default(),
                p.fare.to_string(),
                p.embarked.clone().unwrap_or_default(),
            ])
            .expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV file");

    // Build Arrow arrays
    let schema = Arc::new(Schema::new(vec![
        Field::new("PassengerId", DataType::Int64, false),
        Field::new("Survived", DataType::Int64, false),
        Field::new("Pclass", DataType::Int64, false),
        Field::new("Sex", DataType::Utf8, false),
        Field::new("Age", DataType::Float64, true),
        Field::new("Fare", DataType::Float64, false),
        Field::new("Embarked", DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(passengers.iter().map(|p| p.id))),
            Arc::new(Int64Array::from_iter_values(passengers.iter().map(|p| p.survived))),
            Arc::new(Int64Array::from_iter_values(passengers.iter().map(|p| p.pclass))),
            Arc::new(StringArray::from_iter_values(passengers.iter().map(|p| p.sex.as_str()))),
            Arc::new(Float64Array::from(passengers.iter().map(|p| p.age).collect::<Vec<_>>())),
            Arc::new(Float64Array::from_iter_values(passengers.iter().map(|p| p.fare))),
            Arc::new(StringArray::from(
                passengers.iter().map(|p| p.embarked.as_deref()).collect::<Vec<_>>(),
            )),
        ],
    )
    .expect("Failed to create RecordBatch");

    // Write Parquet
    let parquet_path = "sample_data.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {} passengers to {csv_path} and {parquet_path}", passengers.len());
}
