use serde::Serialize;

use crate::data::model::{Dataset, Value};

// ---------------------------------------------------------------------------
// Pairwise Pearson correlation over continuous columns
// ---------------------------------------------------------------------------

/// Square, symmetric matrix indexed by `columns`. Undefined pairs are NaN.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

/// Pearson coefficient over rows where both cells are present.
/// Fewer than two such rows, or zero variance on either side, gives NaN.
pub fn pearson(xs: &[Value], ys: &[Value]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some((x.as_f64()?, y.as_f64()?)))
        .collect();

    let n = pairs.len();
    if n < 2 {
        return f64::NAN;
    }

    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// Build the matrix for `columns`; names absent from the dataset are skipped.
pub fn correlate(dataset: &Dataset, columns: &[String]) -> CorrelationMatrix {
    let cols: Vec<_> = columns
        .iter()
        .filter_map(|name| dataset.column(name))
        .collect();

    let n = cols.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&cols[i].values, &cols[j].values);
            // Round-off can leave the self-correlation a hair under 1.
            let r = if i == j && !r.is_nan() { 1.0 } else { r };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        columns: cols.iter().map(|c| c.name.clone()).collect(),
        values,
    }
}
