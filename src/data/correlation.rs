use super::model::Dataset;

// ---------------------------------------------------------------------------
// Pearson correlation matrix
// ---------------------------------------------------------------------------

/// Square matrix of Pearson coefficients between the numeric columns of a
/// dataset. Row labels and column labels are the same list.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    labels: Vec<String>,
    /// Row-major, `labels.len()²` entries.
    values: Vec<f64>,
}

impl CorrelationMatrix {
    /// Correlate every pair of numeric columns of `dataset`.
    ///
    /// Each pair uses only rows where both values are present. Entries are NaN
    /// when fewer than two such rows exist or when either side is constant.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let columns: Vec<(&str, &[f64])> = dataset.numeric_columns().collect();
        let n = columns.len();
        let mut values = vec![f64::NAN; n * n];

        for i in 0..n {
            for j in 0..=i {
                let r = if i == j {
                    self_correlation(columns[i].1)
                } else {
                    pearson(columns[i].1, columns[j].1)
                };
                values[i * n + j] = r;
                values[j * n + i] = r;
            }
        }

        for (name, data) in &columns {
            if self_correlation(data).is_nan() {
                log::warn!(
                    "{}: column '{name}' has no variance, its correlations are undefined",
                    dataset.name
                );
            }
        }

        CorrelationMatrix {
            labels: columns.iter().map(|(name, _)| name.to_string()).collect(),
            values,
        }
    }

    /// Number of rows (= number of columns).
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.size() + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let n = self.size();
        &self.values[row * n..(row + 1) * n]
    }

    /// Look an entry up by column names.
    pub fn between(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == a)?;
        let j = self.labels.iter().position(|l| l == b)?;
        Some(self.get(i, j))
    }
}

/// Pearson coefficient over the rows where neither `x` nor `y` is NaN.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter(|(a, b)| !a.is_nan() && !b.is_nan())
        .map(|(&a, &b)| (a, b))
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for &(a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
}

/// Diagonal entry: exactly 1.0 when the column varies, NaN otherwise.
fn self_correlation(x: &[f64]) -> f64 {
    if pearson(x, x).is_nan() {
        f64::NAN
    } else {
        1.0
    }
}
