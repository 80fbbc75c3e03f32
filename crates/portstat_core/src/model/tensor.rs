//! Dense return containers: the asset tensor `R[a, t, s]` and the portfolio
//! matrix `P[t, s]`.

use crate::error::{Result, StatsError};

/// Simulated simple returns indexed by (asset, period, simulation).
///
/// Stored flat in row-major order where the simulation axis varies fastest, so
/// one asset's period is a contiguous slice of `n_simulations` values.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnTensor {
    n_assets: usize,
    n_periods: usize,
    n_simulations: usize,
    data: Vec<f64>,
}

impl ReturnTensor {
    /// Create a tensor from flat row-major data.
    pub fn from_data(
        n_assets: usize,
        n_periods: usize,
        n_simulations: usize,
        data: Vec<f64>,
    ) -> Result<Self> {
        if n_assets == 0 || n_periods == 0 || n_simulations == 0 {
            return Err(StatsError::InvalidDataset(format!(
                "tensor dimensions must be non-zero, got ({n_assets}, {n_periods}, {n_simulations})"
            )));
        }
        let expected = n_assets * n_periods * n_simulations;
        if data.len() != expected {
            return Err(StatsError::InvalidDataset(format!(
                "expected {expected} values for shape ({n_assets}, {n_periods}, {n_simulations}), got {}",
                data.len()
            )));
        }
        Ok(Self {
            n_assets,
            n_periods,
            n_simulations,
            data,
        })
    }

    /// Create a tensor from nested `[asset][period][simulation]` vectors.
    pub fn from_nested(nested: &[Vec<Vec<f64>>]) -> Result<Self> {
        let n_assets = nested.len();
        let n_periods = nested.first().map_or(0, Vec::len);
        let n_simulations = nested
            .first()
            .and_then(|periods| periods.first())
            .map_or(0, Vec::len);

        let mut data = Vec::with_capacity(n_assets * n_periods * n_simulations);
        for (a, periods) in nested.iter().enumerate() {
            if periods.len() != n_periods {
                return Err(StatsError::InvalidDataset(format!(
                    "asset {a} has {} periods, expected {n_periods}",
                    periods.len()
                )));
            }
            for (t, sims) in periods.iter().enumerate() {
                if sims.len() != n_simulations {
                    return Err(StatsError::InvalidDataset(format!(
                        "asset {a} period {t} has {} simulations, expected {n_simulations}",
                        sims.len()
                    )));
                }
                data.extend_from_slice(sims);
            }
        }

        Self::from_data(n_assets, n_periods, n_simulations, data)
    }

    #[must_use]
    pub fn n_assets(&self) -> usize {
        self.n_assets
    }

    #[must_use]
    pub fn n_periods(&self) -> usize {
        self.n_periods
    }

    #[must_use]
    pub fn n_simulations(&self) -> usize {
        self.n_simulations
    }

    /// (assets, periods, simulations)
    #[must_use]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.n_assets, self.n_periods, self.n_simulations)
    }

    #[must_use]
    pub fn get(&self, asset: usize, period: usize, simulation: usize) -> f64 {
        self.data[(asset * self.n_periods + period) * self.n_simulations + simulation]
    }

    /// All `T × S` observations of one asset, period-major.
    #[must_use]
    pub fn asset(&self, asset: usize) -> &[f64] {
        let len = self.n_periods * self.n_simulations;
        &self.data[asset * len..(asset + 1) * len]
    }

    /// The `S` simulated returns of one asset in one period.
    #[must_use]
    pub fn period(&self, asset: usize, period: usize) -> &[f64] {
        let start = (asset * self.n_periods + period) * self.n_simulations;
        &self.data[start..start + self.n_simulations]
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Build the reduced tensor containing only the assets where `mask` is true.
    pub fn select_assets(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.n_assets {
            return Err(StatsError::DimensionMismatch {
                expected: self.n_assets,
                actual: mask.len(),
            });
        }
        let selected = mask.iter().filter(|m| **m).count();
        if selected == 0 {
            return Err(StatsError::NoMatchingAssets);
        }
        if selected == self.n_assets {
            return Ok(self.clone());
        }

        let mut data = Vec::with_capacity(selected * self.n_periods * self.n_simulations);
        for (a, _) in mask.iter().enumerate().filter(|(_, keep)| **keep) {
            data.extend_from_slice(self.asset(a));
        }
        Ok(Self {
            n_assets: selected,
            n_periods: self.n_periods,
            n_simulations: self.n_simulations,
            data,
        })
    }
}

/// Portfolio returns indexed by (period, simulation).
///
/// Row-major: each period is a contiguous row of `n_simulations` values.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnMatrix {
    n_periods: usize,
    n_simulations: usize,
    data: Vec<f64>,
}

impl ReturnMatrix {
    pub fn from_data(n_periods: usize, n_simulations: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != n_periods * n_simulations {
            return Err(StatsError::InvalidDataset(format!(
                "expected {} values for a {n_periods}x{n_simulations} matrix, got {}",
                n_periods * n_simulations,
                data.len()
            )));
        }
        Ok(Self {
            n_periods,
            n_simulations,
            data,
        })
    }

    /// Create a matrix from `[period][simulation]` rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n_periods = rows.len();
        let n_simulations = rows.first().map_or(0, Vec::len);
        if let Some(t) = rows.iter().position(|row| row.len() != n_simulations) {
            return Err(StatsError::InvalidDataset(format!(
                "row {t} has {} simulations, expected {n_simulations}",
                rows[t].len()
            )));
        }
        Ok(Self {
            n_periods,
            n_simulations,
            data: rows.concat(),
        })
    }

    pub(crate) fn zeros(n_periods: usize, n_simulations: usize) -> Self {
        Self {
            n_periods,
            n_simulations,
            data: vec![0.0; n_periods * n_simulations],
        }
    }

    #[must_use]
    pub fn n_periods(&self) -> usize {
        self.n_periods
    }

    #[must_use]
    pub fn n_simulations(&self) -> usize {
        self.n_simulations
    }

    /// (periods, simulations)
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_periods, self.n_simulations)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn get(&self, period: usize, simulation: usize) -> f64 {
        self.data[period * self.n_simulations + simulation]
    }

    #[must_use]
    pub fn row(&self, period: usize) -> &[f64] {
        &self.data[period * self.n_simulations..(period + 1) * self.n_simulations]
    }

    pub(crate) fn row_mut(&mut self, period: usize) -> &mut [f64] {
        &mut self.data[period * self.n_simulations..(period + 1) * self.n_simulations]
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// One simulation's path across all periods.
    #[must_use]
    pub fn column(&self, simulation: usize) -> Vec<f64> {
        (0..self.n_periods)
            .map(|t| self.data[t * self.n_simulations + simulation])
            .collect()
    }

    /// Every value, period-major.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Nested `[period][simulation]` copy of the data.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data
            .chunks(self.n_simulations.max(1))
            .map(<[f64]>::to_vec)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tensor() -> ReturnTensor {
        ReturnTensor::from_nested(&[
            vec![vec![0.1, 0.2], vec![0.05, -0.1]],
            vec![vec![0.15, 0.25], vec![0.08, -0.05]],
            vec![vec![0.0, 0.01], vec![0.02, 0.03]],
        ])
        .unwrap()
    }

    #[test]
    fn test_nested_indexing() {
        let tensor = sample_tensor();
        assert_eq!(tensor.shape(), (3, 2, 2));
        assert_eq!(tensor.get(1, 1, 0), 0.08);
        assert_eq!(tensor.period(0, 1), &[0.05, -0.1]);
        assert_eq!(tensor.asset(2), &[0.0, 0.01, 0.02, 0.03]);
    }

    #[test]
    fn test_ragged_input_rejected() {
        let result = ReturnTensor::from_nested(&[vec![vec![0.1, 0.2], vec![0.05]]]);
        assert!(matches!(result, Err(StatsError::InvalidDataset(_))));
    }

    #[test]
    fn test_select_assets() {
        let tensor = sample_tensor();
        let reduced = tensor.select_assets(&[true, false, true]).unwrap();
        assert_eq!(reduced.shape(), (2, 2, 2));
        assert_eq!(reduced.asset(1), tensor.asset(2));

        assert_eq!(
            tensor.select_assets(&[false, false, false]),
            Err(StatsError::NoMatchingAssets)
        );
        assert!(matches!(
            tensor.select_assets(&[true]),
            Err(StatsError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_matrix_rows_and_columns() {
        let matrix = ReturnMatrix::from_rows(&[vec![0.1, 0.2], vec![0.05, -0.1]]).unwrap();
        assert_eq!(matrix.shape(), (2, 2));
        assert_eq!(matrix.row(1), &[0.05, -0.1]);
        assert_eq!(matrix.column(1), vec![0.2, -0.1]);
        assert_eq!(matrix.to_rows(), vec![vec![0.1, 0.2], vec![0.05, -0.1]]);
    }
}
