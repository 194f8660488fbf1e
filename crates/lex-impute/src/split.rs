//! Seeded train/test partitioning of a table.

use crate::error::{ImputationError, Result};
use crate::types::Table;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

/// Row indices of the two partitions, in shuffled order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n_rows` with `seed` and hold out `ceil(n_rows * test_size)` rows.
pub fn split_indices(n_rows: usize, test_size: f64, seed: u64) -> Result<SplitIndices> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(ImputationError::InvalidSplit(format!(
            "test size {} must be strictly between 0 and 1",
            test_size
        )));
    }

    let n_test = (n_rows as f64 * test_size).ceil() as usize;
    let n_train = n_rows.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(ImputationError::InvalidSplit(format!(
            "{} rows with test size {} leaves an empty partition",
            n_rows, test_size
        )));
    }

    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    debug!(
        "Split {} rows into {} train / {} test (seed {})",
        n_rows,
        train.len(),
        indices.len(),
        seed
    );

    Ok(SplitIndices {
        train,
        test: indices,
    })
}

/// Partition a table into `(train, test)`.
pub fn train_test_split(table: &Table, test_size: f64, seed: u64) -> Result<(Table, Table)> {
    let split = split_indices(table.height(), test_size, seed)?;
    Ok((table.take(&split.train), table.take(&split.test)))
}
