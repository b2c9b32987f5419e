use tracing::debug;

use crate::{Error, Result, TimingSample};

/// Fewest samples that leave something to average after trimming both extremes.
pub const MIN_TRIMMED_SAMPLES: usize = 3;

/// Averages the elapsed times of `samples` after discarding one minimum and one maximum.
///
/// The first sample holding the minimum is removed, then the first remaining sample holding
/// the maximum. When every sample has the same elapsed time this removes two of them, so
/// `[5, 5, 5]` averages to `5.0`.
///
/// # Errors
///
/// Returns [`Error::InsufficientSamples`] if fewer than [`MIN_TRIMMED_SAMPLES`] samples are
/// provided.
///
/// # Examples
///
/// ```
/// use new_zealand::nz;
/// use prime_scaling::{TimingSample, trimmed_average};
///
/// let samples = [
///     TimingSample::new(nz!(1), 25, 10),
///     TimingSample::new(nz!(2), 25, 20),
///     TimingSample::new(nz!(3), 25, 30),
/// ];
///
/// assert_eq!(trimmed_average(&samples)?, 20.0);
/// # Ok::<(), prime_scaling::Error>(())
/// ```
pub fn trimmed_average(samples: &[TimingSample]) -> Result<f64> {
    let insufficient = || Error::InsufficientSamples {
        available: samples.len(),
    };

    if samples.len() < MIN_TRIMMED_SAMPLES {
        return Err(insufficient());
    }

    let mut remaining: Vec<u64> = samples.iter().map(TimingSample::elapsed_millis).collect();

    let lowest = remaining.iter().copied().min();
    let min = remove_first(&mut remaining, lowest).ok_or_else(insufficient)?;
    debug!("The min is: {min}.");

    let highest = remaining.iter().copied().max();
    let max = remove_first(&mut remaining, highest).ok_or_else(insufficient)?;
    debug!("The max is: {max}.");

    let total: u128 = remaining.iter().copied().map(u128::from).sum();

    #[expect(
        clippy::cast_precision_loss,
        reason = "millisecond totals are far below the range where f64 loses integer precision"
    )]
    let average = total as f64 / remaining.len() as f64;
    debug!("The average is: {average}.");

    Ok(average)
}

fn remove_first(values: &mut Vec<u64>, target: Option<u64>) -> Option<u64> {
    let target = target?;
    let index = values.iter().position(|&value| value == target)?;

    Some(values.remove(index))
}
