//! Partitioned aggregation on the rayon pool.

use log::debug;
use rayon::prelude::*;

use crate::{
    aggregate::Aggregator, charge::Charge, error::AggregateError, summary::SummaryRecord,
};

/// Splits `charges` into `partitions` contiguous chunks, aggregates each on
/// the rayon pool with its own tables, then merges them in chunk order.
///
/// No table is shared between threads; the merge runs on the caller.
pub fn aggregate_partitioned(
    charges: &[Charge],
    partitions: usize,
) -> Result<SummaryRecord<&str>, AggregateError> {
    if charges.is_empty() {
        return Err(AggregateError::NoData);
    }
    let chunk_length = charges.len().div_ceil(partitions.max(1));
    debug!(
        "aggregating {} charges in chunks of {}",
        charges.len(),
        chunk_length
    );

    let partials = charges
        .par_chunks(chunk_length)
        .map(|chunk| -> Result<Aggregator<&str>, AggregateError> {
            let mut aggregator = Aggregator::new();
            aggregator.extend(chunk.iter().map(Charge::as_pair))?;
            Ok(aggregator)
        })
        .collect::<Result<Vec<Aggregator<&str>>, AggregateError>>()?;

    let mut partials = partials.into_iter();
    let mut results = partials.next().ok_or(AggregateError::NoData)?;
    for partial in partials {
        results.merge(partial)?;
    }
    results.summary()
}
