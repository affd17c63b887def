//! Bulk conversion: apply a mapper element-wise over a sequence.
//!
//! Every element goes through [`Mapper::convert`], so bulk and single-value
//! conversion resolve and project results identically. The output is built
//! in a fresh vector and only handed to the caller once every element has
//! converted.

use crate::error::MapError;
use crate::key::TypeKey;
use crate::mapper::{Mapper, check_shape};

impl Mapper {
    /// Convert every element of `source`, preserving order.
    ///
    /// Stops at the first element that fails and returns its error. An empty
    /// source yields an empty vector without resolving any conversion.
    pub fn convert_list<S, D, I>(&self, source: I) -> Result<Vec<D>, MapError>
    where
        S: 'static,
        D: 'static,
        I: IntoIterator<Item = S>,
    {
        check_shape(&TypeKey::derive::<S, D>())?;

        let source = source.into_iter();
        let mut output = Vec::with_capacity(source.size_hint().0);
        for item in source {
            output.push(self.convert(item)?);
        }
        Ok(output)
    }

    /// Convert every element of `source` and replace `dest` with the results.
    ///
    /// On error `dest` keeps its previous contents; partial results are
    /// never published.
    pub fn map_list<S, D, I>(&self, source: I, dest: &mut Vec<D>) -> Result<(), MapError>
    where
        S: 'static,
        D: 'static,
        I: IntoIterator<Item = S>,
    {
        *dest = self.convert_list(source)?;
        Ok(())
    }

    /// Parallel version of [`Mapper::convert_list`].
    ///
    /// Inputs shorter than the configured `parallel.min_len` run
    /// sequentially. Output order matches input order. Once an element
    /// fails, elements after it are skipped, and the failure with the
    /// lowest index is reported.
    #[cfg(feature = "parallel")]
    pub fn par_convert_list<S, D>(&self, source: Vec<S>) -> Result<Vec<D>, MapError>
    where
        S: Send + 'static,
        D: Send + 'static,
    {
        use rayon::prelude::*;
        use std::sync::atomic::{AtomicUsize, Ordering};

        if source.len() < self.config().parallel.min_len {
            return self.convert_list(source);
        }
        check_shape(&TypeKey::derive::<S, D>())?;

        tracing::trace!(
            mapper = self.label(),
            len = source.len(),
            "converting list in parallel"
        );

        // Lowest index seen failing so far.
        let failed_at = AtomicUsize::new(usize::MAX);
        let convert_all = || {
            source
                .into_par_iter()
                .enumerate()
                .map(|(index, item)| {
                    if index > failed_at.load(Ordering::Relaxed) {
                        return None;
                    }
                    let result = self.convert::<S, D>(item);
                    if result.is_err() {
                        failed_at.fetch_min(index, Ordering::Relaxed);
                    }
                    Some(result)
                })
                .collect::<Vec<_>>()
        };

        let results = match self.thread_pool() {
            Some(pool) => pool.install(convert_all),
            None => convert_all(),
        };

        // A skipped element always follows a failed one, so the first error
        // in order is reached before any gap.
        results.into_iter().flatten().collect()
    }

    /// Parallel version of [`Mapper::map_list`].
    #[cfg(feature = "parallel")]
    pub fn par_map_list<S, D>(&self, source: Vec<S>, dest: &mut Vec<D>) -> Result<(), MapError>
    where
        S: Send + 'static,
        D: Send + 'static,
    {
        *dest = self.par_convert_list(source)?;
        Ok(())
    }
}
