//! Start→stop travel-time matrix across time bins.

use chrono::{DateTime, FixedOffset};
use futures::future::join_all;
use tracing::{info, warn};

use crate::bins::{bin_departures, generate_bins};
use crate::domain::{DomainError, EtaEstimate, EtaMatrix, GeoPoint, TimeWindow, TravelMode};
use crate::routing::RouteProvider;

use super::resolver::{RetryPolicy, RouteEtaResolver};

/// Default number of routing calls resolved together.
pub const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Builds an [`EtaMatrix`] for one trip.
///
/// Only legs from the trip start to each stop are resolved; stop-to-stop
/// pairs are not. Cells are resolved in batches of `max_concurrent`, and
/// each (stop, bin) cell is written exactly once.
pub struct EtaMatrixBuilder<'a, P> {
    resolver: RouteEtaResolver<'a, P>,
    max_concurrent: usize,
}

impl<'a, P: RouteProvider> EtaMatrixBuilder<'a, P> {
    pub fn new(provider: &'a P, policy: RetryPolicy, max_concurrent: usize) -> Self {
        Self {
            resolver: RouteEtaResolver::new(provider, policy),
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Resolve every (stop, bin) cell for the window.
    ///
    /// Fails only when the bins cannot be generated (non-positive
    /// interval, or a window of a day or more). A cell whose departure cannot be anchored gets a zeroed
    /// estimate rather than aborting the matrix.
    pub async fn build(
        &self,
        start: &GeoPoint,
        stops: &[GeoPoint],
        window: &TimeWindow,
        mode: TravelMode,
        interval_mins: i64,
    ) -> Result<EtaMatrix, DomainError> {
        let labels = generate_bins(window, interval_mins)?;
        let departures = bin_departures(window, &labels);

        let cells: Vec<(&GeoPoint, &String, &Result<DateTime<FixedOffset>, DomainError>)> = stops
            .iter()
            .flat_map(|stop| {
                labels
                    .iter()
                    .zip(departures.iter())
                    .map(move |(label, departure)| (stop, label, departure))
            })
            .collect();

        let mut matrix = EtaMatrix::new();

        for batch in cells.chunks(self.max_concurrent) {
            let futures: Vec<_> = batch
                .iter()
                .map(|&(stop, label, departure)| async move {
                    let estimate = self.resolve_cell(start, stop, departure, mode).await;
                    (EtaMatrix::route_key(stop.name()), label.clone(), estimate)
                })
                .collect();

            for (route_key, bin, estimate) in join_all(futures).await {
                matrix.insert(route_key, bin, estimate);
            }
        }

        info!(
            start = %start.name(),
            stops = stops.len(),
            bins = labels.len(),
            cells = matrix.cell_count(),
            mode = %mode,
            "Built ETA matrix"
        );

        Ok(matrix)
    }

    async fn resolve_cell(
        &self,
        start: &GeoPoint,
        stop: &GeoPoint,
        departure: &Result<DateTime<FixedOffset>, DomainError>,
        mode: TravelMode,
    ) -> EtaEstimate {
        match departure {
            Ok(departure) => self.resolver.resolve(start, stop, *departure, mode).await,
            Err(e) => {
                warn!(
                    stop = %stop.name(),
                    error = %e,
                    "Could not anchor bin departure, storing zeroed estimate"
                );
                EtaEstimate::zeroed()
            }
        }
    }
}

#[cfg(test)]
#[path = "matrix_tests.rs"]
mod tests;
