//! Area risk aggregation for the stunting map.
//!
//! Records are grouped by kecamatan and each area is classified under the WHO
//! rule: more than 20% `Berisiko` households makes an area `Rentan Stunting`,
//! anything else is `Aman`. Statistics are recomputed from scratch for every
//! filter selection; nothing is cached or updated in place.
//!
//! - [`compute_area_stats`]: per-area counts, percentage and status
//! - [`RecordFilter`] and [`filter_options`]: the kecamatan/tahun selection
//! - [`DashboardSummary`]: headline totals
//! - [`area_centroids`] and [`map_center`]: marker positions

mod error;
mod filter;
mod stats;
mod summary;

pub use error::{AggregateError, Result};
pub use filter::{ALL_OPTION, FilterOptions, RecordFilter, filter_options};
pub use stats::compute_area_stats;
pub use summary::{Centroid, DashboardSummary, area_centroids, map_center};
