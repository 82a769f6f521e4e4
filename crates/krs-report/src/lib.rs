//! Report generation for stunting risk data.
//!
//! - **Risk map** ([`RiskMap`]): one marker per area at its centroid, green for
//!   `Aman` and red for `Rentan Stunting`, written as a standalone Leaflet page
//!   or as GeoJSON
//! - **Popups** ([`popup_text`], [`popup_html`]): the per-area summary
//! - **Tables** ([`write_table`]): normalized datasets as XLSX or CSV
//! - **Template** ([`write_template`]): a sample upload with the expected columns

mod error;
mod map;
mod markers;
mod table;
mod template;

pub use error::{ReportError, Result};
pub use map::{DEFAULT_ZOOM, MapOptions, RiskMap};
pub use markers::{AreaMarker, MarkerColor, build_markers, popup_html, popup_text};
pub use table::{TableFormat, write_csv, write_table, write_xlsx};
pub use template::{sample_upload, write_template};
