pub mod derive;
pub mod types;

pub use derive::{derive_column_kinds, ColumnKind, ColumnProfile};
pub use types::{FilterConfig, FlowRecord, LatLon, Purpose, YearFilter};

/// Input columns the selector and coordinate repair read.
pub mod columns {
    pub const YEAR: &str = "year";
    pub const ORIGIN_NAME: &str = "origin_name";
    pub const DESTINATION_NAME: &str = "destination_name";
    pub const LAT_O: &str = "lat_o";
    pub const LON_O: &str = "lon_o";
    pub const LAT_D: &str = "lat_d";
    pub const LON_D: &str = "lon_d";
    pub const LEISURE: &str = "total_wt_l_all";
    pub const BUSINESS: &str = "total_wt_b_all";
    pub const TOTAL: &str = "total_wt_t_all";

    pub const ALL: [&str; 10] = [
        YEAR,
        ORIGIN_NAME,
        DESTINATION_NAME,
        LAT_O,
        LON_O,
        LAT_D,
        LON_D,
        LEISURE,
        BUSINESS,
        TOTAL,
    ];
}
