pub mod compact;
pub mod observation;
pub mod schema;
pub mod table;

pub use compact::{ColumnData, CompactColumn, CompactTable, NumericWidth};
pub use observation::WeatherObservation;
pub use schema::{header_row, ColumnKind, WeatherColumn, WeatherField, WEATHER_COLUMNS};
pub use table::{WeatherTable, LOADED_ROW_BYTES};
