pub mod concurrent_reader;
pub mod weather_reader;

pub use concurrent_reader::ConcurrentReader;
pub use weather_reader::WeatherReader;
