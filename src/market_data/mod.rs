pub mod candle_series;

pub use candle_series::{validate, RawCandle};
