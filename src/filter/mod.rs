mod scaled_average;

pub use scaled_average::ScaledAverage;
