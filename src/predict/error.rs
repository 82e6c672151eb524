use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Invalid orbital elements: {0}")]
    InvalidElements(String),
    #[error("Propagation error: {0}")]
    Propagation(String),
    #[error("Forecast grid step must be positive")]
    InvalidStep,
    #[error("Forecast window of {0} days is out of range")]
    WindowOverflow(u32),
    #[error("Forecast grid is empty")]
    EmptyGrid,
    #[error("Position series has {positions} samples but the grid has {grid}")]
    SeriesMismatch { positions: usize, grid: usize },
}
