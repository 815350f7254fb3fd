use envgraph_core::EngineError;
use thiserror::Error;

/// Errors raised while preparing or running a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("failed to read weather data: {0}")]
    Weather(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("surface references unknown wall '{0}'")]
    UnknownWall(String),
    #[error("weather series holds {got} hours but the run needs {need}")]
    WeatherTooShort { got: usize, need: usize },
}
