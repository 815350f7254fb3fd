use crate::Tick;
use thiserror::Error;

/// Error type for wiring, validation and evaluation failures.
///
/// Wiring and cycle errors are fatal at build time: there is no partial or
/// degraded graph. Out-of-range reads on data-backed ports are recoverable
/// and surface through `get`/`advance` rather than panicking.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("forward port '{port}' was read before being bound")]
    UnboundForwardPort { port: String },
    #[error("forward port '{port}' is already bound")]
    AlreadyBound { port: String },
    #[error("forward ports left unbound after build: {ports}")]
    UnboundAfterBuild { ports: String },
    #[error("module '{module}' is missing required input '{input}'")]
    MissingInput { module: String, input: String },
    #[error("module '{module}' has already been built")]
    AlreadyBuilt { module: String },
    #[error("combinational cycle with no gate in the loop: {ports}")]
    CombinationalCycle { ports: String },
    #[error("tick {tick} is outside the range of data port '{port}' (length {len})")]
    TickOutOfRange { port: String, tick: Tick, len: usize },
    #[error("{0}")]
    InvalidConfiguration(String),
}

/// Convenience type for `Result<T, EngineError>`.
pub type EngineResult<T> = Result<T, EngineError>;
