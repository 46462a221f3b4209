use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum SimulatorError {
    // Trace errors
    ParseError(String),

    // Register file errors
    InvalidRegisterName(String),
    RegisterOutOfRange(usize),

    // Dispatch errors
    UnsupportedOperation { unit: String, op: String },

    // System errors
    IoError(std::io::Error),
}

impl fmt::Display for SimulatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulatorError::ParseError(message) => {
                write!(f, "Parse error: {}", message)
            },
            SimulatorError::InvalidRegisterName(name) => {
                write!(f, "Invalid register name: {}", name)
            },
            SimulatorError::RegisterOutOfRange(index) => {
                write!(f, "Register index out of range: {}", index)
            },
            SimulatorError::UnsupportedOperation { unit, op } => {
                write!(f, "Operation {} is unsupported in unit {}", op, unit)
            },
            SimulatorError::IoError(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl Error for SimulatorError {}

impl From<std::io::Error> for SimulatorError {
    fn from(error: std::io::Error) -> Self {
        SimulatorError::IoError(error)
    }
}
