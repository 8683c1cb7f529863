use crate::ComponentId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("parse error at offset {offset}: {message}")]
pub struct ParseError {
    pub offset: usize,
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(offset: usize, message: impl Into<String>) -> Self {
        ParseError { offset, message: message.into() }
    }
}

/// Every failure that aborts a translation.
///
/// Unhandled component kinds are not errors; they are reported as warnings by the emitter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("malformed {field} {value:?}{}", display_owner(.id))]
    MalformedLiteral { id: Option<ComponentId>, field: String, value: String },

    #[error("component record has no number")]
    MissingNumber,

    #[error("component number 0 is reserved")]
    ReservedId,

    #[error("component {0} is declared more than once")]
    DuplicateId(ComponentId),

    #[error("component {id} refers to nonexistent component {target} in field {field}")]
    UnknownComponent { id: ComponentId, field: &'static str, target: ComponentId },

    #[error("component {id} refers to component {target} in field {field}, which is not a bus")]
    NotABus { id: ComponentId, field: &'static str, target: ComponentId },

    #[error("component {id} is missing required field {field}")]
    MissingField { id: ComponentId, field: &'static str },

    #[error("component {id} reads bus {bus}, but its driver {driver} holds no value")]
    NoStorage { id: ComponentId, bus: ComponentId, driver: ComponentId },

    #[error("component {id} has no input at position {index}")]
    MissingInput { id: ComponentId, index: usize },

    #[error("bus chain does not converge; unresolved buses: {}", display_ids(.buses))]
    CyclicBusChain { buses: Vec<ComponentId> },

    #[error("component {id} needs {kind} pin line {line}, but only {available} exist")]
    PinsExhausted { id: ComponentId, kind: &'static str, line: usize, available: usize },
}

fn display_owner(id: &Option<ComponentId>) -> String {
    match id {
        Some(id) => format!(" in component {id}"),
        None => String::new(),
    }
}

fn display_ids(ids: &[ComponentId]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
