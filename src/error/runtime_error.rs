#[derive(Debug)]
/// Represents all errors that can be raised during evaluation.
pub enum RuntimeError {
    /// Tried to read a name that is not defined in any visible scope.
    UnknownIdentifier {
        /// The name that failed to resolve.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Tried to instantiate a class that was never declared.
    UnknownClass {
        /// The class name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Dereferenced a null handle.
    NullHandle {
        /// The source line where the error occurred.
        line: usize,
    },
    /// The left side of an assignment is not something assignable.
    InvalidAssignmentTarget {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Indexed an array outside its bounds.
    IndexOutOfBounds {
        /// The index that was requested.
        index: i64,
        /// The length of the array.
        len:   usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Accessed a member or method that the value does not have.
    UnknownMember {
        /// A description of the value's type.
        type_name: String,
        /// The member name that failed to resolve.
        member:    String,
        /// The source line where the error occurred.
        line:      usize,
    },
    /// Called a value that is not a function.
    NotCallable {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Resolved an enum type but not the requested member.
    UnknownEnumMember {
        /// The enum name.
        name:   String,
        /// The member that failed to resolve.
        member: String,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// An operation was applied to values it does not support.
    InvalidOperation {
        /// Details about what went wrong.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownIdentifier { name, line } => {
                write!(f, "Error on line {line}: Unknown identifier '{name}'.")
            },
            Self::UnknownClass { name, line } => {
                write!(f, "Error on line {line}: Unknown class '{name}'.")
            },
            Self::NullHandle { line } => {
                write!(f, "Error on line {line}: Null handle access.")
            },
            Self::InvalidAssignmentTarget { line } => {
                write!(f, "Error on line {line}: Invalid assignment target.")
            },
            Self::IndexOutOfBounds { index, len, line } => {
                write!(f, "Error on line {line}: Index {index} out of bounds for array of length {len}.")
            },
            Self::UnknownMember { type_name,
                                  member,
                                  line, } => {
                write!(f, "Error on line {line}: {type_name} has no member '{member}'.")
            },
            Self::NotCallable { line } => {
                write!(f, "Error on line {line}: Value is not callable.")
            },
            Self::UnknownEnumMember { name, member, line } => {
                write!(f, "Error on line {line}: Enum '{name}' has no member '{member}'.")
            },
            Self::InvalidOperation { details, line } => {
                write!(f, "Error on line {line}: {details}.")
            },
        }
    }
}

impl std::error::Error for RuntimeError {}
