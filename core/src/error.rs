//! Error type shared by every `sprig` crate.

use alloc::string::String;

/// Errors raised by document primitives, element construction and the render cycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A tag or attribute name is not a valid XML name.
    #[error("`{name}` is not a valid element or attribute name")]
    InvalidCharacter {
        /// The rejected name.
        name: String,
    },
    /// The requested insertion would produce an invalid tree.
    #[error("hierarchy request error: {0}")]
    HierarchyRequest(&'static str),
    /// A reference node is not a child of the node being modified.
    #[error("reference node is not a child of this node")]
    NotFound,
    /// An event-binding attribute carried a value that cannot be called.
    #[error("value bound to `{key}` is not invocable")]
    NotInvocable {
        /// The event-binding key, including its prefix.
        key: String,
    },
    /// A component was rendered or updated before any state was installed.
    #[error("component {id} has no state installed")]
    StateNotInstalled {
        /// Identity of the offending component.
        id: String,
    },
    /// A component's state was written while that component was rendering.
    #[error("component {id} was updated while it was rendering")]
    ReentrantUpdate {
        /// Identity of the offending component.
        id: String,
    },
    /// A render implementation failed.
    #[error("render failed: {0}")]
    Render(String),
    /// Configuration could not be read or parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Creates a [`Error::Render`] from any displayable message.
    #[must_use]
    pub fn render(message: impl core::fmt::Display) -> Self {
        Self::Render(alloc::format!("{message}"))
    }
}

/// Result alias used across the workspace.
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_names_the_offending_value() {
        let error = Error::InvalidCharacter { name: "a b".into() };
        assert_eq!(
            error.to_string(),
            "`a b` is not a valid element or attribute name"
        );
    }

    #[test]
    fn render_helper_formats_message() {
        assert_eq!(
            Error::render(format_args!("counter {}", 3)),
            Error::Render("counter 3".into())
        );
    }
}
