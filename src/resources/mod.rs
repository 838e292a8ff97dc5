//! Idempotent resource primitives (check + apply pattern) and the external
//! collaborators every install step is built from.
pub mod archive;
pub mod aur;
pub mod config_file;
pub mod git;
pub mod package;

use anyhow::Result;

/// State of a resource on the host.
///
/// # Examples
///
/// ```
/// use mango_installer::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let wrong = ResourceState::Incorrect { current: "mode 600".into() };
///
/// assert_ne!(missing, ResourceState::Correct);
/// assert_ne!(wrong, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource does not exist or is not present.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Resource exists but does not match the desired state.
    Incorrect {
        /// The current value of the resource.
        current: String,
    },
}

/// Result of applying a resource change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
}

/// A resource that can describe, inspect and converge itself.
pub trait Resource {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be determined due to I/O failures.
    fn current_state(&self) -> Result<ResourceState>;

    /// Update the resource to match the desired state.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be written.
    fn apply(&self) -> Result<ResourceChange>;

    /// Apply only when the current state differs from the desired one.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`current_state`](Self::current_state) and
    /// [`apply`](Self::apply).
    fn ensure(&self) -> Result<ResourceChange> {
        match self.current_state()? {
            ResourceState::Correct => Ok(ResourceChange::AlreadyCorrect),
            ResourceState::Missing | ResourceState::Incorrect { .. } => self.apply(),
        }
    }
}
