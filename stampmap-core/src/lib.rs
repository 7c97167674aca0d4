//! Stampmap Core Library
//!
//! Field-placement engine for document form mappings: the mapping data
//! model, document/screen coordinate transform, placement state machine,
//! hit-test and drag engine, artifact filename codec, and the data
//! template generator.

pub mod types;
pub mod coords;
pub mod placement;
pub mod hittest;
pub mod artifact;
pub mod template;
pub mod overlay;
pub mod mapping;
pub mod session;

// Re-export commonly used types and functions
pub use types::{Align, FieldRecord, MappingDocument, TextKind, DEFAULT_FONT_SIZE, RESERVED_USER_FIELD};
pub use coords::{DocPoint, ScreenPoint, Transform};
pub use placement::{ClickOutcome, NudgeDirection, PlacementState};
pub use hittest::{DragEngine, DragTarget, HitTarget, MoveSlot};
pub use artifact::{ArtifactDescriptor, ArtifactError, ArtifactKind};
pub use template::DataTemplate;
pub use mapping::{MappingError, PreviewData};
pub use session::{EditorSession, PointerOutcome, Viewport};

/// Version information for the Stampmap core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
