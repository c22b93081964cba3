//! Visibility controller.

use calliper_core::identifier::SourceId;

/// A request for the host to hide a source element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisibilityInstruction {
    source: SourceId,
}

impl VisibilityInstruction {
    pub fn hide(source: SourceId) -> Self {
        Self { source }
    }

    pub fn source(&self) -> SourceId {
        self.source
    }
}

/// Returns the instruction to hide `source` when `hide` is set.
///
/// Only called once synthesis has succeeded for the element, so a skipped
/// element is never hidden.
pub fn visibility_for(source: SourceId, hide: bool) -> Option<VisibilityInstruction> {
    hide.then(|| VisibilityInstruction::hide(source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_follows_flag() {
        let source = SourceId::new("bracket");
        assert_eq!(
            visibility_for(source, true).map(|i| i.source()),
            Some(source)
        );
        assert_eq!(visibility_for(source, false), None);
    }
}
