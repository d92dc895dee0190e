//! Report source access port trait.

use crate::domain::error::CotError;

/// One report source: `id` tags the entries parsed from it, `location` says
/// where the adapter reads it from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRef {
    pub id: String,
    pub location: String,
}

pub trait SourcePort {
    /// Available sources, in the order they should be parsed.
    fn sources(&self) -> Result<Vec<SourceRef>, CotError>;

    /// Text of the source's preformatted report region, `None` when it has none.
    fn load_text(&self, source: &SourceRef) -> Result<Option<String>, CotError>;
}
