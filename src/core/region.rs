use serde::{Deserialize, Serialize};

/// A maximal stretch of target sequence whose k-mers are all absent from the background.
///
/// `end` is exclusive and `length == end - start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRegion {
    /// Identifier of the target sequence the region was found in
    pub sequence_id: String,

    /// 0-based start offset
    pub start: usize,

    /// Exclusive end offset
    pub end: usize,

    /// `end - start`
    pub length: usize,

    /// The unique sequence itself
    pub sequence: String,
}

impl SignatureRegion {
    pub fn new(
        sequence_id: impl Into<String>,
        start: usize,
        end: usize,
        sequence: impl Into<String>,
    ) -> Self {
        Self {
            sequence_id: sequence_id.into(),
            start,
            end,
            length: end - start,
            sequence: sequence.into(),
        }
    }

    /// True if every symbol in the region is `symbol` (e.g. a run of spacer `N`s)
    #[must_use]
    pub fn consists_only_of(&self, symbol: u8) -> bool {
        !self.sequence.is_empty() && self.sequence.bytes().all(|b| b == symbol)
    }
}
