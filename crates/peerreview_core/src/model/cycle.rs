//! Review cycle model.

use serde::{Deserialize, Serialize};

/// Named feedback period.
///
/// `is_open` is informational only: writes against a closed cycle are not
/// rejected by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    pub name: String,
    pub is_open: bool,
}
