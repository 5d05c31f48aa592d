//! Position indicator shown above the content when paging through sources

use serde::{Deserialize, Serialize};

pub const DEFAULT_NORMAL_SIGIL: &str = "○";
pub const DEFAULT_SELECTED_SIGIL: &str = "●";

/// Paging sigils, one per source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sigils {
    pub normal: String,
    pub selected: String,
}

impl Default for Sigils {
    fn default() -> Self {
        Self {
            normal: DEFAULT_NORMAL_SIGIL.to_string(),
            selected: DEFAULT_SELECTED_SIGIL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionIndicator {
    /// `○●○` right-aligned to the host width
    Sigils(Sigils),
    /// `2/3`
    Fraction,
}

impl Default for PositionIndicator {
    fn default() -> Self {
        PositionIndicator::Sigils(Sigils::default())
    }
}

impl PositionIndicator {
    /// Indicator text for `index` of `len`, always newline-terminated; a
    /// bare newline when there is nothing to page through
    pub fn render(&self, index: usize, len: usize, width: usize) -> String {
        if len <= 1 {
            return "\n".to_string();
        }
        match self {
            PositionIndicator::Sigils(sigils) => {
                let pages: String = (0..len)
                    .map(|i| {
                        if i == index {
                            sigils.selected.as_str()
                        } else {
                            sigils.normal.as_str()
                        }
                    })
                    .collect();
                format!("{:>width$}\n", pages, width = width)
            }
            PositionIndicator::Fraction => format!("{}/{}\n", index + 1, len),
        }
    }
}
