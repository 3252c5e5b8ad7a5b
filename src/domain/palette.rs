// Node color palette
use super::measurement::NodeId;

pub const DEFAULT_COLORS: [&str; 4] = ["#f89b15", "#e9513e", "#73b127", "#587ee6"];

/// Maps node ids onto a fixed list of colors. Pure: the same node always gets the same color.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    /// An empty color list falls back to [`DEFAULT_COLORS`].
    pub fn new(colors: Vec<String>) -> Self {
        if colors.is_empty() {
            return Self::default();
        }
        Self { colors }
    }

    pub fn color_for(&self, node_id: NodeId) -> &str {
        let index = node_id as usize % self.colors.len();
        &self.colors[index]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }
}
