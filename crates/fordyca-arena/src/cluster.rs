//! Block clusters produced by clustered block distributions.

use fordyca_core::{BlockId, ClusterId, Entity2D, RealRange, Vec2};

/// A rectangular region blocks are distributed into.
///
/// Clusters are owned by the block distribution; the cache subsystem only
/// reads them, as exclusion zones and to tell clustered blocks apart.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockCluster {
    id: ClusterId,
    xspan: RealRange,
    yspan: RealRange,
    blocks: Vec<BlockId>,
}

impl BlockCluster {
    /// An empty cluster covering `xspan x yspan`.
    pub fn new(id: ClusterId, xspan: RealRange, yspan: RealRange) -> Self {
        Self {
            id,
            xspan,
            yspan,
            blocks: Vec::new(),
        }
    }

    /// Cluster id.
    pub fn id(&self) -> ClusterId {
        self.id
    }

    /// Record that `block` was distributed into this cluster.
    pub fn block_add(&mut self, block: BlockId) {
        if !self.blocks.contains(&block) {
            self.blocks.push(block);
        }
    }

    /// Blocks currently in the cluster.
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    /// `true` if `block` is in the cluster.
    pub fn contains_block(&self, block: BlockId) -> bool {
        self.blocks.contains(&block)
    }
}

impl Entity2D for BlockCluster {
    fn rcenter2d(&self) -> Vec2 {
        Vec2::new(self.xspan.center(), self.yspan.center())
    }

    fn xrspan(&self) -> RealRange {
        self.xspan
    }

    fn yrspan(&self) -> RealRange {
        self.yspan
    }
}
