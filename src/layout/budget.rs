use super::LayoutConfig;

/// Height bookkeeping for the page currently being filled.
#[derive(Clone, Debug)]
pub struct PageBudget {
    available: f32,
    used: f32,
    blocks: usize,
}

impl PageBudget {
    pub fn new(config: &LayoutConfig) -> Self {
        Self::with_available(config.available_height())
    }

    pub fn with_available(available: f32) -> Self {
        Self {
            available,
            used: 0.0,
            blocks: 0,
        }
    }

    pub fn available(&self) -> f32 {
        self.available
    }

    pub fn used(&self) -> f32 {
        self.used
    }

    pub fn is_empty(&self) -> bool {
        self.blocks == 0
    }

    pub fn remaining(&self) -> f32 {
        (self.available - self.used).max(0.0)
    }

    /// Spacing is charged between blocks, never before the first one.
    pub fn spacing_before_next(&self, spacing: f32) -> f32 {
        if self.is_empty() { 0.0 } else { spacing }
    }

    /// Height a next block may use, after its leading spacing.
    pub fn remaining_for_next(&self, spacing: f32) -> f32 {
        (self.remaining() - self.spacing_before_next(spacing)).max(0.0)
    }

    pub fn would_fit(&self, height: f32, spacing: f32) -> bool {
        self.used + self.spacing_before_next(spacing) + height <= self.available
    }

    pub fn place(&mut self, height: f32, spacing: f32) {
        self.used += self.spacing_before_next(spacing) + height;
        self.blocks += 1;
    }
}
