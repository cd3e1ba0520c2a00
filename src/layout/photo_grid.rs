/// Grid shape for a group of photos. Shared by the height estimator and the
/// PDF renderer so the estimate never diverges from what is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    /// Drawn photo height, excluding the per-row padding.
    pub photo_height: f32,
}

impl GridLayout {
    pub fn rows(&self, photo_count: usize) -> usize {
        photo_count.div_ceil(self.columns.max(1))
    }
}

pub fn layout(photo_count: usize) -> GridLayout {
    match photo_count {
        0 | 1 => GridLayout {
            columns: 1,
            photo_height: 300.0,
        },
        2 => GridLayout {
            columns: 2,
            photo_height: 250.0,
        },
        3..=4 => GridLayout {
            columns: 2,
            photo_height: 200.0,
        },
        _ => GridLayout {
            columns: 3,
            photo_height: 150.0,
        },
    }
}
