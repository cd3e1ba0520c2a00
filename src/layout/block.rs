/// Tag of a content block, used to look up its height strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    TextPanel,
    ParameterTable,
    PhotoGrid,
    Chart,
    EmptyState,
}

/// A unit of document content. Row and photo order inside a payload is
/// significant and survives every split.
#[derive(Clone, Debug, PartialEq)]
pub enum ContentSection {
    TextPanel(TextPanel),
    ParameterTable(ParameterTable),
    PhotoGrid(PhotoGrid),
    Chart(Chart),
    EmptyState(EmptyState),
}

impl ContentSection {
    pub fn kind(&self) -> BlockKind {
        match self {
            ContentSection::TextPanel(_) => BlockKind::TextPanel,
            ContentSection::ParameterTable(_) => BlockKind::ParameterTable,
            ContentSection::PhotoGrid(_) => BlockKind::PhotoGrid,
            ContentSection::Chart(_) => BlockKind::Chart,
            ContentSection::EmptyState(_) => BlockKind::EmptyState,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ContentSection::TextPanel(p) => &p.title,
            ContentSection::ParameterTable(t) => &t.title,
            ContentSection::PhotoGrid(g) => &g.title,
            ContentSection::Chart(c) => &c.title,
            ContentSection::EmptyState(e) => &e.message,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PanelKind {
    Cover,
    PartDetails,
    GeneralParameters,
    Load,
    Quench,
    ResultHeader,
    SampleHeader,
    Specification,
    Note,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub label: String,
    pub value: String,
}

impl Field {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Labelled key/value panel with an optional free-text comment.
#[derive(Clone, Debug, PartialEq)]
pub struct TextPanel {
    pub kind: PanelKind,
    pub title: String,
    pub fields: Vec<Field>,
    pub comment: Option<String>,
}

impl TextPanel {
    pub fn new(kind: PanelKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            fields: Vec::new(),
            comment: None,
        }
    }

    pub fn field(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(Field::new(label, value));
        self
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    /// True when the comment carries visible text.
    pub fn has_comment(&self) -> bool {
        self.comment.as_deref().is_some_and(|c| !c.trim().is_empty())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TableKind {
    ThermalCycle,
    ChemicalCycle,
    QuenchParameters,
    Hardness,
    Generic,
}

/// Table whose row count depends on the data. The summary row, when present,
/// is only drawn once every row has been shown.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterTable {
    pub kind: TableKind,
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub summary: Option<Vec<String>>,
}

impl ParameterTable {
    pub fn new(kind: TableKind, title: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            columns,
            rows: Vec::new(),
            summary: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PhotoRef {
    /// Identifier understood by the file store.
    pub id: String,
    pub caption: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PhotoGrid {
    pub title: String,
    pub photos: Vec<PhotoRef>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub label: String,
    pub color: [u8; 3],
    pub points: Vec<(f32, f32)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

impl Chart {
    pub fn has_data(&self) -> bool {
        self.series.iter().any(|s| !s.points.is_empty())
    }
}

/// Shown only when a report section has nothing else to display.
#[derive(Clone, Debug, PartialEq)]
pub struct EmptyState {
    pub message: String,
}
