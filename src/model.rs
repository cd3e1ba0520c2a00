use serde::Deserialize;

use crate::layout::LayoutConfig;

/// A heat-treatment trial report as exported by the trial database.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Report {
    pub trial: Trial,
    pub client: Client,
    pub sections: SectionSelection,
    pub part: Option<Part>,
    pub recipe: Option<Recipe>,
    pub load: Option<LoadData>,
    pub curves: Vec<FurnaceCurve>,
    pub results: Vec<ControlResult>,
    pub photos: PhotoSelection,
    pub layout: LayoutConfig,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Trial {
    pub code: String,
    pub name: String,
    pub load_number: String,
    /// ISO date, printed as given.
    pub date: Option<String>,
    pub process_type: String,
    pub location: String,
    pub status: String,
    /// Free-text observations recorded after the trial.
    pub observation: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Client {
    pub name: String,
    pub city: String,
    pub country: String,
}

/// Which report sections to include. Everything is on unless switched off.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SectionSelection {
    pub cover: bool,
    pub identification: bool,
    pub recipe: bool,
    pub load: bool,
    pub curves: bool,
    pub datapaq: bool,
    pub post_treatment: bool,
    pub micrography: bool,
    pub control: bool,
    pub observations: bool,
    pub recipe_options: RecipeOptions,
}

impl Default for SectionSelection {
    fn default() -> Self {
        Self {
            cover: true,
            identification: true,
            recipe: true,
            load: true,
            curves: true,
            datapaq: true,
            post_treatment: true,
            micrography: true,
            control: true,
            observations: true,
            recipe_options: RecipeOptions::default(),
        }
    }
}

/// What the recipe section shows besides its general parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RecipeOptions {
    /// Cycle and quench tables.
    pub show_details: bool,
    /// Temperature and gas flow chart.
    pub show_curve: bool,
}

impl Default for RecipeOptions {
    fn default() -> Self {
        Self {
            show_details: true,
            show_curve: true,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Measure {
    pub value: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

impl Measure {
    pub fn display(&self, default_unit: &str) -> String {
        format!(
            "{} {}",
            format_number(self.value),
            self.unit.as_deref().unwrap_or(default_unit)
        )
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Part {
    pub designation: String,
    pub reference: String,
    pub quantity: Option<u32>,
    pub steel: String,
    pub dimensions: Vec<Dimension>,
    pub comments: Option<String>,
    pub specifications: Option<Specifications>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Dimension {
    pub label: String,
    pub value: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Specifications {
    pub surface_hardness_min: Option<f64>,
    pub surface_hardness_max: Option<f64>,
    pub core_hardness_min: Option<f64>,
    pub core_hardness_max: Option<f64>,
    pub hardness_unit: Option<String>,
    pub ecd: Option<EcdSpecification>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct EcdSpecification {
    pub depth_min: f64,
    pub depth_max: f64,
    pub hardness: f64,
    pub unit: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Recipe {
    pub number: String,
    pub cell_temp: Option<Measure>,
    pub wait_time: Option<Measure>,
    pub program_duration: Option<Measure>,
    pub thermal_cycle: Vec<ThermalStep>,
    pub chemical_cycle: Vec<ChemicalStep>,
    pub selected_gases: Vec<String>,
    pub quench: Option<Quench>,
}

impl Recipe {
    pub fn is_empty(&self) -> bool {
        self.number.is_empty()
            && self.cell_temp.is_none()
            && self.wait_time.is_none()
            && self.thermal_cycle.is_empty()
            && self.chemical_cycle.is_empty()
            && self.quench.is_none()
    }

    /// Wait time before the cycles start, in seconds.
    pub fn wait_seconds(&self) -> f64 {
        match &self.wait_time {
            Some(m) if m.unit.as_deref() == Some("min") => m.value * 60.0,
            Some(m) => m.value,
            None => 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ramp {
    #[default]
    Up,
    Down,
    Continue,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ThermalStep {
    pub step: u32,
    #[serde(default)]
    pub ramp: Ramp,
    /// Target temperature in °C.
    pub setpoint: f64,
    /// Minutes.
    pub duration: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GasFlow {
    pub gas: String,
    /// Nl/h.
    pub debit: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChemicalStep {
    pub step: u32,
    /// Seconds.
    pub time: f64,
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub gases: Vec<GasFlow>,
    #[serde(default)]
    pub turbine: bool,
}

impl ChemicalStep {
    pub fn debit(&self, gas: &str) -> Option<f64> {
        self.gases.iter().find(|g| g.gas == gas).map(|g| g.debit)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Quench {
    pub oil: Option<OilQuench>,
    pub gas: Option<GasQuench>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OilQuench {
    pub temperature: Option<Measure>,
    pub inerting_pressure: Option<f64>,
    pub inerting_delay: Option<Measure>,
    pub dripping_time: Option<Measure>,
    pub speed_parameters: Vec<SpeedStep>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GasQuench {
    pub speed_parameters: Vec<SpeedStep>,
    pub pressure_parameters: Vec<PressureStep>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SpeedStep {
    pub step: u32,
    pub duration: f64,
    pub speed: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PressureStep {
    pub step: u32,
    pub duration: f64,
    pub pressure: f64,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoadData {
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub size_unit: Option<String>,
    pub floor_count: Option<u32>,
    pub part_count: Option<u32>,
    pub weight: Option<Measure>,
    pub comments: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct FurnaceCurve {
    pub name: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<CurveSeries>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CurveSeries {
    pub label: String,
    pub points: Vec<[f64; 2]>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ControlResult {
    pub step: u32,
    pub description: String,
    pub samples: Vec<Sample>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Sample {
    pub step: u32,
    pub description: String,
    pub hardness_points: Vec<HardnessPoint>,
    pub ecd: Option<Ecd>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct HardnessPoint {
    pub location: String,
    pub value: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Ecd {
    pub hardness_unit: Option<String>,
    pub points: Vec<EcdPoint>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EcdPoint {
    /// Depth below the surface, mm.
    pub distance: f64,
    pub hardness: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Photo {
    /// File store identifier.
    pub id: String,
    #[serde(default)]
    pub caption: Option<String>,
}

/// Photos attached to a subcategory of a report section ("front view", ...).
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PhotoCategory {
    pub name: String,
    pub photos: Vec<Photo>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Micrograph {
    pub result_index: usize,
    pub sample_index: usize,
    pub magnification: String,
    pub photo: Photo,
}

/// Photo of where a sample was taken on the part.
#[derive(Clone, Debug, Deserialize)]
pub struct ControlLocation {
    pub result_index: usize,
    pub sample_index: usize,
    pub photo: Photo,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PhotoSelection {
    pub identification: Vec<PhotoCategory>,
    pub load: Vec<Photo>,
    pub curves: Vec<Photo>,
    pub datapaq: Vec<Photo>,
    pub post_treatment: Vec<Photo>,
    pub micrography: Vec<Micrograph>,
    pub control_location: Vec<ControlLocation>,
    pub observations: Vec<Photo>,
}

/// Integers without a trailing ".0", others with up to two decimals.
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{v:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
