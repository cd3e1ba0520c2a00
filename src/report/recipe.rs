use crate::layout::{
    Chart, ContentSection, Field, PanelKind, ParameterTable, Series, TableKind, TextPanel,
};
use crate::model::{Quench, Ramp, Recipe, Report, format_number};

use super::{or_unspecified, series_color};

pub(super) fn assemble(report: &Report) -> Vec<ContentSection> {
    let Some(recipe) = report.recipe.as_ref().filter(|r| !r.is_empty()) else {
        return Vec::new();
    };

    let options = report.sections.recipe_options;

    let mut blocks = vec![ContentSection::TextPanel(general_parameters(recipe))];
    if options.show_details {
        blocks.push(ContentSection::ParameterTable(thermal_cycle(recipe)));
        blocks.push(ContentSection::ParameterTable(chemical_cycle(recipe)));
    }
    if options.show_curve
        && let Some(chart) = cycle_chart(recipe)
    {
        blocks.push(ContentSection::Chart(chart));
    }
    if options.show_details
        && let Some(quench) = &recipe.quench
    {
        blocks.extend(quench_blocks(quench));
    }
    blocks
}

fn thermal_minutes(recipe: &Recipe) -> f64 {
    recipe.thermal_cycle.iter().map(|s| s.duration).sum()
}

/// Chemical step time plus the wait time, in seconds.
fn chemical_seconds(recipe: &Recipe) -> f64 {
    recipe.chemical_cycle.iter().map(|s| s.time).sum::<f64>() + recipe.wait_seconds()
}

fn min_sec(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    format!("{} min {} s", total / 60, total % 60)
}

fn general_parameters(recipe: &Recipe) -> TextPanel {
    TextPanel::new(PanelKind::GeneralParameters, "General parameters")
        .field("Recipe number", or_unspecified(&recipe.number))
        .field(
            "Cell temperature",
            recipe
                .cell_temp
                .as_ref()
                .map(|m| m.display("°C"))
                .unwrap_or_else(|| "Not specified".to_string()),
        )
        .field(
            "Wait time",
            recipe
                .wait_time
                .as_ref()
                .map(|m| m.display("s"))
                .unwrap_or_else(|| "Not specified".to_string()),
        )
        .field(
            "Program duration",
            recipe
                .program_duration
                .as_ref()
                .map(|m| m.display("min"))
                .unwrap_or_else(|| "Not specified".to_string()),
        )
        .field(
            "Thermal cycle",
            format!("{} min", format_number(thermal_minutes(recipe))),
        )
        .field("Chemical cycle", min_sec(chemical_seconds(recipe)))
}

fn ramp_label(ramp: Ramp) -> &'static str {
    match ramp {
        Ramp::Up => "Heating",
        Ramp::Down => "Cooling",
        Ramp::Continue => "Hold",
    }
}

fn thermal_cycle(recipe: &Recipe) -> ParameterTable {
    let columns = ["Step", "Ramp", "Temperature (°C)", "Duration (min)"]
        .map(String::from)
        .to_vec();
    let mut table = ParameterTable::new(TableKind::ThermalCycle, "Thermal cycle", columns);
    table.rows = recipe
        .thermal_cycle
        .iter()
        .map(|s| {
            vec![
                s.step.to_string(),
                ramp_label(s.ramp).to_string(),
                format_number(s.setpoint),
                format_number(s.duration),
            ]
        })
        .collect();
    table.summary = Some(vec![
        "Total".to_string(),
        String::new(),
        String::new(),
        format!("{} min", format_number(thermal_minutes(recipe))),
    ]);
    table
}

fn chemical_cycle(recipe: &Recipe) -> ParameterTable {
    let mut columns = vec![
        "Step".to_string(),
        "Duration (s)".to_string(),
        "Pressure (mbar)".to_string(),
    ];
    columns.extend(recipe.selected_gases.iter().map(|g| format!("{g} (Nl/h)")));
    columns.push("Turbine".to_string());

    let mut table = ParameterTable::new(TableKind::ChemicalCycle, "Chemical cycle", columns);
    table.rows = recipe
        .chemical_cycle
        .iter()
        .map(|s| {
            let mut row = vec![
                s.step.to_string(),
                format_number(s.time),
                s.pressure.map(format_number).unwrap_or_else(|| "-".to_string()),
            ];
            row.extend(recipe.selected_gases.iter().map(|g| {
                s.debit(g)
                    .map(format_number)
                    .unwrap_or_else(|| "-".to_string())
            }));
            row.push(if s.turbine { "Yes" } else { "No" }.to_string());
            row
        })
        .collect();

    let step_seconds: f64 = recipe.chemical_cycle.iter().map(|s| s.time).sum();
    let mut summary = vec![
        "Total".to_string(),
        format!("{} s", format_number(step_seconds)),
        String::new(),
    ];
    summary.extend(recipe.selected_gases.iter().map(|_| String::new()));
    summary.push(format!("{} incl. wait", min_sec(chemical_seconds(recipe))));
    table.summary = Some(summary);
    table
}

/// Temperature profile and per-gas flow over time, in minutes. Needs both
/// cycles; gases without any positive flow are left out.
fn cycle_chart(recipe: &Recipe) -> Option<Chart> {
    if recipe.thermal_cycle.is_empty() || recipe.chemical_cycle.is_empty() {
        return None;
    }

    let cell_temp = recipe.cell_temp.as_ref().map(|m| m.value).unwrap_or(20.0) as f32;
    let wait_min = (recipe.wait_seconds() / 60.0) as f32;

    let mut temperature = vec![(0.0, cell_temp), (wait_min, cell_temp)];
    let mut offset = wait_min;
    let mut previous = cell_temp;
    for step in &recipe.thermal_cycle {
        let duration = step.duration as f32;
        temperature.push((offset, previous));
        temperature.push((offset + duration, step.setpoint as f32));
        offset += duration;
        previous = step.setpoint as f32;
    }

    let mut series = vec![Series {
        label: "Temperature (°C)".to_string(),
        color: series_color(0),
        points: temperature,
    }];

    for (gi, gas) in recipe.selected_gases.iter().enumerate() {
        let mut points = Vec::new();
        let mut t = wait_min;
        for step in &recipe.chemical_cycle {
            let end = t + (step.time / 60.0) as f32;
            if let Some(debit) = step.debit(gas).filter(|d| *d > 0.0) {
                points.push((t, debit as f32));
                points.push((end, debit as f32));
            }
            t = end;
        }
        if !points.is_empty() {
            series.push(Series {
                label: format!("{gas} flow (Nl/h)"),
                color: series_color(gi + 1),
                points,
            });
        }
    }

    Some(Chart {
        title: "Temperature and gas flows".to_string(),
        x_label: "Time (min)".to_string(),
        y_label: "Temperature (°C) / Flow (Nl/h)".to_string(),
        series,
    })
}

fn quench_blocks(quench: &Quench) -> Vec<ContentSection> {
    let mut panel = TextPanel::new(PanelKind::Quench, "Quench");
    let mut tables = Vec::new();

    if let Some(oil) = &quench.oil {
        if let Some(t) = &oil.temperature {
            panel = panel.field("Oil temperature", t.display("°C"));
        }
        if let Some(p) = oil.inerting_pressure {
            panel = panel.field("Inerting pressure", format!("{} mbar", format_number(p)));
        }
        if let Some(d) = &oil.inerting_delay {
            panel = panel.field("Inerting delay", d.display("s"));
        }
        if let Some(d) = &oil.dripping_time {
            panel = panel.field("Dripping time", d.display("s"));
        }
        let mut speed = ParameterTable::new(
            TableKind::QuenchParameters,
            "Oil quench speed",
            ["Step", "Duration (s)", "Speed (rpm)"].map(String::from).to_vec(),
        );
        speed.rows = oil
            .speed_parameters
            .iter()
            .map(|s| {
                vec![
                    s.step.to_string(),
                    format_number(s.duration),
                    format_number(s.speed),
                ]
            })
            .collect();
        tables.push(speed);
    }

    if let Some(gas) = &quench.gas {
        let mut speed = ParameterTable::new(
            TableKind::QuenchParameters,
            "Gas quench speed",
            ["Step", "Duration (s)", "Speed (rpm)"].map(String::from).to_vec(),
        );
        speed.rows = gas
            .speed_parameters
            .iter()
            .map(|s| {
                vec![
                    s.step.to_string(),
                    format_number(s.duration),
                    format_number(s.speed),
                ]
            })
            .collect();
        let mut pressure = ParameterTable::new(
            TableKind::QuenchParameters,
            "Gas quench pressure",
            ["Step", "Duration (s)", "Pressure (mbar)"]
                .map(String::from)
                .to_vec(),
        );
        pressure.rows = gas
            .pressure_parameters
            .iter()
            .map(|s| {
                vec![
                    s.step.to_string(),
                    format_number(s.duration),
                    format_number(s.pressure),
                ]
            })
            .collect();
        tables.push(speed);
        tables.push(pressure);
    }

    if panel.fields.is_empty() && tables.iter().all(|t| t.rows.is_empty()) {
        return Vec::new();
    }

    let quench_type = match (&quench.oil, &quench.gas) {
        (Some(_), Some(_)) => "Oil and gas",
        (Some(_), None) => "Oil",
        (None, Some(_)) => "Gas",
        (None, None) => "None",
    };
    panel.fields.insert(0, Field::new("Quench type", quench_type));

    std::iter::once(ContentSection::TextPanel(panel))
        .chain(tables.into_iter().map(ContentSection::ParameterTable))
        .collect()
}
