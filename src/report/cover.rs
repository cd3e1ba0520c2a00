use crate::layout::{ContentSection, PanelKind, TextPanel};
use crate::model::Report;

use super::{non_empty, or_unspecified};

pub(super) fn assemble(report: &Report) -> Vec<ContentSection> {
    let trial = &report.trial;
    let client = &report.client;

    let place = [client.city.as_str(), client.country.as_str()]
        .into_iter()
        .filter_map(non_empty)
        .collect::<Vec<_>>()
        .join(", ");

    let title = match non_empty(&trial.code) {
        Some(code) => format!("Trial {code}"),
        None => "Trial".to_string(),
    };

    let panel = TextPanel::new(PanelKind::Cover, title)
        .field("Client", or_unspecified(&client.name))
        .field("Client location", or_unspecified(&place))
        .field("Trial name", or_unspecified(&trial.name))
        .field("Load number", or_unspecified(&trial.load_number))
        .field(
            "Trial date",
            or_unspecified(trial.date.as_deref().unwrap_or_default()),
        )
        .field("Process", or_unspecified(&trial.process_type))
        .field("Location", or_unspecified(&trial.location))
        .field("Status", or_unspecified(&trial.status));

    vec![ContentSection::TextPanel(panel)]
}
