//! Terminal rendering for inventories and alerts.

use indexmap::IndexMap;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::alerter::Alert;
use crate::resource::Resource;

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "Type")]
    resource_type: String,
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Details")]
    details: String,
}

impl From<&Resource> for ResourceRow {
    fn from(res: &Resource) -> Self {
        let details = res
            .human_readable_attributes()
            .iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            resource_type: res.resource_type().to_string(),
            id: res.id().to_string(),
            details,
        }
    }
}

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "Source")]
    key: String,
    #[tabled(rename = "Warning")]
    message: String,
}

pub fn render_inventory(resources: &[Resource]) -> String {
    let rows: Vec<ResourceRow> = resources.iter().map(ResourceRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn render_alerts(alerts: &IndexMap<String, Vec<Alert>>) -> String {
    let rows: Vec<AlertRow> = alerts
        .iter()
        .flat_map(|(key, alerts)| {
            alerts.iter().map(move |alert| AlertRow {
                key: key.clone(),
                message: alert.message.clone(),
            })
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}
