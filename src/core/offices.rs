use crate::config::Config;
use crate::core::calculator::distance::distance;
use crate::core::calculator::proximity::resolve_nearest;
use crate::models::geo::{GeoPoint, LocationReading};
use crate::ui::messages::{info, warning};
use crate::utils::formatting::format_distance;
use crate::utils::table::Table;
use crate::utils::time;

pub struct OfficesLogic;

impl OfficesLogic {
    /// Render the office roster, with distances when a point is given.
    pub fn render(cfg: &Config, point: Option<GeoPoint>) -> String {
        let mut headers = vec!["ID", "Name", "Address", "Coordinates", "Radius"];
        if point.is_some() {
            headers.extend(["Distance", "In range"]);
        }
        let mut table = Table::new(headers);

        let nearest_id = point.and_then(|p| {
            let reading = LocationReading {
                point: Some(p),
                address: String::new(),
                verified: false,
                captured_at: time::now(),
            };
            resolve_nearest(&reading, &cfg.offices).map(|n| n.site.id.clone())
        });

        for site in &cfg.offices {
            let mut row = vec![
                site.id.clone(),
                site.name.clone(),
                site.address.clone(),
                site.location.short(),
                format!("{} m", site.radius_meters),
            ];
            if let Some(p) = point {
                let d = distance(p, site.location);
                let marker = if nearest_id.as_deref() == Some(site.id.as_str()) {
                    " (nearest)"
                } else {
                    ""
                };
                row.push(format!("{}{}", format_distance(d), marker));
                row.push(if d <= f64::from(site.radius_meters) {
                    "yes".to_string()
                } else {
                    "no".to_string()
                });
            }
            table.add_row(row);
        }

        table.render()
    }

    pub fn print(cfg: &Config, point: Option<GeoPoint>) {
        if cfg.offices.is_empty() {
            warning("No offices configured. Add them to the `offices` list of the config file.");
            return;
        }
        info(format!("{} office(s) configured:", cfg.offices.len()));
        print!("{}", Self::render(cfg, point));
    }
}
