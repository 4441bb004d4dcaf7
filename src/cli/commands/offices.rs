use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::attendance::provider_from_args;
use crate::core::offices::OfficesLogic;
use crate::errors::AppResult;
use crate::models::geo::GeoPoint;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Offices { lat, lon } = cmd {
        // validates the pair; the point itself is used directly
        provider_from_args(*lat, *lon)?;
        let point = lat.zip(*lon).map(|(lat, lon)| GeoPoint::new(lat, lon));
        OfficesLogic::print(cfg, point);
    }
    Ok(())
}
