use crate::models::activity::{Activity, Emissions, TransportMode, Usage};

// kg CO2-equivalent per unit
pub const ELECTRICITY_FACTOR: f64 = 0.5; // per kWh
pub const WATER_FACTOR: f64 = 0.0003; // per liter
pub const GAS_FACTOR: f64 = 2.0; // per m³
pub const WASTE_FACTOR: f64 = 0.5; // per kg

/// kg CO2-equivalent per km travelled.
pub fn transport_factor(mode: TransportMode) -> f64 {
    match mode {
        TransportMode::Car => 0.2,
        TransportMode::Bus => 0.1,
        TransportMode::Train => 0.05,
        TransportMode::Plane => 0.25,
        TransportMode::Bicycle | TransportMode::Walking => 0.0,
        TransportMode::Other => 0.15,
    }
}

pub fn emissions_for(usage: &Usage) -> Emissions {
    let electricity = usage.electricity * ELECTRICITY_FACTOR;
    let water = usage.water * WATER_FACTOR;
    let gas = usage.gas * GAS_FACTOR;
    let waste = usage.waste * WASTE_FACTOR;
    let transport = usage.transport_distance * transport_factor(usage.transport_mode);

    Emissions {
        electricity,
        water,
        gas,
        waste,
        transport,
        total: electricity + water + gas + waste + transport,
    }
}

/// Fills in every derived field of `activity` from its current usage.
pub fn compute_emissions(activity: Activity) -> Activity {
    let emissions = emissions_for(activity.usage());
    activity.with_emissions(emissions)
}
