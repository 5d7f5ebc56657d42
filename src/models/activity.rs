use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::Utc;
use std::fmt;
use std::str::FromStr;
use crate::services::emissions::compute_emissions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Car,
    Bus,
    Train,
    Plane,
    Bicycle,
    Walking,
    Other,
}

impl TransportMode {
    pub const ALL: [TransportMode; 7] = [
        TransportMode::Car,
        TransportMode::Bus,
        TransportMode::Train,
        TransportMode::Plane,
        TransportMode::Bicycle,
        TransportMode::Walking,
        TransportMode::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Car => "car",
            TransportMode::Bus => "bus",
            TransportMode::Train => "train",
            TransportMode::Plane => "plane",
            TransportMode::Bicycle => "bicycle",
            TransportMode::Walking => "walking",
            TransportMode::Other => "other",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransportMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| format!("Unknown transport mode: {}", s))
    }
}

pub const ELECTRICITY_UNIT: &str = "kWh";
pub const WATER_UNIT: &str = "liters";
pub const GAS_UNIT: &str = "m³";
pub const WASTE_UNIT: &str = "kg";
pub const DISTANCE_UNIT: &str = "km";

/// Raw usage of one activity. Absent categories are zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Usage {
    pub electricity: f64,
    pub water: f64,
    pub gas: f64,
    pub waste: f64,
    pub transport_mode: TransportMode,
    pub transport_distance: f64,
}

/// kg CO2-equivalent per category, derived from a [`Usage`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Emissions {
    pub electricity: f64,
    pub water: f64,
    pub gas: f64,
    pub waste: f64,
    pub transport: f64,
    pub total: f64,
}

/// One usage record for one user.
///
/// The emissions are private and only ever produced by
/// [`compute_emissions`], so they always match the current usage.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub activity_id: Uuid,
    pub user_id: Uuid,
    pub date: chrono::DateTime<Utc>,
    usage: Usage,
    emissions: Emissions,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
}

impl Activity {
    pub fn new(
        activity_id: Uuid,
        user_id: Uuid,
        date: chrono::DateTime<Utc>,
        usage: Usage,
        created_at: chrono::DateTime<Utc>,
        updated_at: chrono::DateTime<Utc>,
    ) -> Self {
        compute_emissions(Self {
            activity_id,
            user_id,
            date,
            usage,
            emissions: Emissions::default(),
            created_at,
            updated_at,
        })
    }

    pub fn usage(&self) -> &Usage {
        &self.usage
    }

    pub fn emissions(&self) -> &Emissions {
        &self.emissions
    }

    pub fn set_usage(&mut self, usage: Usage) {
        self.usage = usage;
        self.emissions = compute_emissions(self.clone()).emissions;
    }

    pub(crate) fn with_emissions(self, emissions: Emissions) -> Self {
        Self { emissions, ..self }
    }
}

#[derive(sqlx::FromRow, Debug)]
pub struct ActivityRow {
    pub activity_id: Uuid,
    pub user_id: Uuid,
    pub date: chrono::DateTime<Utc>,
    pub electricity_value: f64,
    pub water_value: f64,
    pub gas_value: f64,
    pub waste_value: f64,
    pub transport_mode: String,
    pub transport_distance: f64,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
}

impl TryFrom<ActivityRow> for Activity {
    type Error = String;

    // Stored CO2 columns are ignored; emissions are rebuilt from the raw values.
    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        let usage = Usage {
            electricity: row.electricity_value,
            water: row.water_value,
            gas: row.gas_value,
            waste: row.waste_value,
            transport_mode: row.transport_mode.parse()?,
            transport_distance: row.transport_distance,
        };

        Ok(Activity::new(
            row.activity_id,
            row.user_id,
            row.date,
            usage,
            row.created_at,
            row.updated_at,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(mode: &str) -> ActivityRow {
        let now = Utc::now();
        ActivityRow {
            activity_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            date: now,
            electricity_value: 10.0,
            water_value: 0.0,
            gas_value: 1.0,
            waste_value: 0.0,
            transport_mode: mode.to_string(),
            transport_distance: 10.0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn transport_mode_parses_every_known_name() {
        for mode in TransportMode::ALL {
            assert_eq!(mode.as_str().parse::<TransportMode>(), Ok(mode));
        }
        assert!("rocket".parse::<TransportMode>().is_err());
        assert!("Car".parse::<TransportMode>().is_err());
    }

    #[test]
    fn row_conversion_recomputes_emissions() {
        let activity = Activity::try_from(row("bus")).unwrap();
        assert_eq!(activity.usage().transport_mode, TransportMode::Bus);
        assert_eq!(activity.emissions().electricity, 5.0);
        assert_eq!(activity.emissions().gas, 2.0);
        assert_eq!(activity.emissions().transport, 1.0);
        assert_eq!(activity.emissions().total, 8.0);
    }

    #[test]
    fn row_with_unknown_mode_is_rejected() {
        assert!(Activity::try_from(row("teleport")).is_err());
    }

    #[test]
    fn set_usage_refreshes_emissions() {
        let mut activity = Activity::try_from(row("car")).unwrap();
        activity.set_usage(Usage {
            transport_mode: TransportMode::Walking,
            transport_distance: 50.0,
            ..Usage::default()
        });
        assert_eq!(activity.emissions(), &Emissions::default());
    }
}
