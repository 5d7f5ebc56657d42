use serde::Serialize;
use chrono::NaiveDate;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct CategoryTotal {
    /// Sum of raw values, in the category's unit.
    pub total: f64,
    /// Sum of kg CO2-equivalent.
    pub co2: f64,
}

impl CategoryTotal {
    pub(crate) fn add(&mut self, value: f64, co2: f64) {
        self.total += value;
        self.co2 += co2;
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_activities: usize,
    #[serde(rename = "totalCO2")]
    pub total_co2: f64,
    pub electricity: CategoryTotal,
    pub water: CategoryTotal,
    pub gas: CategoryTotal,
    pub waste: CategoryTotal,
    pub transport: CategoryTotal,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotal {
    pub date: NaiveDate,
    #[serde(rename = "totalCO2")]
    pub total_co2: f64,
}
