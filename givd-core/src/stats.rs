/// One day of the weekly consumption series shown on the stats tab.
///
/// Static demo data; nothing here is persisted or synchronized.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionSample {
    pub day: &'static str,
    pub value: u64,
}

const WEEKLY_CONSUMPTION: &[(&str, u64)] = &[
    ("Lun", 45),
    ("Mar", 52),
    ("Mer", 38),
    ("Jeu", 65),
    ("Ven", 48),
    ("Sam", 90),
    ("Dim", 85),
];

pub fn weekly_consumption() -> Vec<ConsumptionSample> {
    WEEKLY_CONSUMPTION
        .iter()
        .map(|&(day, value)| ConsumptionSample { day, value })
        .collect()
}
