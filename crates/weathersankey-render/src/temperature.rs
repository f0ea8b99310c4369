use crate::config::ChartConfig;
use crate::model::{LayoutPoint, TemperatureChartLayout};
use crate::path::line_path;
use serde::{Deserialize, Serialize};
use weathersankey_core::WeatherRecord;

/// Evenly spaced positions for `len` ordinal values over `range`, ends included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointScale {
    pub len: usize,
    pub range: (f64, f64),
}

impl PointScale {
    pub fn step(&self) -> f64 {
        let (a, b) = self.range;
        if self.len <= 1 {
            b - a
        } else {
            (b - a) / (self.len - 1) as f64
        }
    }

    pub fn position(&self, index: usize) -> Option<f64> {
        let (a, b) = self.range;
        match self.len {
            0 => None,
            1 if index == 0 => Some(a + (b - a) * 0.5),
            n if index < n => Some(a + self.step() * index as f64),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn apply(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d0 == d1 {
            return r0 + (r1 - r0) * 0.5;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }
}

fn temperature_extent(records: &[WeatherRecord]) -> Option<(f64, f64)> {
    let mut values = records.iter().flat_map(|r| [r.high, r.low]);
    let first = values.next()?;
    Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

pub fn layout_temperature_chart(
    records: &[WeatherRecord],
    config: &ChartConfig,
) -> TemperatureChartLayout {
    let x = PointScale {
        len: records.len(),
        range: (config.left_margin, config.width),
    };
    // Hottest at the top.
    let domain = temperature_extent(records).map(|(min, max)| (max, min));
    let y = domain.map(|domain| LinearScale {
        domain,
        range: (0.0, config.temp_height),
    });

    let mut high_points = Vec::with_capacity(records.len());
    let mut low_points = Vec::with_capacity(records.len());
    if let Some(y) = y {
        for (i, r) in records.iter().enumerate() {
            let Some(px) = x.position(i) else {
                continue;
            };
            high_points.push(LayoutPoint::new(px, y.apply(r.high)));
            low_points.push(LayoutPoint::new(px, y.apply(r.low)));
        }
    }

    TemperatureChartLayout {
        top: config.height - config.temp_height - config.margins.temp,
        width: config.width,
        height: config.temp_height,
        domain,
        tick_values: domain.map(|(a, b)| vec![a, b]).unwrap_or_default(),
        high_path: line_path(&high_points),
        low_path: line_path(&low_points),
        high_points,
        low_points,
        high_color: config.high_color.clone(),
        low_color: config.low_color.clone(),
    }
}

/// The text shown beside the temperature indicator line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReadout {
    pub index: usize,
    pub date: String,
    pub high: f64,
    pub low: f64,
    pub high_text: String,
    pub low_text: String,
}

impl TemperatureReadout {
    pub fn new(index: usize, record: &WeatherRecord, unit: &str) -> Self {
        Self {
            index,
            date: record.date.clone(),
            high: record.high,
            low: record.low,
            high_text: format!("High: {}{unit}", record.high),
            low_text: format!("Low: {}{unit}", record.low),
        }
    }
}
