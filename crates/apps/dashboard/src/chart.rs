use compute::{ChartSeries, StationSelection};
use serde::Serialize;

/// State behind the station time-series panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StationChart {
    pub station: Option<StationSelection>,
    pub series: ChartSeries,
    pub loading: bool,
    pub error: Option<String>,
    pub visible: bool,
}

impl StationChart {
    /// Opens the panel for `station` and marks it as loading.
    pub fn show(&mut self, station: StationSelection) {
        self.series = ChartSeries::empty(Some(station.clone()));
        self.station = Some(station);
        self.loading = true;
        self.error = None;
        self.visible = true;
    }

    pub fn finish(&mut self, series: ChartSeries) {
        self.loading = false;
        self.error = if series.is_empty() {
            let code = self
                .station
                .as_ref()
                .map_or("unknown", |s| s.station_code.as_str());
            Some(format!("no valid observations for station {code}"))
        } else {
            None
        };
        self.series = series;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
        self.series = ChartSeries::empty(self.station.clone());
    }

    pub fn hide(&mut self) {
        *self = Self::default();
    }
}
