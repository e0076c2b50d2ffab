//! Key metrics and chart series for the dispatch dashboard.
//!
//! Counts come from resolved data, so the dashboard renders from either
//! source. Chart variance is isolated in [`ChartGenerator`] and seeded
//! explicitly.

use chrono::{Duration, NaiveDate, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;
use utoipa::ToSchema;

use crate::models::{EntityKind, OrderStatus, Record};
use crate::services::resolver::DataSourceResolver;

const MATERIAL_COLORS: [&str; 5] = [
    "rgba(255, 99, 132, 0.5)",
    "rgba(54, 162, 235, 0.5)",
    "rgba(255, 206, 86, 0.5)",
    "rgba(75, 192, 192, 0.5)",
    "rgba(153, 102, 255, 0.5)",
];

const PLACEHOLDER_MATERIALS: [(&str, f64); 5] = [
    ("HR Coil", 300.0),
    ("CR Coil", 250.0),
    ("Wire Rod", 200.0),
    ("Plate", 150.0),
    ("Billets", 100.0),
];

const DEFAULT_ON_TIME_PCT: f64 = 92.0;
const HISTORY_DAYS: i64 = 7;

/// Aggregates the metrics and charts are computed from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardCounts {
    pub total_rakes: usize,
    /// Rakes whose status is anything but Available
    pub active_rakes: usize,
    pub pending_orders: usize,
    pub dispatched_orders: usize,
    /// Orders that have left the pending state
    pub processed_orders: usize,
    /// Inventory quantity summed per product, sorted by product name
    pub material_totals: Vec<(String, f64)>,
}

impl DashboardCounts {
    pub fn from_records(rakes: &[Record], orders: &[Record], inventory: &[Record]) -> Self {
        let mut counts = DashboardCounts::default();

        for record in rakes {
            if let Record::Rake(rake) = record {
                counts.total_rakes += 1;
                if !rake.status.is_available() {
                    counts.active_rakes += 1;
                }
            }
        }

        for record in orders {
            if let Record::Order(order) = record {
                match order.status {
                    OrderStatus::Pending => counts.pending_orders += 1,
                    OrderStatus::Dispatched => {
                        counts.dispatched_orders += 1;
                        counts.processed_orders += 1;
                    }
                    _ => counts.processed_orders += 1,
                }
            }
        }

        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for record in inventory {
            if let Record::Inventory(item) = record {
                *totals.entry(item.product_name.clone()).or_default() += item.quantity;
            }
        }
        counts.material_totals = totals.into_iter().collect();

        counts
    }

    pub fn utilization_pct(&self) -> f64 {
        if self.total_rakes == 0 {
            return 0.0;
        }
        self.active_rakes as f64 / self.total_rakes as f64 * 100.0
    }

    pub fn on_time_pct(&self) -> f64 {
        if self.processed_orders == 0 {
            return DEFAULT_ON_TIME_PCT;
        }
        self.dispatched_orders as f64 / self.processed_orders as f64 * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum MetricValue {
    Count(u64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MetricItem {
    pub label: String,
    pub value: MetricValue,
    pub change: f64,
    pub trend: Trend,
}

impl MetricItem {
    fn new(label: &str, value: MetricValue, change: f64, trend: Trend) -> Self {
        Self {
            label: label.to_string(),
            value,
            change,
            trend,
        }
    }
}

/// The four headline metrics, in display order.
pub fn key_metrics(counts: &DashboardCounts) -> Vec<MetricItem> {
    let utilization = counts.utilization_pct();
    let on_time = counts.on_time_pct();

    vec![
        MetricItem::new(
            "Total Rakes",
            MetricValue::Count(counts.total_rakes as u64),
            5.5,
            if counts.total_rakes > 40 { Trend::Up } else { Trend::Neutral },
        ),
        MetricItem::new(
            "Rake Utilization",
            MetricValue::Text(format!("{:.1}%", utilization)),
            2.3,
            if utilization > 40.0 { Trend::Up } else { Trend::Neutral },
        ),
        MetricItem::new(
            "On-Time Delivery",
            MetricValue::Text(format!("{:.1}%", on_time)),
            -1.2,
            if on_time < 90.0 { Trend::Down } else { Trend::Up },
        ),
        MetricItem::new(
            "Pending Orders",
            MetricValue::Count(counts.pending_orders as u64),
            0.0,
            Trend::Neutral,
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ChartColor {
    Single(String),
    PerPoint(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    pub background_color: ChartColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCharts {
    pub rake_utilization: ChartData,
    pub dispatch_volume: ChartData,
    pub material_distribution: ChartData,
}

fn line_dataset(label: &str, data: Vec<f64>, rgb: &str) -> ChartDataset {
    ChartDataset {
        label: label.to_string(),
        data,
        border_color: Some(format!("rgb({})", rgb)),
        background_color: ChartColor::Single(format!("rgba({}, 0.2)", rgb)),
        border_width: None,
    }
}

/// Chart series with random day-to-day variance around current counts.
pub struct ChartGenerator {
    rng: StdRng,
}

impl ChartGenerator {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Series for the seven days before `today`.
    pub fn generate(&mut self, counts: &DashboardCounts, today: NaiveDate) -> DashboardCharts {
        let labels: Vec<String> = (1..=HISTORY_DAYS)
            .rev()
            .filter_map(|back| today.checked_sub_signed(Duration::days(back)))
            .map(|day| day.format("%Y-%m-%d").to_string())
            .collect();

        let current = counts.utilization_pct();
        let utilization: Vec<f64> = (0..HISTORY_DAYS)
            .map(|_| {
                let variation = (self.rng.gen::<f64>() - 0.5) * 20.0;
                ((current + variation).clamp(0.0, 100.0) * 10.0).round() / 10.0
            })
            .collect();

        let daily_average = (counts.pending_orders / 7).max(15) as i64;
        let dispatch: Vec<f64> = (0..HISTORY_DAYS)
            .map(|_| (daily_average + self.rng.gen_range(-3..=3)) as f64)
            .collect();

        let (material_labels, material_data): (Vec<String>, Vec<f64>) =
            if counts.material_totals.is_empty() {
                PLACEHOLDER_MATERIALS
                    .iter()
                    .map(|(name, tons)| (name.to_string(), *tons))
                    .unzip()
            } else {
                counts.material_totals.iter().cloned().unzip()
            };
        let colors = MATERIAL_COLORS
            .iter()
            .take(material_labels.len())
            .map(|c| c.to_string())
            .collect();

        DashboardCharts {
            rake_utilization: ChartData {
                labels: labels.clone(),
                datasets: vec![line_dataset("Utilization %", utilization, "75, 192, 192")],
            },
            dispatch_volume: ChartData {
                labels,
                datasets: vec![line_dataset("Orders Dispatched", dispatch, "153, 102, 255")],
            },
            material_distribution: ChartData {
                labels: material_labels,
                datasets: vec![ChartDataset {
                    label: "Tons".to_string(),
                    data: material_data,
                    border_color: None,
                    background_color: ChartColor::PerPoint(colors),
                    border_width: Some(1),
                }],
            },
        }
    }
}

/// Dashboard views over resolved data.
#[derive(Clone)]
pub struct DashboardService {
    resolver: DataSourceResolver,
}

impl DashboardService {
    pub fn new(resolver: DataSourceResolver) -> Self {
        Self { resolver }
    }

    /// Records of `kind`, or none when neither source can serve it.
    async fn records_or_empty(&self, kind: EntityKind) -> Vec<Record> {
        match self.resolver.resolve(kind).await {
            Ok(resolution) => resolution.records,
            Err(err) => {
                warn!(%kind, error = %err, "Dashboard rendering without data");
                Vec::new()
            }
        }
    }

    pub async fn counts(&self) -> DashboardCounts {
        let rakes = self.records_or_empty(EntityKind::Rakes).await;
        let orders = self.records_or_empty(EntityKind::Orders).await;
        let inventory = self.records_or_empty(EntityKind::Inventory).await;
        DashboardCounts::from_records(&rakes, &orders, &inventory)
    }

    pub async fn metrics(&self) -> Vec<MetricItem> {
        key_metrics(&self.counts().await)
    }

    pub async fn charts(&self, seed: Option<u64>) -> DashboardCharts {
        let counts = self.counts().await;
        let mut generator = match seed {
            Some(seed) => ChartGenerator::seeded(seed),
            None => ChartGenerator::from_entropy(),
        };
        generator.generate(&counts, Utc::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InventoryRecord, OrderRecord, RakeRecord};
    use crate::repositories::record_store::MockRecordStore;
    use crate::snapshot::{MockSnapshotSource, SnapshotRow};
    use crate::errors::ServiceError;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn rake(status: &str) -> Record {
        let row = SnapshotRow::from_pairs(0, [("rake_number", "RK1"), ("status", status)]);
        Record::Rake(RakeRecord::from_snapshot_row(&row).unwrap())
    }

    fn order(status: &str) -> Record {
        let row = SnapshotRow::from_pairs(0, [("status", status)]);
        Record::Order(OrderRecord::from_snapshot_row(&row).unwrap())
    }

    fn item(product: &str, quantity: &str) -> Record {
        let row = SnapshotRow::from_pairs(0, [("product_name", product), ("quantity", quantity)]);
        Record::Inventory(InventoryRecord::from_snapshot_row(&row).unwrap())
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn counts_and_metrics_follow_record_statuses() {
        let counts = DashboardCounts::from_records(
            &[rake("Available"), rake("In Transit"), rake("Loading"), rake("Available")],
            &[order("pending"), order("Dispatched"), order("completed"), order("pending")],
            &[item("HR Coil", "100"), item("Billets", "40"), item("HR Coil", "50")],
        );
        assert_eq!(counts.total_rakes, 4);
        assert_eq!(counts.active_rakes, 2);
        assert_eq!(counts.pending_orders, 2);
        assert_eq!(counts.processed_orders, 2);
        assert_eq!(
            counts.material_totals,
            vec![("Billets".to_string(), 40.0), ("HR Coil".to_string(), 150.0)]
        );

        let metrics = key_metrics(&counts);
        assert_eq!(metrics[0].trend, Trend::Neutral);
        assert_eq!(metrics[1].value, MetricValue::Text("50.0%".into()));
        assert_eq!(metrics[1].trend, Trend::Up);
        assert_eq!(metrics[2].value, MetricValue::Text("50.0%".into()));
        assert_eq!(metrics[2].trend, Trend::Down);
        assert_eq!(metrics[3].value, MetricValue::Count(2));
    }

    #[test]
    fn on_time_defaults_when_nothing_processed() {
        let metrics = key_metrics(&DashboardCounts::default());
        assert_eq!(metrics[1].value, MetricValue::Text("0.0%".into()));
        assert_eq!(metrics[2].value, MetricValue::Text("92.0%".into()));
        assert_eq!(metrics[2].trend, Trend::Up);
    }

    #[test]
    fn seeded_charts_are_reproducible() {
        let counts = DashboardCounts {
            total_rakes: 10,
            active_rakes: 4,
            pending_orders: 210,
            ..Default::default()
        };
        let a = ChartGenerator::seeded(7).generate(&counts, today());
        let b = ChartGenerator::seeded(7).generate(&counts, today());
        assert_eq!(a, b);

        assert_eq!(a.rake_utilization.labels.first().map(String::as_str), Some("2025-03-03"));
        assert_eq!(a.rake_utilization.labels.last().map(String::as_str), Some("2025-03-09"));
        for volume in &a.dispatch_volume.datasets[0].data {
            assert!((27.0..=33.0).contains(volume));
        }
    }

    #[test]
    fn material_chart_uses_placeholders_without_inventory() {
        let charts = ChartGenerator::seeded(1).generate(&DashboardCounts::default(), today());
        assert_eq!(charts.material_distribution.labels.len(), 5);
        assert_eq!(charts.material_distribution.labels[0], "HR Coil");
        assert_eq!(
            charts.material_distribution.datasets[0].data,
            vec![300.0, 250.0, 200.0, 150.0, 100.0]
        );

        let json = serde_json::to_value(&charts).unwrap();
        assert!(json["rakeUtilization"]["datasets"][0]["borderColor"].is_string());
        assert!(json["materialDistribution"]["datasets"][0]["backgroundColor"].is_array());
    }

    #[tokio::test]
    async fn unavailable_kinds_render_as_empty() {
        let mut store = MockRecordStore::new();
        store
            .expect_query()
            .returning(|_| Err(ServiceError::StoreUnavailable("down".into())));
        let mut snapshots = MockSnapshotSource::new();
        snapshots
            .expect_read()
            .returning(|_| Err(ServiceError::SnapshotNotFound("missing".into())));
        let service =
            DashboardService::new(DataSourceResolver::new(Arc::new(store), Arc::new(snapshots)));

        assert_eq!(service.counts().await, DashboardCounts::default());
        assert_eq!(service.metrics().await.len(), 4);
    }

    proptest! {
        #[test]
        fn utilization_stays_within_bounds(seed in any::<u64>(), total in 1usize..200, active_pct in 0usize..=100) {
            let counts = DashboardCounts {
                total_rakes: total,
                active_rakes: total * active_pct / 100,
                ..Default::default()
            };
            let charts = ChartGenerator::seeded(seed).generate(&counts, today());
            let series = &charts.rake_utilization.datasets[0].data;
            prop_assert_eq!(series.len(), 7);
            for value in series {
                prop_assert!((0.0..=100.0).contains(value));
            }
        }
    }
}
