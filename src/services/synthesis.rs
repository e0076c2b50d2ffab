//! Presentation dates re-anchored to the read instant.
//!
//! Each record's dates depend only on the reference day, its position in the
//! resolved sequence and (for rakes) its status, so the same inputs always
//! produce the same output. None of these values are persisted.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::{InventoryRecord, OrderRecord, RakeRecord, Record};

fn shift(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
}

/// Derives the index-dependent date fields of one record.
pub fn synthesize(reference: DateTime<Utc>, index: usize, record: Record) -> Record {
    let today = reference.date_naive();
    match record {
        Record::Inventory(item) => Record::Inventory(inventory_dates(today, index, item)),
        Record::Order(order) => Record::Order(order_dates(today, index, order)),
        Record::Rake(rake) => Record::Rake(rake_dates(today, index, rake)),
        route @ Record::Route(_) => route,
    }
}

/// Applies [`synthesize`] using each record's position as its index.
pub fn synthesize_all(reference: DateTime<Utc>, records: Vec<Record>) -> Vec<Record> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| synthesize(reference, index, record))
        .collect()
}

fn inventory_dates(today: NaiveDate, index: usize, mut item: InventoryRecord) -> InventoryRecord {
    item.production_schedule_date = shift(today, (index % 5) as i64);
    item
}

fn order_dates(today: NaiveDate, index: usize, mut order: OrderRecord) -> OrderRecord {
    let dispatch = shift(today, (index % 30) as i64);
    order.preferred_dispatch_date = dispatch;
    order.latest_delivery_date = dispatch.and_then(|d| shift(d, 7 + (index % 7) as i64));
    order
}

fn rake_dates(today: NaiveDate, index: usize, mut rake: RakeRecord) -> RakeRecord {
    if rake.status.is_available() {
        rake.departure_date = None;
        rake.expected_arrival_date = None;
    } else {
        let departure = shift(today, (index % 20) as i64 - 10);
        rake.departure_date = departure;
        rake.expected_arrival_date = departure.and_then(|d| shift(d, 3 + (index % 7) as i64));
    }
    rake.last_maintenance_date = rake
        .last_maintenance_date
        .and_then(|_| shift(today, -((index % 90) as i64)));
    rake
}
