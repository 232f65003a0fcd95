use coalesce_core::{Decimal, Record};

/// Provider names of the three fixture sources, in query order.
pub const PROVIDERS: [&str; 3] = ["api1.com", "api2.com", "api3.com"];

fn rec(deductible: i64, stop_loss: i64, oop_max: i64) -> Record {
    [
        ("deductible", deductible),
        ("stop_loss", stop_loss),
        ("oop_max", oop_max),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), Decimal::from(v)))
    .collect()
}

/// Record held by `provider` for member `entity`, if any.
pub fn by_provider(provider: &str, entity: &str) -> Option<Record> {
    match (provider, entity) {
        ("api1.com", "1") => Some(rec(1000, 10000, 5000)),
        ("api2.com", "1") => Some(rec(1200, 13000, 6000)),
        ("api3.com", "1") => Some(rec(1000, 10000, 6000)),
        ("api1.com", "2") => Some(rec(500, 8000, 2500)),
        ("api3.com", "2") => Some(rec(700, 9000, 3500)),
        _ => None,
    }
}
