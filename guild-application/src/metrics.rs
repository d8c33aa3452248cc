use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    logs_processed: AtomicU64,
    records_saved: AtomicU64,
    price_lookups: AtomicU64,
    price_lookup_errors: AtomicU64,
    missing_config_halts: AtomicU64,
}

impl Metrics {
    pub fn record_log(&self, record_count: usize) {
        self.logs_processed.fetch_add(1, Ordering::Relaxed);
        self.records_saved
            .fetch_add(record_count as u64, Ordering::Relaxed);
    }

    pub fn record_price_lookup(&self) {
        self.price_lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_price_lookup_error(&self) {
        self.price_lookup_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_missing_config(&self) {
        self.missing_config_halts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let logs = self.logs_processed.load(Ordering::Relaxed);
        let records = self.records_saved.load(Ordering::Relaxed);
        let lookups = self.price_lookups.load(Ordering::Relaxed);
        let lookup_errors = self.price_lookup_errors.load(Ordering::Relaxed);
        let halts = self.missing_config_halts.load(Ordering::Relaxed);

        format!(
            "# TYPE guild_activity_logs_total counter\n\
guild_activity_logs_total {}\n\
# TYPE guild_daily_records_total counter\n\
guild_daily_records_total {}\n\
# TYPE guild_price_lookups_total counter\n\
guild_price_lookups_total {}\n\
# TYPE guild_price_lookup_errors_total counter\n\
guild_price_lookup_errors_total {}\n\
# TYPE guild_missing_config_halts_total counter\n\
guild_missing_config_halts_total {}\n",
            logs, records, lookups, lookup_errors, halts
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prometheus_counts() {
        let metrics = Metrics::default();
        metrics.record_log(3);
        metrics.record_log(2);
        metrics.record_price_lookup();
        metrics.record_missing_config();
        let text = metrics.render_prometheus();
        assert!(text.contains("guild_activity_logs_total 2\n"));
        assert!(text.contains("guild_daily_records_total 5\n"));
        assert!(text.contains("guild_price_lookups_total 1\n"));
        assert!(text.contains("guild_price_lookup_errors_total 0\n"));
        assert!(text.contains("guild_missing_config_halts_total 1\n"));
    }
}
