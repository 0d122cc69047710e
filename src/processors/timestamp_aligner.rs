use std::collections::BTreeMap;

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::WeatherTable;
use crate::utils::constants::{DEFAULT_PEAK_HOUR, HOURS_PER_DAY};

/// Hour offset per site
pub type SiteOffsets = BTreeMap<u32, i32>;

/// Mean daily temperature rank per site and hour of day; None where the hour has no reading
pub type HourlyRankProfile = BTreeMap<u32, [Option<f64>; HOURS_PER_DAY]>;

/// How a raw `peak - expected` difference becomes an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetPolicy {
    /// Use the difference as is, giving offsets in [-14, 9] for a peak hour of 14.
    #[default]
    Literal,
    /// Wrap the difference into [-12, 11] so that skews of +12 and -12 hours coincide.
    Circular,
}

impl OffsetPolicy {
    pub fn normalize(&self, raw: i32) -> i32 {
        match self {
            OffsetPolicy::Literal => raw,
            OffsetPolicy::Circular => (raw + 12).rem_euclid(24) - 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentOutcome {
    pub peak_hour: u32,
    pub policy: OffsetPolicy,
    pub offsets: SiteOffsets,
    /// Sites without a single air temperature reading
    pub undefined_sites: Vec<u32>,
    /// Rows dropped while merging because their (site_id, timestamp) was already present
    pub duplicate_keys: usize,
}

impl AlignmentOutcome {
    pub fn offset_for(&self, site_id: u32) -> Option<i32> {
        self.offsets.get(&site_id).copied()
    }
}

struct MergedReading {
    site_id: u32,
    timestamp: NaiveDateTime,
    air_temperature: Option<f64>,
}

/// Per-site clock skew detection and correction.
///
/// Air temperature peaks at roughly the same local hour every day. For each
/// site the readings of every calendar day are ranked, the ranks are averaged
/// per hour of day, and the hour with the highest mean rank is taken as the
/// site's apparent peak. The distance from the expected peak hour is the
/// site's offset, and every timestamp of the site is moved back by it.
pub struct TimestampAligner {
    peak_hour: u32,
    policy: OffsetPolicy,
}

impl TimestampAligner {
    pub fn new() -> Self {
        Self {
            peak_hour: DEFAULT_PEAK_HOUR,
            policy: OffsetPolicy::Literal,
        }
    }

    pub fn with_peak_hour(mut self, peak_hour: u32) -> Self {
        self.peak_hour = peak_hour;
        self
    }

    pub fn with_policy(mut self, policy: OffsetPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Compute one offset per site from the union of all given tables
    pub fn compute_offsets(&self, tables: &[&WeatherTable]) -> AlignmentOutcome {
        let (profile, duplicate_keys) = self.build_profile(tables);

        let mut offsets = SiteOffsets::new();
        let mut undefined_sites = Vec::new();

        for (&site_id, hours) in &profile {
            match peak_hour_of(hours) {
                Some(peak) => {
                    let offset = self.policy.normalize(peak as i32 - self.peak_hour as i32);
                    debug!(
                        "Site {}: temperature peaks at hour {}, offset {}",
                        site_id, peak, offset
                    );
                    offsets.insert(site_id, offset);
                }
                None => undefined_sites.push(site_id),
            }
        }

        if duplicate_keys > 0 {
            debug!(
                "Dropped {} duplicate (site_id, timestamp) rows while merging tables",
                duplicate_keys
            );
        }
        if !undefined_sites.is_empty() {
            debug!(
                "No air temperature readings for sites {:?}; their timestamps are left unaligned",
                undefined_sites
            );
        }
        info!("Computed timestamp offsets for {} sites", offsets.len());

        AlignmentOutcome {
            peak_hour: self.peak_hour,
            policy: self.policy,
            offsets,
            undefined_sites,
            duplicate_keys,
        }
    }

    /// Site x hour-of-day table of mean daily temperature ranks
    pub fn hourly_rank_profile(&self, tables: &[&WeatherTable]) -> HourlyRankProfile {
        self.build_profile(tables).0
    }

    /// Move every row of a site with a known offset back by that many hours.
    /// Rows of other sites keep their timestamps.
    pub fn apply(&self, table: WeatherTable, offsets: &SiteOffsets) -> WeatherTable {
        let WeatherTable { name, rows } = table;
        let mut shifted = 0usize;

        let rows = rows
            .into_iter()
            .map(|row| match offsets.get(&row.site_id) {
                Some(&offset) => {
                    shifted += 1;
                    row.shifted(-(offset as i64))
                }
                None => row,
            })
            .collect();

        info!("Aligned {} rows of {}", shifted, name);
        WeatherTable { name, rows }
    }

    fn build_profile(&self, tables: &[&WeatherTable]) -> (HourlyRankProfile, usize) {
        let mut merged: Vec<MergedReading> = tables
            .iter()
            .flat_map(|t| t.rows.iter())
            .map(|r| MergedReading {
                site_id: r.site_id,
                timestamp: r.timestamp,
                air_temperature: r.air_temperature,
            })
            .collect();

        // Stable sort so the earliest table wins on duplicate keys
        merged.sort_by_key(|r| (r.site_id, r.timestamp));
        let before = merged.len();
        merged.dedup_by(|b, a| a.site_id == b.site_id && a.timestamp == b.timestamp);
        let duplicate_keys = before - merged.len();

        let mut rank_sums: BTreeMap<u32, [(f64, usize); HOURS_PER_DAY]> = BTreeMap::new();

        for day in merged.chunk_by(|a, b| {
            a.site_id == b.site_id && a.timestamp.date() == b.timestamp.date()
        }) {
            let site_id = day[0].site_id;
            let sums = rank_sums
                .entry(site_id)
                .or_insert([(0.0, 0); HOURS_PER_DAY]);

            let readings: Vec<(usize, f64)> = day
                .iter()
                .filter_map(|r| r.air_temperature.map(|t| (r.timestamp.hour() as usize, t)))
                .collect();
            let values: Vec<f64> = readings.iter().map(|&(_, t)| t).collect();

            for ((hour, _), rank) in readings.iter().zip(average_ranks(&values)) {
                sums[*hour].0 += rank;
                sums[*hour].1 += 1;
            }
        }

        let profile = rank_sums
            .into_iter()
            .map(|(site_id, sums)| {
                let means = sums.map(|(sum, count)| (count > 0).then(|| sum / count as f64));
                (site_id, means)
            })
            .collect();

        (profile, duplicate_keys)
    }
}

impl Default for TimestampAligner {
    fn default() -> Self {
        Self::new()
    }
}

/// Hour with the highest mean rank, earliest hour on ties
fn peak_hour_of(hours: &[Option<f64>; HOURS_PER_DAY]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (hour, mean) in hours.iter().enumerate() {
        if let Some(mean) = *mean {
            if best.map_or(true, |(_, b)| mean > b) {
                best = Some((hour, mean));
            }
        }
    }
    best.map(|(hour, _)| hour)
}

/// 1-based fractional ranks; tied values share the mean of the ranks they span.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1..=end
        let rank = (start + 1 + end) as f64 / 2.0;
        for &index in &order[start..end] {
            ranks[index] = rank;
        }
        start = end;
    }
    ranks
}
