use serde::Serialize;

use crate::tap::{is_long_pulse, TapImage};

/// PAL system clock. NTSC tapes are timed with it as well.
pub const PAL_CLOCK_HZ: f64 = 985_248.0;

/// Cycles represented by one unit of a short pulse.
pub const SHORT_PULSE_CYCLES: f64 = 8.0;

const HISTOGRAM_BUCKETS: usize = 256;

/// Approximate playing time of the tape in seconds.
pub fn estimate_duration(image: &TapImage) -> f64 {
    image
        .pulses
        .iter()
        .map(|&pulse| {
            let cycles = if is_long_pulse(pulse) {
                pulse as f64
            } else {
                pulse as f64 * SHORT_PULSE_CYCLES
            };
            cycles / PAL_CLOCK_HZ
        })
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LongPulse {
    pub index: usize,
    pub value: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistogramBucket {
    pub value: u8,
    pub count: usize,
    pub first_index: Option<usize>,
}

/// Short pulses counted by value, long pulses listed one by one.
#[derive(Debug, Clone)]
pub struct PulseHistogram {
    counts: [usize; HISTOGRAM_BUCKETS],
    first_index: [Option<usize>; HISTOGRAM_BUCKETS],
    shortest: Option<u8>,
    longest: Option<u8>,
    long_pulses: Vec<LongPulse>,
}

impl PulseHistogram {
    pub fn compute(image: &TapImage) -> Self {
        let mut histogram = Self {
            counts: [0; HISTOGRAM_BUCKETS],
            first_index: [None; HISTOGRAM_BUCKETS],
            shortest: None,
            longest: None,
            long_pulses: Vec::new(),
        };

        for (index, &pulse) in image.pulses.iter().enumerate() {
            if is_long_pulse(pulse) {
                histogram.long_pulses.push(LongPulse { index, value: pulse });
                continue;
            }

            let value = pulse as u8;
            let slot = value as usize;
            histogram.first_index[slot].get_or_insert(index);
            histogram.counts[slot] += 1;
            histogram.shortest = Some(histogram.shortest.map_or(value, |s| s.min(value)));
            histogram.longest = Some(histogram.longest.map_or(value, |l| l.max(value)));
        }

        histogram
    }

    pub fn count(&self, value: u8) -> usize {
        self.counts[value as usize]
    }

    pub fn first_index(&self, value: u8) -> Option<usize> {
        self.first_index[value as usize]
    }

    pub fn shortest(&self) -> Option<u8> {
        self.shortest
    }

    pub fn longest(&self) -> Option<u8> {
        self.longest
    }

    pub fn long_pulses(&self) -> &[LongPulse] {
        &self.long_pulses
    }

    pub fn short_pulse_total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Every value from shortest to longest, including empty ones.
    pub fn buckets(&self) -> Vec<HistogramBucket> {
        let (Some(lo), Some(hi)) = (self.shortest, self.longest) else {
            return Vec::new();
        };

        (lo..=hi)
            .map(|value| HistogramBucket {
                value,
                count: self.count(value),
                first_index: self.first_index(value),
            })
            .collect()
    }
}
