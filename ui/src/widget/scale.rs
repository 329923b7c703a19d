//! Position scales for the line charts.

/// Categorical scale placing labels at evenly spaced points, in the order given.
#[derive(Debug, Clone, PartialEq)]
pub struct PointScale {
    domain: Vec<String>,
    start: f64,
    step: f64,
}

impl PointScale {
    /// `padding` is the outer padding in steps on each side (0.5 centres the points).
    pub fn new<'a>(
        labels: impl IntoIterator<Item = &'a str>,
        range: (f64, f64),
        padding: f64,
    ) -> Self {
        let mut domain: Vec<String> = Vec::new();
        for label in labels {
            // Repeated labels share the slot of their first occurrence.
            if !domain.iter().any(|seen| seen == label) {
                domain.push(label.to_string());
            }
        }

        let (lo, hi) = range;
        let n = domain.len() as f64;
        let step = (hi - lo) / (n - 1.0 + padding * 2.0).max(1.0);
        let start = lo + (hi - lo - step * (n - 1.0).max(0.0)) * 0.5;

        Self {
            domain,
            start,
            step,
        }
    }

    pub fn position(&self, label: &str) -> Option<f64> {
        self.domain
            .iter()
            .position(|candidate| candidate == label)
            .map(|index| self.start + self.step * index as f64)
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }
}

/// Continuous scale mapping `domain` linearly onto `range`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Round-number tick values covering the domain, roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, count)
    }
}

/// Ticks at 1, 2 or 5 times a power of ten, whichever spacing lands closest to `count` ticks.
pub fn nice_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if !start.is_finite() || !stop.is_finite() || count == 0 {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };

    let Some((i1, i2, inc)) = tick_spec(lo, hi, count as f64) else {
        return Vec::new();
    };
    if i2 < i1 {
        return Vec::new();
    }

    let mut ticks: Vec<f64> = (i1..=i2)
        .map(|i| {
            let i = i as f64;
            if inc < 0.0 {
                i / -inc
            } else {
                i * inc
            }
        })
        .collect();
    if reverse {
        ticks.reverse();
    }
    ticks
}

fn tick_spec(start: f64, stop: f64, count: f64) -> Option<(i64, i64, f64)> {
    let e10 = 50f64.sqrt();
    let e5 = 10f64.sqrt();
    let e2 = 2f64.sqrt();

    let step = (stop - start) / count.max(0.0);
    if !step.is_finite() || step <= 0.0 {
        return None;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= e10 {
        10.0
    } else if error >= e5 {
        5.0
    } else if error >= e2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let scale = 10f64.powf(-power) / factor;
        i1 = (start * scale).round() as i64;
        i2 = (stop * scale).round() as i64;
        if (i1 as f64) / scale < start {
            i1 += 1;
        }
        if (i2 as f64) / scale > stop {
            i2 -= 1;
        }
        inc = -scale;
    } else {
        let scale = 10f64.powf(power) * factor;
        i1 = (start / scale).round() as i64;
        i2 = (stop / scale).round() as i64;
        if (i1 as f64) * scale < start {
            i1 += 1;
        }
        if (i2 as f64) * scale > stop {
            i2 -= 1;
        }
        inc = scale;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    Some((i1, i2, inc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_scale_centres_points_in_bands() {
        let scale = PointScale::new(["Wk 1", "Wk 2", "Wk 3"], (0.0, 300.0), 0.5);
        assert_eq!(scale.position("Wk 1"), Some(50.0));
        assert_eq!(scale.position("Wk 2"), Some(150.0));
        assert_eq!(scale.position("Wk 3"), Some(250.0));
        assert_eq!(scale.position("Wk 4"), None);
    }

    #[test]
    fn point_scale_keeps_given_order_and_collapses_repeats() {
        let scale = PointScale::new(["Sep", "Aug", "Sep"], (0.0, 200.0), 0.5);
        assert_eq!(scale.domain(), &["Sep".to_string(), "Aug".to_string()]);
        assert!(scale.position("Sep").unwrap() < scale.position("Aug").unwrap());
    }

    #[test]
    fn single_point_sits_in_the_middle() {
        let scale = PointScale::new(["Only"], (0.0, 100.0), 0.5);
        assert_eq!(scale.position("Only"), Some(50.0));
    }

    #[test]
    fn linear_scale_inverts_for_screen_space() {
        let y = LinearScale::new((0.0, 110.0), (220.0, 0.0));
        assert_eq!(y.map(0.0), 220.0);
        assert_eq!(y.map(110.0), 0.0);
        assert_eq!(y.map(55.0), 110.0);
    }

    #[test]
    fn ticks_land_on_round_numbers() {
        let ticks = nice_ticks(0.0, 110.0, 10);
        assert_eq!(ticks.first(), Some(&0.0));
        assert_eq!(ticks.last(), Some(&110.0));
        assert_eq!(ticks.len(), 12);

        let ticks = nice_ticks(0.0, 1.0, 5);
        assert_eq!(ticks, vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn degenerate_domains_do_not_panic() {
        assert_eq!(nice_ticks(5.0, 5.0, 10), vec![5.0]);
        assert!(nice_ticks(0.0, f64::NAN, 10).is_empty());
    }
}
