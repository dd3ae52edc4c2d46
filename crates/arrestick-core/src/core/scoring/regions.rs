use crate::core::models::region::Region;

pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Groups hot window starts into reportable regions.
///
/// Only the `N - K + 1` window-start positions are scanned, so trailing
/// positions padded by the scorer never start or extend a region. A run of
/// hot starts `[a, b]` covers residues `a ..= b + K - 1`, clipped to the
/// sequence end and to the residue before the next run, so regions never
/// overlap.
pub fn extract(
    sequence: &str,
    probability: &[f64],
    kernel_length: usize,
    threshold: f64,
) -> Vec<Region> {
    let residues: Vec<char> = sequence.chars().collect();
    let length = residues.len().min(probability.len());
    let kernel_length = kernel_length.max(1);
    if length < kernel_length {
        return Vec::new();
    }
    let window_count = length - kernel_length + 1;

    let mut runs = Vec::new();
    let mut run_start: Option<usize> = None;
    for i in 0..=window_count {
        let hot = i < window_count && probability[i] >= threshold;
        match (hot, run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(a)) => {
                runs.push((a, i - 1));
                run_start = None;
            }
            _ => {}
        }
    }

    runs.iter()
        .enumerate()
        .map(|(n, &(first, last))| {
            let limit = runs
                .get(n + 1)
                .map_or(length - 1, |&(next, _)| next - 1);
            let end = (last + kernel_length - 1).min(limit);
            build_region(&residues, probability, first, last, end)
        })
        .collect()
}

fn build_region(
    residues: &[char],
    probability: &[f64],
    first: usize,
    last: usize,
    end: usize,
) -> Region {
    let peak_probability = probability[first..=last]
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);

    Region {
        start: first + 1,
        end: end + 1,
        subsequence: residues[first..=end].iter().collect(),
        peak_probability,
    }
}
