// Sample - Random partition of an array into samples and the rest

use rand::Rng;

use array_types::{ArrayAccess, ArrayAccessExt, ArrayResult, ScriptArray};

/// Result of [`random_sample`]
#[derive(Debug, Clone)]
pub struct Sample {
    /// Selected elements, in input order
    pub samples: ScriptArray,
    /// Remaining elements, in input order
    pub others: ScriptArray,
}

/// Select `min(count, len)` elements uniformly at random in one pass
///
/// Each element is drawn against the number of elements left to scan: with
/// `rest_len` elements remaining and `rest_samples` still wanted, it becomes a
/// sample when a uniform draw from `0..rest_len` is below `rest_samples`. Both
/// outputs keep the relative order of the input.
pub fn random_sample<A, R>(array: &A, count: usize, rng: &mut R) -> ArrayResult<Sample>
where
    A: ArrayAccess + ?Sized,
    R: Rng,
{
    let len = array.len();
    let wanted = count.min(len);
    let element_type = array.element_type();
    let mut samples = ScriptArray::with_capacity(element_type.clone(), wanted)?;
    let mut others = ScriptArray::with_capacity(element_type.clone(), len - wanted)?;

    let end = array.end();
    let mut iter = array.iter();
    let mut rest_samples = wanted;
    loop {
        // Elements left to scan, this one included
        let rest_len = iter.cursor().distance(end).unsigned_abs();
        let Some(element) = iter.next() else {
            break;
        };
        if rest_samples > 0 && rng.gen_range(0..rest_len) < rest_samples {
            samples.push(element)?;
            rest_samples -= 1;
        } else {
            others.push(element)?;
        }
    }

    tracing::debug!(
        requested = count,
        samples = samples.len(),
        others = others.len(),
        "Sampled array"
    );
    Ok(Sample { samples, others })
}

#[cfg(test)]
mod tests {
    use super::*;
    use array_types::TypeDescriptor;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ints(array: &ScriptArray) -> Vec<i32> {
        array.to_values::<i32>().unwrap()
    }

    fn is_subsequence(part: &[i32], whole: &[i32]) -> bool {
        let mut rest = whole.iter();
        part.iter().all(|value| rest.any(|candidate| candidate == value))
    }

    #[test]
    fn test_sample_sizes() {
        let mut rng = StdRng::seed_from_u64(7);
        let array = ScriptArray::from_values(&[1, 2, 3, 4, 5, 6, 7, 8]);

        for count in [0, 1, 3, 8, 20] {
            let sample = random_sample(&array, count, &mut rng).unwrap();
            assert_eq!(sample.samples.len(), count.min(8));
            assert_eq!(sample.others.len(), 8 - count.min(8));
        }
    }

    #[test]
    fn test_sample_partitions_in_order() {
        let mut rng = StdRng::seed_from_u64(42);
        let values: Vec<i32> = (0..50).collect();
        let array = ScriptArray::from_values(&values);

        for _ in 0..20 {
            let sample = random_sample(&array, 17, &mut rng).unwrap();
            let samples = ints(&sample.samples);
            let others = ints(&sample.others);

            assert!(is_subsequence(&samples, &values));
            assert!(is_subsequence(&others, &values));

            let mut union: Vec<i32> = samples.iter().chain(&others).copied().collect();
            union.sort_unstable();
            assert_eq!(union, values);
        }
    }

    #[test]
    fn test_sample_selects_uniformly() {
        // Each of 5 elements lands in a 2-sample with probability 2/5
        let mut rng = StdRng::seed_from_u64(2024);
        let array = ScriptArray::from_values(&[0, 1, 2, 3, 4]);
        let draws = 20_000;

        let mut hits = [0usize; 5];
        for _ in 0..draws {
            let sample = random_sample(&array, 2, &mut rng).unwrap();
            for value in ints(&sample.samples) {
                hits[value as usize] += 1;
            }
        }

        let expected = draws * 2 / 5;
        for (value, &count) in hits.iter().enumerate() {
            assert!(
                count.abs_diff(expected) < 400,
                "element {} sampled {} times, expected about {}",
                value,
                count,
                expected
            );
        }
    }

    #[test]
    fn test_sample_is_reproducible_with_seed() {
        let array = ScriptArray::from_values(&[10, 20, 30, 40, 50, 60]);
        let first = random_sample(&array, 3, &mut StdRng::seed_from_u64(99)).unwrap();
        let second = random_sample(&array, 3, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(ints(&first.samples), ints(&second.samples));
    }

    #[test]
    fn test_sample_empty_array() {
        let mut rng = StdRng::seed_from_u64(1);
        let array = ScriptArray::from_values::<i32>(&[]);
        let sample = random_sample(&array, 4, &mut rng).unwrap();
        assert!(sample.samples.is_empty());
        assert!(sample.others.is_empty());
    }

    #[test]
    fn test_sample_keeps_element_type() {
        let mut rng = StdRng::seed_from_u64(3);
        let array = ScriptArray::from_values(&[1.5f64, 2.5, 3.5]);
        let sample = random_sample(&array, 2, &mut rng).unwrap();
        assert_eq!(sample.samples.element_type().name(), "Double");
        assert_eq!(sample.samples.to_values::<f64>().unwrap().len(), 2);
    }
}
