/// Standard single-elimination seed order: for `n` a power of two, returns
/// the seed numbers (1-indexed) in bracket-slot order so that seed 1 meets
/// seed `n` in round one, seed 2 meets seed `n-1`, and so on, with top seeds
/// only meeting in late rounds.
pub fn seed_order(n: usize) -> Vec<usize> {
    if n <= 1 {
        return vec![1];
    }
    let prev = seed_order(n / 2);
    let mut result = Vec::with_capacity(n);
    for s in prev {
        result.push(s);
        result.push(n + 1 - s);
    }
    result
}

pub fn next_power_of_two(n: usize) -> usize {
    let mut p = 1usize;
    while p < n {
        p *= 2;
    }
    p
}

/// Circle method: schedules a round-robin of `n` participants (index 0 is
/// fixed, the rest rotate) into `n-1` rounds of `n/2` pairs each. Odd `n`
/// gets a phantom bye seat appended before scheduling.
pub fn round_robin_schedule(n: usize) -> Vec<Vec<(usize, usize)>> {
    let padded = if n % 2 == 0 { n } else { n + 1 };
    let mut participants: Vec<usize> = (0..padded).collect();
    let rounds_count = padded - 1;
    let mut rounds = Vec::with_capacity(rounds_count);

    for _ in 0..rounds_count {
        let mut pairs = Vec::with_capacity(padded / 2);
        for i in 0..padded / 2 {
            let a = participants[i];
            let b = participants[padded - 1 - i];
            if a < n && b < n {
                pairs.push((a, b));
            }
        }
        rounds.push(pairs);

        // rotate all but the first element
        let fixed = participants[0];
        let mut rest = participants[1..].to_vec();
        rest.rotate_right(1);
        participants = std::iter::once(fixed).chain(rest).collect();
    }
    rounds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_order_eight_matches_standard_bracket() {
        assert_eq!(seed_order(8), vec![1, 8, 4, 5, 2, 7, 3, 6]);
    }

    #[test]
    fn seed_order_four() {
        assert_eq!(seed_order(4), vec![1, 4, 2, 3]);
    }

    #[test]
    fn round_robin_covers_every_pair_exactly_once() {
        let n = 5;
        let rounds = round_robin_schedule(n);
        assert_eq!(rounds.len(), n);

        let mut seen = std::collections::HashSet::new();
        for round in &rounds {
            for &(a, b) in round {
                let key = if a < b { (a, b) } else { (b, a) };
                assert!(seen.insert(key), "pair {:?} scheduled twice", key);
            }
        }
        let expected_pairs = n * (n - 1) / 2;
        assert_eq!(seen.len(), expected_pairs);
    }

    #[test]
    fn round_robin_even_has_no_byes() {
        let n = 4;
        let rounds = round_robin_schedule(n);
        assert_eq!(rounds.len(), n - 1);
        for round in &rounds {
            assert_eq!(round.len(), n / 2);
        }
    }
}
