use crate::generator::trial::Trial;

/// Order-sensitive check of the placed tiles against the trial's answer. No partial credit.
pub fn is_correct(placed: &[String], trial: &Trial) -> bool {
    placed.len() == trial.answer_tokens.len()
        && placed
            .iter()
            .zip(&trial.answer_tokens)
            .all(|(got, want)| got == want)
}

/// Positions that differ from the answer, including missing and excess tiles.
/// Used for review highlighting only; the verdict comes from `is_correct`.
pub fn mismatched_positions(placed: &[String], trial: &Trial) -> Vec<usize> {
    let longest = placed.len().max(trial.answer_tokens.len());
    (0..longest)
        .filter(|&i| placed.get(i) != trial.answer_tokens.get(i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial_with_answer(answer: &[&str]) -> Trial {
        Trial {
            answer_tokens: answer.iter().map(|s| s.to_string()).collect(),
            ..Trial::default()
        }
    }

    fn placed(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_sequence_is_correct() {
        let trial = trial_with_answer(&["river", "mountain"]);
        assert!(is_correct(&placed(&["river", "mountain"]), &trial));
        assert!(mismatched_positions(&placed(&["river", "mountain"]), &trial).is_empty());
    }

    #[test]
    fn test_wrong_order_is_incorrect() {
        let trial = trial_with_answer(&["river", "mountain"]);
        let attempt = placed(&["mountain", "river"]);
        assert!(!is_correct(&attempt, &trial));
        assert_eq!(mismatched_positions(&attempt, &trial), vec![0, 1]);
    }

    #[test]
    fn test_every_non_identity_permutation_is_incorrect() {
        let trial = trial_with_answer(&["a", "b", "c"]);
        let perms = [
            ["a", "c", "b"],
            ["b", "a", "c"],
            ["b", "c", "a"],
            ["c", "a", "b"],
            ["c", "b", "a"],
        ];
        for perm in perms {
            assert!(!is_correct(&placed(&perm), &trial), "{perm:?}");
        }
    }

    #[test]
    fn test_missing_and_excess_tiles_are_incorrect() {
        let trial = trial_with_answer(&["sun", "moon"]);
        let short = placed(&["sun"]);
        let long = placed(&["sun", "moon", "fire"]);
        assert!(!is_correct(&short, &trial));
        assert!(!is_correct(&long, &trial));
        assert_eq!(mismatched_positions(&short, &trial), vec![1]);
        assert_eq!(mismatched_positions(&long, &trial), vec![2]);
    }

    #[test]
    fn test_empty_placement_never_matches_a_real_trial() {
        let trial = trial_with_answer(&["sun"]);
        assert!(!is_correct(&[], &trial));
    }
}
