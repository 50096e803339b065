// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Classification: index of the highest score.

/// Returns the index of the first maximal element.
///
/// The first element is the initial maximum; a later element replaces it
/// only when strictly greater, so ties resolve to the earliest index.
///
/// # Panics
/// Panics if `scores` is empty.
pub fn argmax(scores: &[i32]) -> usize {
    assert!(!scores.is_empty(), "argmax of an empty score vector");
    let mut best = 0;
    let mut max = scores[0];
    for (i, &s) in scores.iter().enumerate().skip(1) {
        if s > max {
            max = s;
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_element() {
        assert_eq!(argmax(&[5]), 0);
    }

    #[test]
    fn test_tie_picks_earliest() {
        assert_eq!(argmax(&[3, 7, 7, 2]), 1);
        assert_eq!(argmax(&[4, 4, 4]), 0);
    }

    #[test]
    fn test_negative_scores() {
        assert_eq!(argmax(&[-9, -3, -3, -100]), 1);
        assert_eq!(argmax(&[i32::MIN, i32::MIN]), 0);
    }

    #[test]
    fn test_last_is_max() {
        assert_eq!(argmax(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]), 9);
    }

    #[test]
    fn test_matches_smallest_maximal_index() {
        // Exhaustive over short vectors drawn from a tiny alphabet.
        let alphabet = [-1, 0, 1];
        for len in 1..=5usize {
            let combos = alphabet.len().pow(len as u32);
            for mut n in 0..combos {
                let v: Vec<i32> = (0..len)
                    .map(|_| {
                        let x = alphabet[n % alphabet.len()];
                        n /= alphabet.len();
                        x
                    })
                    .collect();
                let max = *v.iter().max().unwrap();
                let expected = v.iter().position(|&x| x == max).unwrap();
                assert_eq!(argmax(&v), expected, "{v:?}");
            }
        }
    }

    #[test]
    #[should_panic(expected = "empty")]
    fn test_empty_panics() {
        argmax(&[]);
    }
}
