use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A single coordinate of a sparse vector: a term id and its weight.
///
/// Within any [`SparseVector`] the ids are unique and strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub id: u64,
    pub value: f64,
}

impl Term {
    #[inline]
    pub fn new(id: u64, value: f64) -> Self {
        Term { id, value }
    }
}

/// Sparse vector represented as a sequence of [`Term`]s sorted by increasing
/// id. Ids that are not listed are implicit zeros.
///
/// ```
/// use textsim::math::{Term, SparseVector};
///
/// // equivalent to the dense vector [9, 0, 0, 2, 0, 0, 0, 0, 7]
/// let v: SparseVector = vec![Term::new(0, 9.0), Term::new(3, 2.0), Term::new(8, 7.0)];
/// assert_eq!(textsim::math::norm(&v), (9.0f64 * 9.0 + 2.0 * 2.0 + 7.0 * 7.0).sqrt());
/// ```
pub type SparseVector = Vec<Term>;

/// Dot product of two id-sorted sparse vectors.
///
/// Merge scan over both sequences, O(|v1| + |v2|). Returns 0.0 for empty or
/// fully disjoint inputs. Both inputs must be sorted by increasing id with no
/// duplicate ids; the result is unspecified otherwise.
#[inline]
pub fn dot(v1: &[Term], v2: &[Term]) -> f64 {
    let mut result = 0.0;
    let mut i = 0;
    let mut j = 0;

    while i < v1.len() && j < v2.len() {
        match v1[i].id.cmp(&v2[j].id) {
            Ordering::Equal => {
                result += v1[i].value * v2[j].value;
                i += 1;
                j += 1;
            }
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
        }
    }

    result
}

/// Euclidean norm (L2 norm) of a sparse vector. 0.0 for the empty vector.
#[inline]
pub fn norm(vec: &[Term]) -> f64 {
    let mut sum_of_squares = 0.0;
    for term in vec {
        sum_of_squares += term.value * term.value;
    }
    sum_of_squares.sqrt()
}

/// Removes consecutive duplicates from a sorted id slice, like Unix `uniq`.
pub fn uniq(sorted_values: &[u64]) -> Vec<u64> {
    let mut unique_values = Vec::with_capacity(sorted_values.len());
    for &value in sorted_values {
        if unique_values.last() != Some(&value) {
            unique_values.push(value);
        }
    }
    unique_values
}

/// Intersection of two sorted duplicate-free id sets.
///
/// The result is unspecified if either input contains duplicates or is not in
/// ascending order.
pub fn intersect(a: &[u64], b: &[u64]) -> Vec<u64> {
    let mut intersection = Vec::with_capacity(a.len().min(b.len()));
    let mut i = 0;
    let mut j = 0;

    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Equal => {
                intersection.push(a[i]);
                i += 1;
                j += 1;
            }
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
        }
    }

    intersection
}

/// Union of two sorted duplicate-free id sets.
///
/// The result is unspecified if either input contains duplicates or is not in
/// ascending order.
pub fn union(a: &[u64], b: &[u64]) -> Vec<u64> {
    let mut union = Vec::with_capacity(a.len().max(b.len()));
    let mut i = 0;
    let mut j = 0;

    loop {
        if i == a.len() {
            union.extend_from_slice(&b[j..]);
            break;
        }
        if j == b.len() {
            union.extend_from_slice(&a[i..]);
            break;
        }

        match a[i].cmp(&b[j]) {
            Ordering::Equal => {
                union.push(a[i]);
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                union.push(a[i]);
                i += 1;
            }
            Ordering::Greater => {
                union.push(b[j]);
                j += 1;
            }
        }
    }

    union
}

/// Weighted mean of the values in `x` with the weights in `w`.
///
/// Assumes `x` and `w` have the same length and contain non-negative values.
pub fn weighted_mean(x: &[f64], w: &[f64]) -> f64 {
    let mut sum_of_weighted_values = 0.0;
    let mut sum_of_weights = 0.0;
    for (x_val, w_val) in x.iter().zip(w.iter()) {
        sum_of_weighted_values += x_val * w_val;
        sum_of_weights += w_val;
    }
    sum_of_weighted_values / sum_of_weights
}
