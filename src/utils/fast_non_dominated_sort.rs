use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::{Dominance, OError, Objective, ObjectiveVector};

/// How ties are handled when sorting vectors into fronts.
#[derive(Default, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DominancePolicy {
    /// When `true`, of two equal objective vectors the one with the lower index dominates the
    /// other, so duplicates are spread over successive fronts. When `false` (default) equal
    /// vectors are equivalent and share the same front.
    pub dominate_on_equal: bool,
}

/// Outputs of the non-dominated sort algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct NonDominatedSortResults {
    /// A vector containing sub-vectors. Each child vector represents a front (with the first being
    /// the non-dominated front with rank 0) and contains the indexes of the vectors passed to
    /// [`fast_non_dominated_sort`], in ascending order.
    pub front_indexes: Vec<Vec<usize>>,
    /// The rank of each vector, i.e. the index of the front it belongs to.
    pub ranks: Vec<usize>,
    /// Number of vectors that dominates a vector at a given index. When the counter is 0, the
    /// vector is non-dominated. This is `n_p` in the paper.
    pub domination_counter: Vec<usize>,
}

/// Non-dominated fast sorting from NSGA2 paper (with complexity $O(M * N^2)$, where `M` is the
/// number of objectives and `N` the number of vectors).
///
/// This sorts vectors into fronts. Vectors that are not dominated by any other vector belong to
/// the first front; the vectors of front `i` are only dominated by vectors of fronts `j < i`.
///
/// Implemented based on paragraph 3A in:
/// > K. Deb, A. Pratap, S. Agarwal and T. Meyarivan, "A fast and elitist multi-objective genetic
/// > algorithm: NSGA-II," in IEEE Transactions on Evolutionary Computation, vol. 6, no. 2, pp.
/// > 182-197, April 2002, doi: 10.1109/4235.996017.
///
/// # Arguments
///
/// * `vectors`: The objective vectors to sort by dominance.
/// * `objective`: The objective with the component directions.
/// * `policy`: How equal vectors are handled.
///
/// returns: `Result<NonDominatedSortResults, OError>`.
pub fn fast_non_dominated_sort(
    vectors: &[&ObjectiveVector],
    objective: &Objective,
    policy: DominancePolicy,
) -> Result<NonDominatedSortResults, OError> {
    if vectors.is_empty() {
        return Err(OError::EmptyPopulation(
            "fast non-dominated sort".to_string(),
        ));
    }

    // this set contains all the vectors being dominated by a vector `p`. This is `S_p` in the
    // paper
    let mut dominated_solutions: Vec<Vec<usize>> = vec![Vec::new(); vectors.len()];
    let mut domination_counter: Vec<usize> = vec![0; vectors.len()];

    for pi in 0..vectors.len() {
        for qi in (pi + 1)..vectors.len() {
            match vectors[pi].compare_to(vectors[qi], objective)? {
                Dominance::Dominates => {
                    dominated_solutions[pi].push(qi);
                    domination_counter[qi] += 1;
                }
                Dominance::IsDominatedBy => {
                    dominated_solutions[qi].push(pi);
                    domination_counter[pi] += 1;
                }
                Dominance::Equivalent if policy.dominate_on_equal => {
                    // `pi < qi`
                    dominated_solutions[pi].push(qi);
                    domination_counter[qi] += 1;
                }
                Dominance::Equivalent | Dominance::Incomparable => {}
            }
        }
    }

    let mut ranks = vec![0; vectors.len()];
    let mut counter = domination_counter.clone();
    let mut current_front: Vec<usize> = (0..vectors.len())
        .filter(|i| domination_counter[*i] == 0)
        .collect();
    let mut front_indexes: Vec<Vec<usize>> = Vec::new();

    while !current_front.is_empty() {
        let rank = front_indexes.len();
        let mut next_front: Vec<usize> = Vec::new();
        for pi in current_front.iter() {
            ranks[*pi] = rank;
            for qi in dominated_solutions[*pi].iter() {
                counter[*qi] -= 1;
                // none of the vectors in the next fronts dominates `q`
                if counter[*qi] == 0 {
                    next_front.push(*qi);
                }
            }
        }
        next_front.sort_unstable();
        front_indexes.push(current_front);
        current_front = next_front;
    }
    debug!(
        "Sorted {} vectors into {} fronts",
        vectors.len(),
        front_indexes.len()
    );

    Ok(NonDominatedSortResults {
        front_indexes,
        ranks,
        domination_counter,
    })
}

#[cfg(test)]
mod test {
    use crate::core::test_utils::vectors;
    use crate::core::{OError, Objective, ObjectiveDirection};
    use crate::utils::{fast_non_dominated_sort, DominancePolicy};

    fn sort(
        values: &[Vec<f64>],
        directions: Vec<ObjectiveDirection>,
        policy: DominancePolicy,
    ) -> Result<crate::utils::NonDominatedSortResults, OError> {
        let vectors = vectors(values);
        let refs = vectors.iter().collect::<Vec<_>>();
        fast_non_dominated_sort(&refs, &Objective::new(directions).unwrap(), policy)
    }

    #[test]
    /// Test the non-dominated sorting. The resulting fronts and ranks were manually calculated by
    /// plotting the objective values.
    fn test_sorting_2obj() {
        let objectives = vec![
            vec![1.1, 8.1],
            vec![2.1, 6.1],
            vec![3.1, 4.1],
            vec![3.1, 7.1],
            vec![5.1, 3.1],
            vec![5.1, 5.1],
            vec![7.1, 7.1],
            vec![8.1, 2.1],
            vec![10.1, 6.1],
            vec![11.1, 1.1],
            vec![11.1, 3.1],
        ];
        let result = sort(
            &objectives,
            vec![ObjectiveDirection::Minimise, ObjectiveDirection::Minimise],
            DominancePolicy::default(),
        )
        .unwrap();

        let expected_first = vec![0, 1, 2, 4, 7, 9];
        assert_eq!(result.front_indexes[0], expected_first);
        let expected_second = vec![3, 5, 10];
        assert_eq!(result.front_indexes[1], expected_second);
        let expected_third = vec![6, 8];
        assert_eq!(result.front_indexes[2], expected_third);
        assert_eq!(result.front_indexes.len(), 3);

        // check rank
        for (rank, front) in [expected_first.clone(), expected_second, expected_third]
            .iter()
            .enumerate()
        {
            for idx in front {
                assert_eq!(result.ranks[*idx], rank);
            }
        }

        // check counter for some solutions
        for idx in expected_first {
            assert_eq!(result.domination_counter[idx], 0);
        }
        // by 2 and 4
        assert_eq!(result.domination_counter[5], 2);
        // by 1, 2, 4, 5 and 7
        assert_eq!(result.domination_counter[8], 5);
        // by 1 and 2
        assert_eq!(result.domination_counter[3], 2);
    }

    #[test]
    /// Test the non-dominated sorting when objective #1 is maximised.
    fn test_sorting_2obj_max_obj1() {
        let objectives = vec![
            vec![11.1, 8.1],
            vec![8.1, 6.1],
            vec![5.1, 4.1],
            vec![3.1, 3.1],
            vec![2.1, 2.1],
            vec![1.1, 1.1],
            vec![0.0, 5.1],
        ];
        let result = sort(
            &objectives,
            vec![ObjectiveDirection::Maximise, ObjectiveDirection::Minimise],
            DominancePolicy::default(),
        )
        .unwrap();

        assert_eq!(result.front_indexes[0], (0..=5).collect::<Vec<usize>>());
        assert_eq!(result.front_indexes[1], vec![6]);
        assert_eq!(result.ranks[6], 1);
    }

    #[test]
    /// Test the non-dominated sorting when objective #2 is maximised.
    fn test_sorting_2obj_max_obj2() {
        let objectives = vec![
            vec![11.1, 8.1],
            vec![8.1, 6.1],
            vec![5.1, 4.1],
            vec![3.1, 3.1],
            vec![2.1, 2.1],
            vec![1.1, 1.1],
            vec![0.0, 5.1],
        ];
        let result = sort(
            &objectives,
            vec![ObjectiveDirection::Minimise, ObjectiveDirection::Maximise],
            DominancePolicy::default(),
        )
        .unwrap();

        assert_eq!(result.front_indexes[0], vec![0, 1, 6]);
        assert_eq!(result.front_indexes[1], vec![2, 3, 4, 5]);
    }

    #[test]
    /// Test the non-dominated sorting. The resulting fronts and ranks were manually calculated by
    /// plotting the objective values.
    fn test_sorting_3obj() {
        let objectives = vec![
            vec![2.1, 3.1, 4.1],
            vec![-1.1, 4.1, 8.1],
            vec![0.1, -1.1, -2.1],
            vec![0.1, 0.1, 0.1],
        ];
        let result = sort(
            &objectives,
            vec![ObjectiveDirection::Minimise; 3],
            DominancePolicy::default(),
        )
        .unwrap();

        assert_eq!(result.front_indexes, vec![vec![1, 2], vec![3], vec![0]]);
        assert_eq!(result.ranks, vec![2, 0, 0, 1]);
        assert_eq!(result.domination_counter, vec![2, 0, 0, 1]);
    }

    #[test]
    /// Test the two policies for equal vectors.
    fn test_equal_vectors() {
        let objectives = vec![
            vec![1.0, 1.0],
            vec![0.0, 3.0],
            vec![1.0, 1.0],
            vec![1.0, 1.0],
        ];
        let directions = vec![ObjectiveDirection::Minimise; 2];

        let result = sort(&objectives, directions.clone(), DominancePolicy::default()).unwrap();
        assert_eq!(result.front_indexes, vec![vec![0, 1, 2, 3]]);

        let policy = DominancePolicy {
            dominate_on_equal: true,
        };
        let result = sort(&objectives, directions, policy).unwrap();
        assert_eq!(result.front_indexes, vec![vec![0, 1], vec![2], vec![3]]);
        assert_eq!(result.domination_counter, vec![0, 0, 1, 2]);
    }

    #[test]
    /// Test the precondition errors.
    fn test_errors() {
        let result = sort(&[], vec![ObjectiveDirection::Minimise], DominancePolicy::default());
        assert!(matches!(result, Err(OError::EmptyPopulation(_))));

        let result = sort(
            &[vec![1.0], vec![2.0, 3.0]],
            vec![ObjectiveDirection::Minimise],
            DominancePolicy::default(),
        );
        assert_eq!(result.unwrap_err(), OError::ObjectiveLengthMismatch(2, 1));

        // one vector forms one front
        let result = sort(
            &[vec![1.0]],
            vec![ObjectiveDirection::Minimise],
            DominancePolicy::default(),
        )
        .unwrap();
        assert_eq!(result.front_indexes, vec![vec![0]]);
    }
}
