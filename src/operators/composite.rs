//! Composition of per-item operators for tuple genotypes.
//!
//! A tuple of search spaces is the search space of the tuple of their genotypes, and a tuple of
//! per-item operators is the per-item operator of the tuple genotype: component `k` is handled
//! by operator `k` with the stream `rng.fork(k)`.

use crate::core::{OError, SearchSpace};
use crate::operators::{Creation, Mutation, Recombination};
use crate::random::RandomStream;

macro_rules! impl_tuple_operators {
    ($(($idx:tt, $T:ident, $S:ident, $O:ident)),+) => {
        impl<$($T, $S),+> SearchSpace<($($T,)+)> for ($($S,)+)
        where
            $($S: SearchSpace<$T>),+
        {
            fn contains(&self, genotype: &($($T,)+)) -> bool {
                $(self.$idx.contains(&genotype.$idx))&&+
            }

            fn is_subspace_of(&self, other: &Self) -> bool {
                $(self.$idx.is_subspace_of(&other.$idx))&&+
            }
        }

        impl<$($T, $S, $O),+> Creation<($($T,)+), ($($S,)+)> for ($($O,)+)
        where
            $($O: Creation<$T, $S>),+
        {
            fn create_one(
                &self,
                rng: &mut RandomStream,
                space: &($($S,)+),
            ) -> Result<($($T,)+), OError> {
                Ok(($(self.$idx.create_one(&mut rng.fork($idx), &space.$idx)?,)+))
            }
        }

        impl<$($T, $S, $O),+> Mutation<($($T,)+), ($($S,)+)> for ($($O,)+)
        where
            $($O: Mutation<$T, $S>),+
        {
            fn mutate_one(
                &self,
                genotype: &($($T,)+),
                rng: &mut RandomStream,
                space: &($($S,)+),
            ) -> Result<($($T,)+), OError> {
                Ok(($(self.$idx.mutate_one(&genotype.$idx, &mut rng.fork($idx), &space.$idx)?,)+))
            }
        }

        impl<$($T, $S, $O),+> Recombination<($($T,)+), ($($S,)+)> for ($($O,)+)
        where
            $($O: Recombination<$T, $S>),+
        {
            fn recombine(
                &self,
                first: &($($T,)+),
                second: &($($T,)+),
                rng: &mut RandomStream,
                space: &($($S,)+),
            ) -> Result<($($T,)+), OError> {
                Ok(($(self.$idx.recombine(
                    &first.$idx,
                    &second.$idx,
                    &mut rng.fork($idx),
                    &space.$idx,
                )?,)+))
            }
        }
    };
}

impl_tuple_operators!((0, T0, S0, O0), (1, T1, S1, O1));
impl_tuple_operators!((0, T0, S0, O0), (1, T1, S1, O1), (2, T2, S2, O2));
impl_tuple_operators!(
    (0, T0, S0, O0),
    (1, T1, S1, O1),
    (2, T2, S2, O2),
    (3, T3, S3, O3)
);
impl_tuple_operators!(
    (0, T0, S0, O0),
    (1, T1, S1, O1),
    (2, T2, S2, O2),
    (3, T3, S3, O3),
    (4, T4, S4, O4)
);
impl_tuple_operators!(
    (0, T0, S0, O0),
    (1, T1, S1, O1),
    (2, T2, S2, O2),
    (3, T3, S3, O3),
    (4, T4, S4, O4),
    (5, T5, S5, O5)
);
impl_tuple_operators!(
    (0, T0, S0, O0),
    (1, T1, S1, O1),
    (2, T2, S2, O2),
    (3, T3, S3, O3),
    (4, T4, S4, O4),
    (5, T5, S5, O5),
    (6, T6, S6, O6)
);
