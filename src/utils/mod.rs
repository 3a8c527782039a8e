pub use crowding_distance::crowding_distance;
pub use fast_non_dominated_sort::{fast_non_dominated_sort, DominancePolicy, NonDominatedSortResults};
pub use vectors::{argsort, Sort};

mod crowding_distance;
mod fast_non_dominated_sort;
mod vectors;
