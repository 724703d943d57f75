pub mod debounce;
pub use debounce::{DebounceTimer, Debouncer, TimerHandle};

pub mod search;
pub use search::{SearchController, SearchOutcome, SearchSession, SearchState, SearchStatus};

pub mod trending;
pub use trending::{RecordOutcome, TrendingError, TrendingHandle, TrendingService};
