pub mod messages {

    pub const FETCH_FAILED: &str = "Failed to fetch movies. Please try again later.";

    pub const API_FALLBACK_ERROR: &str = "Failed to fetch movies.";

    pub const NO_RESULTS: &str = "No movies found.";

    pub const LOADING: &str = "Loading...";

    pub const NOT_AVAILABLE: &str = "N/A";
}

pub mod intervals {
    use std::time::Duration;

    /// How long shutdown waits for queued trending writes.
    pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);
}

pub mod commands {

    pub const QUIT: &str = ":quit";

    pub const TRENDING: &str = ":trending";
}

pub mod http {

    pub const USER_AGENT: &str = "Marquee/0.1";

    pub const MAX_IDLE_PER_HOST: usize = 10;
}
