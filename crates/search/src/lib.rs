pub mod cache;
pub mod debounce;
pub mod genres;
pub mod session;

pub use cache::{ResponseCache, query_fingerprint};
pub use debounce::{Debouncer, Settled};
pub use genres::{GenreFrame, GenreLookup};
pub use session::{SUGGESTION_DEBOUNCE, SearchFrame, SearchSession};
