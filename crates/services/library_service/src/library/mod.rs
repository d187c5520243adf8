pub mod model;
pub mod view;

pub use model::{
    DistributionMode, GameStatus, GenreDistribution, GenreShare, LibraryEntry, LibraryOverview,
    LibraryStats, RecordOutcome, RecordStatusBody, Review, ReviewInput, UserLibrary,
};
pub use view::{fetch_library, load_overview};
