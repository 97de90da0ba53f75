//! Job source for the probe pipeline
//!
//! Produces the descending ID range on a bounded channel and closes it when
//! done. Workers pull from a shared [`JobQueue`]; the order in which they
//! receive IDs is the submission order, but the order in which they finish is
//! not guaranteed.
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! use url_radar::app::queue::{IdRange, JobSource};
//!
//! # async fn example() {
//! let (jobs, producer) = JobSource::new(IdRange::new(10, 3), 3).spawn();
//!
//! while let Some(id) = jobs.next_job().await {
//!     println!("probe {}", id);
//! }
//! assert_eq!(producer.await.unwrap(), 3);
//! # }
//! ```

pub mod core;

pub use self::core::{IdRange, JobQueue, JobSource};
