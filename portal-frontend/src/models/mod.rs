pub mod admin;
pub mod application;
pub mod credentials;
pub mod extraction;
pub mod job;
pub mod user;

pub use admin::AdminStats;
pub use application::{Application, ApplicationStatus};
pub use credentials::{LoginRequest, RegisterRequest};
pub use extraction::ExtractedJob;
pub use job::{JobFile, JobOffer, Listing, NewPosting};
pub use user::{CurrentUser, Role, User};
