// Service exports
pub mod sessions;
pub mod submission;
pub mod transport;

pub use sessions::SubmitterRegistry;
pub use submission::{FormSubmitter, SubmissionState, SubmitOutcome, SUCCESS_MESSAGE, FAILURE_MESSAGE};
pub use transport::{SubmissionTransport, SimulatedTransport, TransportError};
