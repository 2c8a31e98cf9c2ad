pub mod accounts;
pub mod credentials;
pub mod documents;
pub mod domain;
pub mod error;
pub mod gate;
pub mod ports;
pub mod token;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use accounts::AccountService;
pub use documents::DocumentService;
pub use domain::{AccessToken, Document, DocumentPreview, Identity, Summary, User, UserCredentials};
pub use error::{AuthFailure, ServiceError, ServiceResult};
pub use gate::AuthorizationGate;
pub use ports::{
    DatabaseService, PortError, PortResult, SummarizationService, TextExtractionService,
};
pub use token::{Claims, TokenError, TokenService};
