// Models module

pub mod mistake;
pub mod post;
pub mod resource;
pub mod session;
pub mod suggestion;
pub mod user;
pub mod word;

// Re-export commonly used types
pub use mistake::{CreateMistakeRequest, MistakeRecord};
pub use post::{CreatePostRequest, Post, Quote, UpdateQuoteRequest};
pub use resource::{NewResource, Resource, StoredResource};
pub use session::{Principal, Session};
pub use suggestion::{
    CreateSuggestionRequest, FeedbackRequest, Suggestion, SuggestionAttachment, SuggestionWithUser,
};
pub use user::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, Role, User};
pub use word::{CheckAnswerRequest, CheckAnswerResponse, ImportSummary, ModuleCount, QuizQuery, Word};
